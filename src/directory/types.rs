//! Employee records and the wire shapes exchanged with the upstream API.
//!
//! The upstream is string-typed for some numeric fields and inconsistent about
//! it across endpoints. All coercion lives in [`wire`] and in
//! [`CreateEmployeeRequest`]; the domain types only ever hold integers.

use serde::{Deserialize, Serialize};

/// One employee record. Equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Employee {
    #[serde(deserialize_with = "wire::integer")]
    pub id: u64,

    #[serde(rename = "employee_name")]
    pub name: String,

    #[serde(rename = "employee_salary", deserialize_with = "wire::integer")]
    pub salary: u64,

    #[serde(rename = "employee_age", deserialize_with = "wire::integer")]
    pub age: u32,

    #[serde(default, deserialize_with = "wire::nullable_text")]
    pub profile_image: String,
}

/// Validated caller input for a create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub salary: u64,
    pub age: u32,
    pub profile_image: String,
}

/// Body of `POST /create`. Numeric fields travel as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub salary: String,
    pub age: String,
    pub profile_image: String,
}

impl From<&NewEmployee> for CreateEmployeeRequest {
    fn from(employee: &NewEmployee) -> Self {
        Self {
            name: employee.name.clone(),
            salary: employee.salary.to_string(),
            age: employee.age.to_string(),
            profile_image: employee.profile_image.clone(),
        }
    }
}

/// The record echoed back by `POST /create`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedEmployee {
    #[serde(deserialize_with = "wire::integer")]
    pub id: u64,
    pub name: String,
    #[serde(deserialize_with = "wire::integer")]
    pub salary: u64,
    #[serde(deserialize_with = "wire::integer")]
    pub age: u32,
    #[serde(default, alias = "profileImage", deserialize_with = "wire::optional_text")]
    pub profile_image: Option<String>,
}

impl CreatedEmployee {
    /// Build the domain record, keeping the submitted image when the echo
    /// omits it.
    pub fn into_employee(self, submitted: &NewEmployee) -> Employee {
        Employee {
            id: self.id,
            name: self.name,
            salary: self.salary,
            age: self.age,
            profile_image: self
                .profile_image
                .unwrap_or_else(|| submitted.profile_image.clone()),
        }
    }
}

/// Payload of `DELETE /delete/{id}`: a string or a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Confirmation(#[serde(deserialize_with = "wire::text")] pub String);

pub mod wire {
    //! Lenient deserializers for upstream fields.

    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Integer(u64),
        Text(String),
    }

    /// A non-negative integer given as a JSON number or a numeric string.
    pub fn integer<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64>,
    {
        let value = match Scalar::deserialize(deserializer)
            .map_err(|_| D::Error::custom("expected a non-negative integer or numeric string"))?
        {
            Scalar::Integer(n) => n,
            Scalar::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| D::Error::custom(format!("invalid integer '{s}'")))?,
        };
        T::try_from(value).map_err(|_| D::Error::custom(format!("integer {value} out of range")))
    }

    /// A string, or a number rendered as one.
    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Scalar::deserialize(deserializer)
            .map_err(|_| D::Error::custom("expected a string or an integer"))?
        {
            Scalar::Integer(n) => Ok(n.to_string()),
            Scalar::Text(s) => Ok(s),
        }
    }

    /// A string where `null` means empty.
    pub fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// A string where `null` means absent.
    pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)
    }
}
