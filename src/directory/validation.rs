//! Caller input checks. Pure functions, no network access.

use serde_json::{Map, Value};

use crate::directory::NewEmployee;
use crate::error::{DirectoryError, DirectoryResult};

pub const FIELD_NAME: &str = "name";
pub const FIELD_SALARY: &str = "salary";
pub const FIELD_AGE: &str = "age";
pub const FIELD_PROFILE_IMAGE: &str = "profile_image";

/// Keys a create request may carry, compared case-insensitively.
pub const ALLOWED_FIELDS: [&str; 4] = [FIELD_NAME, FIELD_SALARY, FIELD_AGE, FIELD_PROFILE_IMAGE];

fn present(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|s| !s.is_empty())
}

/// Returns the trimmed identifier.
pub fn validate_id(id: Option<&str>) -> DirectoryResult<&str> {
    let id = present(id).ok_or_else(|| DirectoryError::bad_request("Id cannot be empty."))?;
    if matches!(id, "." | "..") {
        return Err(DirectoryError::bad_request(format!("Invalid id: {id}")));
    }
    Ok(id)
}

/// Returns the trimmed search term.
pub fn validate_search_string(term: Option<&str>) -> DirectoryResult<&str> {
    present(term).ok_or_else(|| DirectoryError::bad_request("Search string cannot be empty."))
}

/// Field keys match case-insensitively over ASCII only.
fn canonical_key(key: &str) -> String {
    key.to_ascii_lowercase()
}

/// Reject any key outside the allow-list. Also rejects two keys naming the
/// same field with different case, since either reading would be a guess.
pub fn validate_create_fields(fields: &Map<String, Value>) -> DirectoryResult<()> {
    let mut seen = Vec::with_capacity(fields.len());
    for key in fields.keys() {
        let lowered = canonical_key(key);
        if !ALLOWED_FIELDS.contains(&lowered.as_str()) {
            return Err(DirectoryError::bad_request(format!("Invalid field supplied: {key}")));
        }
        if seen.contains(&lowered) {
            return Err(DirectoryError::bad_request(format!("Duplicate field supplied: {key}")));
        }
        seen.push(lowered);
    }
    Ok(())
}

fn field<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    fields
        .iter()
        .find(|(key, _)| canonical_key(key) == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_null())
}

fn required<'a>(fields: &'a Map<String, Value>, name: &str) -> DirectoryResult<&'a Value> {
    field(fields, name).ok_or_else(|| DirectoryError::bad_request(format!("Missing required field: {name}")))
}

fn integer(value: &Value, name: &str) -> DirectoryResult<u64> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| DirectoryError::bad_request(format!("Field {name} must be a non-negative integer")))
}

fn string(value: &Value, name: &str) -> DirectoryResult<String> {
    value
        .as_str()
        .map(String::from)
        .ok_or_else(|| DirectoryError::bad_request(format!("Field {name} must be a string")))
}

/// Allow-list check, then extract and type the fields of a create request.
pub fn parse_new_employee(fields: &Map<String, Value>) -> DirectoryResult<NewEmployee> {
    validate_create_fields(fields)?;

    let name = string(required(fields, FIELD_NAME)?, FIELD_NAME)?;
    if name.trim().is_empty() {
        return Err(DirectoryError::bad_request("Field name cannot be empty"));
    }

    let salary = integer(required(fields, FIELD_SALARY)?, FIELD_SALARY)?;

    let age = u32::try_from(integer(required(fields, FIELD_AGE)?, FIELD_AGE)?)
        .ok()
        .filter(|age| *age > 0)
        .ok_or_else(|| DirectoryError::bad_request("Field age must be a positive integer"))?;

    let profile_image = field(fields, FIELD_PROFILE_IMAGE)
        .map(|value| string(value, FIELD_PROFILE_IMAGE))
        .transpose()?
        .unwrap_or_default();

    Ok(NewEmployee {
        name,
        salary,
        age,
        profile_image,
    })
}
