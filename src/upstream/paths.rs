//! Upstream endpoint paths, relative to the configured base URL.

/// The four endpoints of the employee API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiPath {
    Employees,
    Employee,
    Create,
    Delete,
}

impl ApiPath {
    pub const fn template(self) -> &'static str {
        match self {
            ApiPath::Employees => "/employees",
            ApiPath::Employee => "/employee/{id}",
            ApiPath::Create => "/create",
            ApiPath::Delete => "/delete/{id}",
        }
    }

    /// Operation name used in logs and metrics.
    pub const fn operation(self) -> &'static str {
        match self {
            ApiPath::Employees => "list_employees",
            ApiPath::Employee => "get_employee",
            ApiPath::Create => "create_employee",
            ApiPath::Delete => "delete_employee",
        }
    }

    /// Path segments with `{name}` placeholders filled from `params`. A
    /// substituted value is always exactly one segment, whatever it contains.
    pub fn segments<'a>(self, params: &[(&str, &'a str)]) -> Vec<&'a str> {
        self.template()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                segment
                    .strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                    .and_then(|name| params.iter().find(|(key, _)| *key == name))
                    .map_or(segment, |(_, value)| *value)
            })
            .collect()
    }
}
