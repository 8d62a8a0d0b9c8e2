use lettre::Address;

use super::parser::RawFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Name,
    Email,
    Country,
    Organization,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    MissingField(RequiredField),
    InvalidEmailFormat,
}

impl FieldError {
    pub fn message(&self) -> &'static str {
        match self {
            FieldError::MissingField(RequiredField::Name) => "Name is required",
            FieldError::MissingField(RequiredField::Email) | FieldError::InvalidEmailFormat => {
                "Valid work email is required"
            }
            FieldError::MissingField(RequiredField::Country) => "Country is required",
            FieldError::MissingField(RequiredField::Organization) => "Organization is required",
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// A demo request as submitted, every value trimmed, absent fields empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub organization: String,
    pub hear_about: String,
    pub additional_info: String,
}

impl DemoRequest {
    pub fn from_fields(raw: &RawFields) -> Self {
        let get = |key: &str| raw.get(key).map(|v| v.trim().to_string()).unwrap_or_default();

        // Split-name forms send firstname/lastname instead of name
        let mut name = get("name");
        if name.is_empty() {
            name = format!("{} {}", get("firstname"), get("lastname"))
                .trim()
                .to_string();
        }

        Self {
            name,
            email: get("work-email"),
            phone: get("phone"),
            country: get("country"),
            organization: get("organization"),
            hear_about: get("hear-about"),
            additional_info: get("additional-info"),
        }
    }

    /// Every failing rule, in the order name, email, country, organization.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(FieldError::MissingField(RequiredField::Name));
        }

        if self.email.is_empty() {
            errors.push(FieldError::MissingField(RequiredField::Email));
        } else if !is_valid_email(&self.email) {
            errors.push(FieldError::InvalidEmailFormat);
        }

        if self.country.is_empty() {
            errors.push(FieldError::MissingField(RequiredField::Country));
        }

        if self.organization.is_empty() {
            errors.push(FieldError::MissingField(RequiredField::Organization));
        }

        errors
    }

    /// Wire names and values in the order they are written to the audit log.
    pub fn log_fields(&self) -> [(&'static str, &str); 7] {
        [
            ("name", self.name.as_str()),
            ("work-email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("country", self.country.as_str()),
            ("organization", self.organization.as_str()),
            ("hear-about", self.hear_about.as_str()),
            ("additional-info", self.additional_info.as_str()),
        ]
    }
}

/// Address syntax as lettre accepts it, with a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    email
        .parse::<Address>()
        .is_ok_and(|address| address.domain().contains('.'))
}
