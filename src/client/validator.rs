use std::sync::LazyLock;

use regex::Regex;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// One input of the demo form and its inline error state.
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: String,
    pub required: bool,
    /// Field-specific message shown when a required value is missing.
    pub message: Option<String>,
    error: Option<String>,
}

impl FormField {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: String::new(),
            required: false,
            message: None,
            error: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// The inline message while the field is highlighted.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_highlighted(&self) -> bool {
        self.error.is_some()
    }

    fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn highlight(&mut self, custom: Option<&str>) {
        let message = custom
            .or(self.message.as_deref())
            .unwrap_or(REQUIRED_MESSAGE)
            .to_string();
        self.error = Some(message);
    }

    fn clear(&mut self) {
        self.error = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemoForm {
    fields: Vec<FormField>,
}

impl DemoForm {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    /// The standard "Book a Demo" layout.
    pub fn demo_request() -> Self {
        Self::new(vec![
            FormField::new("name")
                .required()
                .with_message("Please enter your name."),
            FormField::new("work-email")
                .required()
                .with_message("Please enter your work email."),
            FormField::new("phone"),
            FormField::new("country")
                .required()
                .with_message("Please select your country."),
            FormField::new("organization")
                .required()
                .with_message("Please enter your organization."),
            FormField::new("hear-about"),
            FormField::new("additional-info"),
        ])
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Set a value without triggering input handling, like a script would.
    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        match self.field_mut(name) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Submit-time check of every required field plus the email format.
    pub fn validate(&mut self) -> bool {
        let mut valid = true;

        for field in self.fields.iter_mut().filter(|f| f.required) {
            if field.is_blank() {
                valid = false;
                field.highlight(None);
            } else {
                field.clear();
            }

            if field.name == "work-email" && !field.is_blank() && !EMAIL_RE.is_match(&field.value) {
                valid = false;
                field.highlight(Some(INVALID_EMAIL_MESSAGE));
            }
        }

        valid
    }

    /// Leaving a field re-checks presence only.
    pub fn blur(&mut self, name: &str) {
        if let Some(field) = self.field_mut(name) {
            if field.required && field.is_blank() {
                field.highlight(None);
            } else {
                field.clear();
            }
        }
    }

    /// Typing clears the highlight once there is a value; the email format waits for submit.
    pub fn input(&mut self, name: &str, value: &str) {
        if let Some(field) = self.field_mut(name) {
            field.value = value.to_string();
            if !field.is_blank() {
                field.clear();
            }
        }
    }

    /// Clear every value. Highlights are left as they are.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
    }

    /// Name/value pairs in form order, as the browser would encode them.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> DemoForm {
        let mut form = DemoForm::demo_request();
        form.set_value("name", "Jane Doe");
        form.set_value("work-email", "jane@acme.com");
        form.set_value("country", "Norway");
        form.set_value("organization", "Acme AS");
        form
    }

    #[test]
    fn complete_form_is_valid() {
        let mut form = filled();
        assert!(form.validate());
        assert!(form.fields().iter().all(|f| !f.is_highlighted()));
    }

    #[test]
    fn blank_required_fields_use_their_message() {
        let mut form = filled();
        form.set_value("country", "   ");
        assert!(!form.validate());
        assert_eq!(
            form.field("country").unwrap().error(),
            Some("Please select your country.")
        );
        assert!(!form.field("name").unwrap().is_highlighted());
    }

    #[test]
    fn generic_message_without_field_message() {
        let mut form = DemoForm::new(vec![FormField::new("company").required()]);
        assert!(!form.validate());
        assert_eq!(form.field("company").unwrap().error(), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn malformed_email_fails_even_when_present() {
        for bad in ["not-an-email", "jane@acme", "jane doe@acme.com", "@acme.com"] {
            let mut form = filled();
            form.set_value("work-email", bad);
            assert!(!form.validate(), "{bad} should be rejected");
            assert_eq!(
                form.field("work-email").unwrap().error(),
                Some(INVALID_EMAIL_MESSAGE)
            );
        }
    }

    #[test]
    fn email_pattern_accepts_short_domains() {
        let mut form = filled();
        form.set_value("work-email", "a@b.co");
        assert!(form.validate());
    }

    #[test]
    fn blur_checks_presence_only() {
        let mut form = DemoForm::demo_request();
        form.blur("organization");
        assert!(form.field("organization").unwrap().is_highlighted());

        form.input("work-email", "not-an-email");
        form.blur("work-email");
        assert!(!form.field("work-email").unwrap().is_highlighted());

        form.blur("phone");
        assert!(!form.field("phone").unwrap().is_highlighted());
    }

    #[test]
    fn input_clears_without_rechecking_email() {
        let mut form = filled();
        form.set_value("work-email", "broken");
        assert!(!form.validate());

        form.input("work-email", "still broken");
        assert!(!form.field("work-email").unwrap().is_highlighted());

        form.input("work-email", "   ");
        assert!(!form.field("work-email").unwrap().is_highlighted());
    }

    #[test]
    fn reset_clears_values() {
        let mut form = filled();
        form.reset();
        assert!(form.pairs().iter().all(|(_, v)| v.is_empty()));
    }
}
