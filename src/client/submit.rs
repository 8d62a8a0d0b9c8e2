use std::time::Duration;

use serde::Deserialize;

use super::validator::DemoForm;

pub const SENDING_LABEL: &str = "SENDING...";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred. Please try again later.";
pub const GENERIC_ERROR_MESSAGE: &str =
    "There was an error submitting your request. Please try again or contact us directly.";
pub const ERROR_LIST_HEADING: &str = "Please correct the following errors:";

pub const SUCCESS_DISMISS_AFTER: Duration = Duration::from_secs(5);
pub const MODAL_CLOSE_AFTER: Duration = Duration::from_secs(3);

/// The form's submit control.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitButton {
    pub label: String,
    pub disabled: bool,
    original_label: Option<String>,
}

impl SubmitButton {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            disabled: false,
            original_label: None,
        }
    }

    fn begin_sending(&mut self) {
        self.original_label = Some(std::mem::replace(&mut self.label, SENDING_LABEL.to_string()));
        self.disabled = true;
    }

    fn restore(&mut self) {
        if let Some(label) = self.original_label.take() {
            self.label = label;
        }
        self.disabled = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedbackKind {
    Success,
    Error,
}

/// What to show above the form once the server has answered.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
    /// Remove the message after this long. Errors stay until the next submit.
    pub dismiss_after: Option<Duration>,
    /// Close the enclosing modal after this long.
    pub close_modal_after: Option<Duration>,
}

/// JSON body returned by the intake endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerReply {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Feedback {
    pub fn from_reply(reply: ServerReply) -> Self {
        if reply.status == "success" {
            return Self {
                kind: FeedbackKind::Success,
                message: reply.message.unwrap_or_default(),
                dismiss_after: Some(SUCCESS_DISMISS_AFTER),
                close_modal_after: Some(MODAL_CLOSE_AFTER),
            };
        }

        let message = if !reply.errors.is_empty() {
            let mut message = ERROR_LIST_HEADING.to_string();
            for error in &reply.errors {
                message.push_str("\n• ");
                message.push_str(error);
            }
            message
        } else {
            reply
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
        };

        Self::error(message)
    }

    pub fn network_error() -> Self {
        Self::error(NETWORK_ERROR_MESSAGE.to_string())
    }

    fn error(message: String) -> Self {
        Self {
            kind: FeedbackKind::Error,
            message,
            dismiss_after: None,
            close_modal_after: None,
        }
    }
}

/// Sends a validated demo form to the intake endpoint.
pub struct DemoFormClient {
    http: reqwest::Client,
    endpoint: String,
}

impl DemoFormClient {
    pub fn new(endpoint: &str) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(http: reqwest::Client, endpoint: &str) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
        }
    }

    /// Validate and submit. Returns `None` when validation stopped the submit,
    /// leaving the highlights on the form to explain why.
    pub async fn submit(&self, form: &mut DemoForm, button: &mut SubmitButton) -> Option<Feedback> {
        if !form.validate() {
            return None;
        }

        button.begin_sending();

        let feedback = match self.post(form).await {
            Ok(reply) => Feedback::from_reply(reply),
            Err(e) => {
                tracing::warn!("Error submitting demo form: {e}");
                Feedback::network_error()
            }
        };

        if feedback.kind == FeedbackKind::Success {
            form.reset();
        }

        button.restore();
        Some(feedback)
    }

    async fn post(&self, form: &DemoForm) -> Result<ServerReply, reqwest::Error> {
        // Error statuses still carry a JSON reply with the validation messages
        self.http
            .post(&self.endpoint)
            .form(&form.pairs())
            .send()
            .await?
            .json::<ServerReply>()
            .await
    }
}
