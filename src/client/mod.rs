//! Browser-side demo form behaviour: field validation, the submit control,
//! and turning the endpoint's reply into feedback for the visitor.

pub mod submit;
pub mod validator;

pub use submit::{DemoFormClient, Feedback, FeedbackKind, SubmitButton};
pub use validator::{DemoForm, FormField};
