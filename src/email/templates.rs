use std::fmt::Write;

use crate::submission::fields::DemoRequest;
use crate::submission::metadata::RequestContext;

const RULE: &str = "================================";

pub fn render_subject(request: &DemoRequest) -> String {
    format!("New Demo Request from {}", request.organization)
}

/// Plain-text notification body sent to the operator.
pub fn render_notification(request: &DemoRequest, context: &RequestContext) -> String {
    let phone = or_default(&request.phone, "Not provided");
    let hear_about = or_default(&request.hear_about, "Not specified");

    let mut body = format!(
        "NEW DEMO REQUEST RECEIVED\n\n\
         {RULE}\n\
         CONTACT INFORMATION:\n\
         {RULE}\n\
         Name: {}\n\
         Email: {}\n\
         Phone: {phone}\n\
         Country: {}\n\
         Organization: {}\n\
         How they heard about us: {hear_about}\n\n",
        request.name, request.email, request.country, request.organization,
    );

    if !request.additional_info.is_empty() {
        let _ = write!(
            body,
            "ADDITIONAL INFORMATION:\n{RULE}\n{}\n\n",
            request.additional_info
        );
    }

    let _ = write!(
        body,
        "SUBMISSION DETAILS:\n\
         {RULE}\n\
         Submitted on: {}\n\
         IP Address: {}\n\
         User Agent: {}\n",
        context.timestamp(),
        context.ip_or_unknown(),
        context.user_agent_or_unknown(),
    );

    body
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}
