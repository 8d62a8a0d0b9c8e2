pub mod file;

use std::fmt::Write;

use async_trait::async_trait;

use crate::submission::fields::{DemoRequest, FieldError};
use crate::submission::metadata::RequestContext;

pub use file::FileAuditLog;

const RULE_HEAVY: &str = "==========================================";
const RULE_LIGHT: &str = "------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    ValidationFailed,
    ValidationPassed,
    ValidationFailedButAccepted,
    EmailSentSuccess,
    EmailSentFailed,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::ValidationFailed => "VALIDATION_FAILED",
            AuditStatus::ValidationPassed => "VALIDATION_PASSED",
            AuditStatus::ValidationFailedButAccepted => "VALIDATION_FAILED_BUT_ACCEPTED",
            AuditStatus::EmailSentSuccess => "EMAIL_SENT_SUCCESS",
            AuditStatus::EmailSentFailed => "EMAIL_SENT_FAILED",
        }
    }

    /// The `EMAIL STATUS` line, only written for mail outcome records.
    pub fn email_status(&self) -> Option<&'static str> {
        match self {
            AuditStatus::EmailSentSuccess => Some("SUCCESS"),
            AuditStatus::EmailSentFailed => Some("FAILED"),
            _ => None,
        }
    }
}

/// One audit record: a submission attempt at a given stage of handling.
pub struct AuditEntry<'a> {
    pub status: AuditStatus,
    pub context: &'a RequestContext,
    pub request: &'a DemoRequest,
    pub errors: &'a [FieldError],
}

impl AuditEntry<'_> {
    /// The complete record block, trailing blank line included.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{RULE_HEAVY}");
        let _ = writeln!(out, "SUBMISSION TIME: {}", self.context.timestamp());
        let _ = writeln!(out, "STATUS: {}", self.status.as_str());
        if let Some(email_status) = self.status.email_status() {
            let _ = writeln!(out, "EMAIL STATUS: {email_status}");
        }
        let _ = writeln!(out, "IP ADDRESS: {}", self.context.ip_or_unknown());
        let _ = writeln!(out, "USER AGENT: {}", self.context.user_agent_or_unknown());
        let _ = writeln!(out, "{RULE_LIGHT}");
        out.push_str("FORM DATA:\n");

        for (field, value) in self.request.log_fields() {
            if value.is_empty() {
                let _ = writeln!(out, "  {field}: Not provided");
                continue;
            }
            // Continuation lines keep the field indent so no value can
            // reproduce a rule at the start of a line.
            let mut lines = value.lines();
            let _ = writeln!(out, "  {field}: {}", lines.next().unwrap_or_default());
            for line in lines {
                let _ = writeln!(out, "    {line}");
            }
        }

        if !self.errors.is_empty() {
            let _ = writeln!(out, "{RULE_LIGHT}");
            out.push_str("VALIDATION ERRORS:\n");
            for error in self.errors {
                let _ = writeln!(out, "  - {error}");
            }
        }

        let _ = writeln!(out, "{RULE_HEAVY}");
        out.push('\n');
        out
    }
}

/// Destination for audit records. Each call appends one whole record.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record(&self, entry: &AuditEntry<'_>) -> std::io::Result<()>;
}

/// Record an audit entry, reporting but not propagating write failures.
pub async fn record(log: &dyn AuditLog, entry: &AuditEntry<'_>) {
    if let Err(e) = log.record(entry).await {
        tracing::error!(
            "Failed to write {} audit record: {e}",
            entry.status.as_str()
        );
    }
}
