use crate::audit::{self, AuditEntry, AuditStatus};
use crate::config::ValidationPolicy;
use crate::email::templates;
use crate::email::{DeliveryOutcome, OutgoingMail};
use crate::state::AppState;

use super::fields::{DemoRequest, FieldError};
use super::metadata::RequestContext;

#[derive(Debug, PartialEq)]
pub enum PipelineResult {
    /// Valid submission; the notification was handed to the mail sender.
    Accepted(DeliveryOutcome),
    /// Failed validation; nothing was mailed.
    Rejected(Vec<FieldError>),
}

pub async fn run(
    state: &AppState,
    context: &RequestContext,
    request: &DemoRequest,
) -> PipelineResult {
    let errors = request.validate();

    if !errors.is_empty() {
        let mut entry = AuditEntry {
            status: AuditStatus::ValidationFailed,
            context,
            request,
            errors: &errors,
        };
        audit::record(state.audit.as_ref(), &entry).await;

        if state.config.validation_policy == ValidationPolicy::Lenient {
            entry.status = AuditStatus::ValidationFailedButAccepted;
            audit::record(state.audit.as_ref(), &entry).await;
        }

        tracing::info!(
            "Demo request from {} failed validation: {}",
            context.ip_or_unknown(),
            errors
                .iter()
                .map(|e| e.message())
                .collect::<Vec<_>>()
                .join(", ")
        );
        return PipelineResult::Rejected(errors);
    }

    // Recorded before any mail I/O so a hung or failed send still leaves a trace
    let mut entry = AuditEntry {
        status: AuditStatus::ValidationPassed,
        context,
        request,
        errors: &[],
    };
    audit::record(state.audit.as_ref(), &entry).await;

    let mail = OutgoingMail {
        to: state.config.recipient.clone(),
        from: state.config.from.clone(),
        reply_to: request.email.clone(),
        subject: templates::render_subject(request),
        body: templates::render_notification(request, context),
    };

    let outcome = deliver(state, &mail).await;

    entry.status = match &outcome {
        DeliveryOutcome::Sent => {
            tracing::info!("Demo request submitted successfully from: {}", request.email);
            AuditStatus::EmailSentSuccess
        }
        DeliveryOutcome::Failed(reason) => {
            tracing::error!("Mail failed for demo request from {}: {reason}", request.email);
            AuditStatus::EmailSentFailed
        }
    };
    audit::record(state.audit.as_ref(), &entry).await;

    PipelineResult::Accepted(outcome)
}

async fn deliver(state: &AppState, mail: &OutgoingMail) -> DeliveryOutcome {
    let Some(mailer) = &state.mailer else {
        return DeliveryOutcome::Failed("No mail transport configured".to_string());
    };

    let timeout = state.config.mail_timeout;
    match tokio::time::timeout(timeout, mailer.send(mail)).await {
        Ok(outcome) => outcome,
        Err(_) => DeliveryOutcome::Failed(format!(
            "Mail sender timed out after {}ms",
            timeout.as_millis()
        )),
    }
}
