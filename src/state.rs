use std::sync::Arc;

use crate::audit::AuditLog;
use crate::config::Config;
use crate::email::MailSender;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub mailer: Option<Arc<dyn MailSender>>,
    pub audit: Arc<dyn AuditLog>,
}
