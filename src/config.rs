use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use ipnet::IpNet;
use lettre::message::Mailbox;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub path: String,
    pub allowed_origin: String,
    pub recipient: String,
    pub from: String,
    pub log_file: PathBuf,
    pub validation_policy: ValidationPolicy,
    pub mail_timeout: Duration,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub log_level: String,
    pub mail: Option<MailTransportConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
}

#[derive(Debug, Clone)]
pub enum MailTransportConfig {
    Smtp(SmtpConfig),
    /// Local sendmail binary; `None` uses the transport's default command.
    Sendmail(Option<String>),
}

/// What the caller learns when a submission fails validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidationPolicy {
    /// Report the failures with a 400 and the list of messages.
    Strict,
    /// Log the failures and answer with the regular success payload.
    Lenient,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup, the process environment
    /// being the usual one.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let env_required = |key: &str| {
            lookup(key).ok_or_else(|| format!("Missing required environment variable: {key}"))
        };
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let recipient = mailbox("INTAKE_RECIPIENT", env_required("INTAKE_RECIPIENT")?)?;
        let from = mailbox("INTAKE_FROM", env_required("INTAKE_FROM")?)?;
        let allowed_origin = env_required("INTAKE_ALLOWED_ORIGIN")?;

        let host: IpAddr = env_or("INTAKE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_HOST: {e}"))?;

        let port: u16 = env_or("INTAKE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_PORT: {e}"))?;

        let path = env_or("INTAKE_PATH", "/email-service");
        if !path.starts_with('/') {
            return Err(format!("Invalid INTAKE_PATH '{path}': must start with '/'"));
        }

        let log_file = PathBuf::from(env_or("INTAKE_LOG_FILE", "form-submissions.log"));

        let validation_policy = match env_or("INTAKE_VALIDATION_POLICY", "lenient").as_str() {
            "strict" => ValidationPolicy::Strict,
            "lenient" => ValidationPolicy::Lenient,
            other => return Err(format!("Invalid INTAKE_VALIDATION_POLICY: {other}")),
        };

        let mail_timeout_secs: u64 = env_or("INTAKE_MAIL_TIMEOUT_SECS", "10")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_MAIL_TIMEOUT_SECS: {e}"))?;

        let max_body_size: usize = env_or("INTAKE_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid INTAKE_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("INTAKE_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid INTAKE_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let log_level = env_or("INTAKE_LOG_LEVEL", "info");

        let smtp = match (
            lookup("INTAKE_SMTP_HOST"),
            lookup("INTAKE_SMTP_PORT"),
            lookup("INTAKE_SMTP_USER"),
            lookup("INTAKE_SMTP_PASS"),
        ) {
            (Some(host), Some(port), Some(user), Some(pass)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid INTAKE_SMTP_PORT: {e}"))?,
                user,
                pass,
            }),
            _ => None,
        };

        let mail = match (smtp, lookup("INTAKE_SENDMAIL")) {
            (Some(smtp), _) => Some(MailTransportConfig::Smtp(smtp)),
            (None, Some(value)) => match value.as_str() {
                "" | "0" | "false" => None,
                "1" | "true" => Some(MailTransportConfig::Sendmail(None)),
                command => Some(MailTransportConfig::Sendmail(Some(command.to_string()))),
            },
            (None, None) => None,
        };

        Ok(Config {
            host,
            port,
            path,
            allowed_origin,
            recipient,
            from,
            log_file,
            validation_policy,
            mail_timeout: Duration::from_secs(mail_timeout_secs),
            max_body_size,
            trusted_proxies,
            log_level,
            mail,
        })
    }
}

/// Addresses are checked at load so a typo fails startup instead of every send.
fn mailbox(key: &str, value: String) -> Result<String, String> {
    value
        .parse::<Mailbox>()
        .map_err(|e| format!("Invalid {key} '{value}': {e}"))?;
    Ok(value)
}
