use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use demo_intake::audit::FileAuditLog;
use demo_intake::config::{Config, ValidationPolicy};
use demo_intake::email::{DeliveryOutcome, MailSender, OutgoingMail};

pub const ENDPOINT: &str = "/email-service";
pub const ORIGIN: &str = "https://demo.example.com";
pub const RECIPIENT: &str = "sales@example.com";
pub const FROM: &str = "website@example.com";

/// Mail sender that keeps every message it was handed.
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    outcome: DeliveryOutcome,
    delay: Option<Duration>,
}

impl RecordingMailer {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            outcome: DeliveryOutcome::Sent,
            delay: None,
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            outcome: DeliveryOutcome::Failed(reason.to_string()),
            delay: None,
        })
    }

    pub fn hanging(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            outcome: DeliveryOutcome::Sent,
            delay: Some(delay),
        })
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> DeliveryOutcome {
        self.sent.lock().unwrap().push(mail.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}

/// A running test server writing to its own audit log file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub log_path: PathBuf,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn endpoint(&self) -> String {
        self.url(ENDPOINT)
    }

    /// Submit form-urlencoded data, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.endpoint())
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub fn log_contents(&self) -> String {
        std::fs::read_to_string(&self.log_path).unwrap_or_default()
    }

    /// Audit records in file order, each without its closing rule.
    pub fn records(&self) -> Vec<String> {
        self.log_contents()
            .split("==========================================\n\n")
            .filter(|r| !r.is_empty())
            .map(|r| r.to_string())
            .collect()
    }

    /// The `STATUS:` value of every record, in file order.
    pub fn statuses(&self) -> Vec<String> {
        self.log_contents()
            .lines()
            .filter_map(|l| l.strip_prefix("STATUS: "))
            .map(|s| s.to_string())
            .collect()
    }
}

pub fn test_config(policy: ValidationPolicy) -> Config {
    let log_file = std::env::temp_dir().join(format!(
        "demo_intake_test_{}.log",
        Uuid::now_v7().to_string().replace('-', "")
    ));

    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        path: ENDPOINT.to_string(),
        allowed_origin: ORIGIN.to_string(),
        recipient: RECIPIENT.to_string(),
        from: FROM.to_string(),
        log_file,
        validation_policy: policy,
        mail_timeout: Duration::from_secs(2),
        max_body_size: 16 * 1024,
        trusted_proxies: vec![],
        log_level: "warn".to_string(),
        mail: None,
    }
}

pub async fn spawn_app(policy: ValidationPolicy, mailer: Option<Arc<RecordingMailer>>) -> TestApp {
    spawn_app_with_config(test_config(policy), mailer).await
}

pub async fn spawn_app_with_config(config: Config, mailer: Option<Arc<RecordingMailer>>) -> TestApp {
    let log_path = config.log_file.clone();
    let audit = Arc::new(FileAuditLog::new(log_path.clone()));
    let mailer = mailer.map(|m| m as Arc<dyn MailSender>);

    let app = demo_intake::build_app(config, mailer, audit).expect("Failed to build app");

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        log_path,
    }
}

/// Remove the test's audit log.
pub fn cleanup(app: TestApp) {
    let _ = std::fs::remove_file(&app.log_path);
}

pub fn jane() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Jane Doe"),
        ("work-email", "jane@acme.com"),
        ("country", "Norway"),
        ("organization", "Acme AS"),
    ]
}
