//! Per-lead notification messages
//!
//! A batch sends one message per lead and records each outcome in order.
//! A failed send is logged and recorded; it never stops the batch and is
//! never retried.

use std::cell::Cell;
use std::time::Duration;

use chrono::Utc;
use log::{error, info};
use regex::Regex;
use reqwest::blocking::Client;

use crate::config::{secret_from_env, ChannelConfig};
use crate::error::{AdapterResult, DashboardError};
use crate::types::{Lead, NotifyOutcome, NotifyReport, SendStatus};

const PLACEHOLDER_PATTERN: &str = r"\{(\w+)\}";

pub const KNOWN_PLACEHOLDERS: &[&str] = &["name", "platform", "phone", "status"];

pub trait Notifier {
    /// Deliver `message` to `phone`, returning the transport's message id
    fn send(&self, phone: &str, message: &str) -> AdapterResult<String>;

    fn name(&self) -> &'static str;
}

/// Pretends to deliver over WhatsApp; every send succeeds
#[derive(Default)]
pub struct StubNotifier {
    sent: Cell<u64>,
}

impl StubNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for StubNotifier {
    fn send(&self, phone: &str, message: &str) -> AdapterResult<String> {
        let seq = self.sent.get() + 1;
        self.sent.set(seq);

        let preview: String = message.chars().take(50).collect();
        println!("[WHATSAPP] Message sent to {}: {}...", phone, preview);

        Ok(format!("WA_{}_{}", Utc::now().timestamp_micros(), seq))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// Posts `{"phone": ..., "message": ...}` to a messaging gateway
pub struct WebhookNotifier {
    client: Client,
    url: String,
    token: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: String, token: Option<String>) -> AdapterResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DashboardError::Send(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { client, url, token })
    }
}

impl Notifier for WebhookNotifier {
    fn send(&self, phone: &str, message: &str) -> AdapterResult<String> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "phone": phone, "message": message }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| DashboardError::Send(format!("request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Send(format!("HTTP {} from {}", status.as_u16(), self.url)));
        }

        let body: serde_json::Value = response.json().unwrap_or(serde_json::Value::Null);
        Ok(extract_message_id(&body).unwrap_or_else(|| format!("HTTP_{}", status.as_u16())))
    }

    fn name(&self) -> &'static str {
        "webhook"
    }
}

/// Gateways answer with `{"id"}`, `{"message_id"}` or `{"messages": [{"id"}]}`
fn extract_message_id(body: &serde_json::Value) -> Option<String> {
    body.get("id")
        .or_else(|| body.get("message_id"))
        .or_else(|| body.get("messages").and_then(|m| m.get(0)).and_then(|m| m.get("id")))
        .and_then(|v| match v {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

pub fn notifier_from_config(config: &ChannelConfig) -> AdapterResult<Box<dyn Notifier>> {
    Ok(match config {
        ChannelConfig::Stub => Box::new(StubNotifier::new()),
        ChannelConfig::Webhook { url, token_env } => Box::new(WebhookNotifier::new(
            url.clone(),
            secret_from_env(token_env.as_deref()),
        )?),
    })
}

/// Fill `{name}`, `{platform}`, `{phone}` and `{status}`; unknown placeholders stay as written
pub fn render_message(template: &str, lead: &Lead) -> String {
    let Ok(re) = Regex::new(PLACEHOLDER_PATTERN) else {
        return template.to_string();
    };

    re.replace_all(template, |caps: &regex::Captures| match &caps[1] {
        "name" => lead.name.clone(),
        "platform" => lead.platform.clone(),
        "phone" => lead.phone.clone(),
        "status" => lead.status.clone(),
        _ => caps[0].to_string(),
    })
    .into_owned()
}

/// Placeholders in the template that `render_message` does not fill
pub fn unknown_placeholders(template: &str) -> Vec<String> {
    let Ok(re) = Regex::new(PLACEHOLDER_PATTERN) else {
        return vec![];
    };

    re.captures_iter(template)
        .map(|caps| caps[1].to_string())
        .filter(|key| !KNOWN_PLACEHOLDERS.contains(&key.as_str()))
        .collect()
}

/// Send one message per lead, continuing past failures
pub fn notify_all(leads: &[Lead], template: &str, notifier: &dyn Notifier) -> NotifyReport {
    let mut report = NotifyReport::default();

    for lead in leads {
        let status = if lead.phone.trim().is_empty() {
            error!("No phone number for {}; message not sent", lead.name);
            SendStatus::Failed {
                details: "missing phone number".to_string(),
            }
        } else {
            let message = render_message(template, lead);
            match notifier.send(&lead.phone, &message) {
                Ok(message_id) => SendStatus::Sent { message_id },
                Err(e) => {
                    error!("Failed to notify {} via {}: {}", lead.name, notifier.name(), e);
                    SendStatus::Failed {
                        details: e.to_string(),
                    }
                }
            }
        };

        report.outcomes.push(NotifyOutcome {
            name: lead.name.clone(),
            phone: lead.phone.clone(),
            status,
        });
    }

    info!(
        "Notification batch finished: {} sent, {} failed",
        report.sent_count(),
        report.failed_count()
    );
    report
}

/// One line per lead, then a totals line
pub fn format_notify_report(report: &NotifyReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        match &outcome.status {
            SendStatus::Sent { message_id } => {
                out.push_str(&format!("✅ Message sent to {} ({})\n", outcome.name, message_id));
            }
            SendStatus::Failed { details } => {
                out.push_str(&format!("❌ Failed to send to {}: {}\n", outcome.name, details));
            }
        }
    }
    out.push_str(&format!(
        "{} sent, {} failed\n",
        report.sent_count(),
        report.failed_count()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CannedServer;

    struct FlakyNotifier {
        fail_phone: &'static str,
        calls: Cell<usize>,
    }

    impl Notifier for FlakyNotifier {
        fn send(&self, phone: &str, _message: &str) -> AdapterResult<String> {
            self.calls.set(self.calls.get() + 1);
            if phone == self.fail_phone {
                Err(DashboardError::Send("gateway timeout".to_string()))
            } else {
                Ok(format!("id-{}", phone))
            }
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    fn lead(name: &str, phone: &str) -> Lead {
        Lead {
            name: name.to_string(),
            phone: phone.to_string(),
            platform: "Instagram".to_string(),
            status: "New".to_string(),
            interaction: String::new(),
            value: None,
            date: None,
        }
    }

    #[test]
    fn test_render_message() {
        let msg = render_message(
            "Hello {name}! Thanks for reaching out via {platform}. {unknown}",
            &lead("Ana", "1"),
        );
        assert_eq!(msg, "Hello Ana! Thanks for reaching out via Instagram. {unknown}");
    }

    #[test]
    fn test_unknown_placeholders() {
        assert!(unknown_placeholders("Hi {name} on {platform}").is_empty());
        assert_eq!(unknown_placeholders("Hi {nome} {name}"), vec!["nome"]);
    }

    #[test]
    fn test_partial_failure_continues_in_order() {
        let leads = vec![lead("Ana", "1"), lead("Bia", "2"), lead("Caio", "3"), lead("Duda", "4")];
        let notifier = FlakyNotifier {
            fail_phone: "2",
            calls: Cell::new(0),
        };

        let report = notify_all(&leads, "Hi {name}", &notifier);
        assert_eq!(notifier.calls.get(), 4);
        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.sent_count(), 3);

        let names: Vec<_> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bia", "Caio", "Duda"]);
        assert!(matches!(report.outcomes[1].status, SendStatus::Failed { .. }));
        assert_eq!(
            report.outcomes[3].status,
            SendStatus::Sent {
                message_id: "id-4".to_string()
            }
        );
    }

    #[test]
    fn test_missing_phone_is_failure_without_send() {
        let notifier = FlakyNotifier {
            fail_phone: "",
            calls: Cell::new(0),
        };
        let report = notify_all(&[lead("Ana", " ")], "Hi", &notifier);
        assert_eq!(notifier.calls.get(), 0);
        assert_eq!(report.failed_count(), 1);
    }

    #[test]
    fn test_stub_always_succeeds_with_unique_ids() {
        let stub = StubNotifier::new();
        let a = stub.send("5511999990000", "Hello").unwrap();
        let b = stub.send("5511999990000", "Hello").unwrap();
        assert!(a.starts_with("WA_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_webhook_posts_phone_and_message() {
        let server = CannedServer::start(
            "200 OK",
            "application/json",
            r#"{"messages":[{"id":"wamid.42"}]}"#,
        );
        let notifier = WebhookNotifier::new(format!("{}/send", server.url), Some("wa".to_string())).unwrap();

        assert_eq!(notifier.send("5511999990001", "Hi Ana").unwrap(), "wamid.42");

        let request = server.request();
        assert!(request.starts_with("POST /send "));
        assert!(request.to_lowercase().contains("authorization: bearer wa"));
        assert!(request.contains(r#""phone":"5511999990001""#));
        assert!(request.contains(r#""message":"Hi Ana""#));
    }

    #[test]
    fn test_webhook_rejection_is_send_error() {
        let server = CannedServer::start("500 Internal Server Error", "application/json", "{}");
        let notifier = WebhookNotifier::new(server.url.clone(), None).unwrap();
        match notifier.send("5511999990001", "Hi") {
            Err(DashboardError::Send(msg)) => assert!(msg.contains("HTTP 500")),
            other => panic!("expected send error, got {:?}", other),
        }
        server.request();
    }

    #[test]
    fn test_webhook_rejection_is_recorded_in_batch() {
        let server = CannedServer::start("429 Too Many Requests", "application/json", "{}");
        let notifier = WebhookNotifier::new(server.url.clone(), None).unwrap();
        let report = notify_all(&[lead("Ana", "1")], "Hi {name}", &notifier);
        assert_eq!(report.failed_count(), 1);
        server.request();
    }

    #[test]
    fn test_extract_message_id() {
        assert_eq!(
            extract_message_id(&serde_json::json!({"messages": [{"id": "wamid.1"}]})),
            Some("wamid.1".to_string())
        );
        assert_eq!(extract_message_id(&serde_json::json!({"id": 42})), Some("42".to_string()));
        assert_eq!(extract_message_id(&serde_json::Value::Null), None);
    }

    #[test]
    fn test_format_notify_report() {
        let report = NotifyReport {
            outcomes: vec![
                NotifyOutcome {
                    name: "Ana".to_string(),
                    phone: "1".to_string(),
                    status: SendStatus::Sent {
                        message_id: "WA_1".to_string(),
                    },
                },
                NotifyOutcome {
                    name: "Bia".to_string(),
                    phone: "2".to_string(),
                    status: SendStatus::Failed {
                        details: "boom".to_string(),
                    },
                },
            ],
        };
        let text = format_notify_report(&report);
        assert!(text.contains("✅ Message sent to Ana (WA_1)"));
        assert!(text.contains("❌ Failed to send to Bia: boom"));
        assert!(text.ends_with("1 sent, 1 failed\n"));
    }
}
