use serde::Serialize;

/// One outbound email, ready for the external relay.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Boundary to the external mail collaborator. Delivery is fire-and-forget:
/// the workflow transition that triggered the email has already committed,
/// so a send failure is logged and never propagated.
pub trait Mailer: Send + Sync {
    fn send(&self, email: OutboundEmail);
}

/// Posts emails as JSON to an HTTP relay in a background task.
pub struct HttpMailer {
    client: reqwest::Client,
    relay_url: String,
}

impl HttpMailer {
    pub fn new(relay_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url,
        }
    }
}

impl Mailer for HttpMailer {
    fn send(&self, email: OutboundEmail) {
        let client = self.client.clone();
        let relay_url = self.relay_url.clone();

        tokio::spawn(async move {
            let result = client.post(&relay_url).json(&email).send().await;
            match result {
                Ok(resp) if resp.status().is_success() => {
                    tracing::info!("Sent \"{}\" to {:?}", email.subject, email.to);
                }
                Ok(resp) => {
                    tracing::error!(
                        "Mail relay rejected \"{}\" with status {}",
                        email.subject,
                        resp.status()
                    );
                }
                Err(e) => {
                    tracing::error!("Mail relay unreachable: {}", e);
                }
            }
        });
    }
}

/// Logs instead of sending. Used when no relay is configured and in tests.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, email: OutboundEmail) {
        tracing::info!(
            "Mail (not sent, no relay configured): \"{}\" to {:?}",
            email.subject,
            email.to
        );
    }
}
