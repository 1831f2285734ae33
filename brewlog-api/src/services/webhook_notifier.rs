//! Backup webhook notifier
//!
//! One-shot POST of the serialized bean collection to a user-supplied
//! webhook URL. Fire-and-forget: the response body is ignored, delivery is
//! unconfirmed, and failures are logged but never retried.

use brewlog_common::models::CoffeeBean;
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const ORIGIN: &str = "brewlog-api";

/// Envelope posted to the webhook URL
#[derive(Debug, Serialize)]
pub struct BackupEnvelope {
    pub timestamp: String,
    pub origin: String,
    pub beans: Vec<CoffeeBean>,
}

/// Outbound backup notification client
pub struct BackupNotifier {
    http_client: reqwest::Client,
}

impl BackupNotifier {
    pub fn new() -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { http_client })
    }

    /// POST the collection to the webhook URL; outcome is logged only
    pub async fn send_backup(&self, url: &str, beans: Vec<CoffeeBean>) {
        let bean_count = beans.len();
        let envelope = BackupEnvelope {
            timestamp: Utc::now().to_rfc3339(),
            origin: ORIGIN.to_string(),
            beans,
        };

        match self.http_client.post(url).json(&envelope).send().await {
            Ok(response) => {
                // Response body is ignored; only the status is worth a log line
                info!(
                    status = response.status().as_u16(),
                    bean_count, "Backup webhook delivered"
                );
            }
            Err(e) => {
                warn!("Backup webhook failed: {}", e);
            }
        }
    }
}
