//! Enrichment service client
//!
//! Calls an external text-completion API to auto-fill bean details or
//! generate purchase recommendations. The reply is expected to be JSON but
//! routinely arrives wrapped in markdown code fences or sprinkled with
//! line comments; both are stripped before parsing. Requests carry a fixed
//! 60 second deadline and are never retried.

use brewlog_common::models::CoffeeBean;
use brewlog_common::normalize::ExternalBeanRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Enrichment client errors
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("No enrichment API key configured")]
    MissingApiKey,

    #[error("Enrichment request timed out")]
    TimedOut,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Could not parse enrichment response: {0}")]
    Parse(String),
}

/// A recommendation produced from the user's collection; stored with
/// rank 0 as a not-yet-rated placeholder if the user adds it
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Recommendation {
    pub name: String,
    pub roaster: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Text-completion API client
pub struct EnrichmentClient {
    http_client: reqwest::Client,
}

impl EnrichmentClient {
    pub fn new() -> Result<Self, EnrichmentError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Look up details for one bean by name and roaster
    pub async fn lookup_details(
        &self,
        api_key: &str,
        name: &str,
        roaster: &str,
    ) -> Result<ExternalBeanRecord, EnrichmentError> {
        let prompt = format!(
            "Look up the coffee \"{}\" from the roaster \"{}\". Respond with a single JSON \
             object with these fields: name, roaster, origin, roast_level (one of Light, \
             Medium-Light, Medium, Medium-Dark, Dark), price (USD), weight_oz (bag weight in \
             ounces), brew_params (espresso recipe as \"<dose>g in, <yield>g out in <time>s\"), \
             grind_size, temperature (celsius), notes (array of tasting notes), and sources \
             (array of strings naming where each piece of information came from, including \
             URLs where available). Use null for anything you cannot determine.",
            name, roaster
        );

        let content = self.complete(api_key, &prompt).await?;
        let cleaned = clean_json_payload(&content);

        serde_json::from_str(&cleaned).map_err(|e| EnrichmentError::Parse(e.to_string()))
    }

    /// Generate purchase recommendations from the current collection
    pub async fn recommend(
        &self,
        api_key: &str,
        beans: &[CoffeeBean],
    ) -> Result<Vec<Recommendation>, EnrichmentError> {
        let collection: Vec<String> = beans
            .iter()
            .map(|b| {
                format!(
                    "- {} by {} (rank {}/5, notes: {})",
                    b.name,
                    b.roaster,
                    b.rank,
                    b.notes.join(", ")
                )
            })
            .collect();

        let prompt = format!(
            "Here is a coffee journal:\n{}\n\nSuggest 3 coffees this person has not tried and \
             would likely enjoy. Respond with a JSON array of objects with fields: name, \
             roaster, reason, notes (array of expected tasting notes).",
            collection.join("\n")
        );

        let content = self.complete(api_key, &prompt).await?;
        let cleaned = clean_json_payload(&content);

        serde_json::from_str(&cleaned).map_err(|e| EnrichmentError::Parse(e.to_string()))
    }

    /// One completion round-trip; returns the raw assistant message text
    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, EnrichmentError> {
        tracing::debug!(model = MODEL, "Sending enrichment request");

        let body = serde_json::json!({
            "model": MODEL,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .http_client
            .post(COMPLETIONS_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnrichmentError::TimedOut
                } else {
                    EnrichmentError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Api(status.as_u16(), error_text));
        }

        let payload: CompletionResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| EnrichmentError::Parse("response contained no choices".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Strip markdown code fencing and line comments from a JSON payload.
///
/// The completion service wraps JSON in ```json fences more often than not,
/// and occasionally annotates fields with // comments.
pub fn clean_json_payload(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(start) = text.find("```") {
        let after = &text[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        let after = after.trim_start();
        text = match after.find("```") {
            Some(end) => &after[..end],
            None => after,
        };
    }

    strip_line_comments(text).trim().to_string()
}

/// Remove // comments that appear outside of string literals
fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                // Skip to end of line, keeping the newline
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(EnrichmentClient::new().is_ok());
    }

    #[test]
    fn test_clean_plain_json_unchanged() {
        let raw = r#"{"name": "Geometry", "price": 18.0}"#;
        assert_eq!(clean_json_payload(raw), raw);
    }

    #[test]
    fn test_clean_strips_json_fence() {
        let raw = "```json\n{\"name\": \"Geometry\"}\n```";
        assert_eq!(clean_json_payload(raw), "{\"name\": \"Geometry\"}");
    }

    #[test]
    fn test_clean_strips_bare_fence() {
        let raw = "```\n[1, 2, 3]\n```";
        assert_eq!(clean_json_payload(raw), "[1, 2, 3]");
    }

    #[test]
    fn test_clean_strips_fence_with_preamble() {
        let raw = "Here is the data you asked for:\n```json\n{\"a\": 1}\n```\nLet me know!";
        assert_eq!(clean_json_payload(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_clean_strips_line_comments() {
        let raw = "{\n  \"price\": 18.0, // in USD\n  \"weight_oz\": 10\n}";
        let cleaned = clean_json_payload(raw);
        let parsed: serde_json::Value = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(parsed["price"], 18.0);
        assert_eq!(parsed["weight_oz"], 10);
    }

    #[test]
    fn test_clean_preserves_slashes_inside_strings() {
        let raw = r#"{"url": "https://onyxcoffeelab.com/products"}"#;
        let cleaned = clean_json_payload(raw);
        let parsed: serde_json::Value = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(parsed["url"], "https://onyxcoffeelab.com/products");
    }

    #[test]
    fn test_cleaned_payload_parses_as_external_record() {
        let raw = "```json\n{\n  \"name\": \"Hair Bender\", // flagship blend\n  \
                   \"roaster\": \"Stumptown\",\n  \"price\": \"$17.00\",\n  \
                   \"weight_oz\": 12,\n  \"brew_params\": \"18g in, 36g out in 25-30s\"\n}\n```";
        let cleaned = clean_json_payload(raw);
        let record: ExternalBeanRecord = serde_json::from_str(&cleaned).unwrap();
        assert_eq!(record.name.as_deref(), Some("Hair Bender"));
        assert_eq!(record.brew_params.as_deref(), Some("18g in, 36g out in 25-30s"));
    }
}
