//! LINE Messaging API channel — push messages, token replies, webhook
//! signature verification.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use restock_core::config::LineConfig;
use restock_core::{Messenger, Result, RestockError};
use sha2::Sha256;

const API_BASE: &str = "https://api.line.me";

/// LINE Messaging API channel.
pub struct LineChannel {
    config: LineConfig,
    client: reqwest::Client,
    api_base: String,
}

impl LineChannel {
    pub fn new(config: LineConfig) -> Self {
        let client = reqwest::Client::builder()
            .default_headers({
                let mut h = reqwest::header::HeaderMap::new();
                if let Ok(auth) = format!("Bearer {}", config.channel_access_token).parse() {
                    h.insert("Authorization", auth);
                }
                h
            })
            .build()
            .unwrap_or_default();

        Self { config, client, api_base: API_BASE.into() }
    }

    /// Verify the `X-Line-Signature` header: base64 of the HMAC-SHA256 of
    /// the raw request body, keyed by the channel secret.
    pub fn verify_signature(&self, body: &[u8], signature: &str) -> bool {
        compute_signature(&self.config.channel_secret, body)
            .map(|expected| expected == signature)
            .unwrap_or(false)
    }

    /// Whether a channel secret is configured; without one, webhook
    /// signatures cannot be checked.
    pub fn can_verify(&self) -> bool {
        !self.config.channel_secret.is_empty()
    }

    async fn post_message(&self, endpoint: &str, body: serde_json::Value) -> Result<()> {
        let url = format!("{}{endpoint}", self.api_base);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RestockError::Delivery(format!("LINE send failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(RestockError::Delivery(format!("LINE {status}: {text}")));
        }
        Ok(())
    }
}

#[async_trait]
impl Messenger for LineChannel {
    async fn push(&self, to: &str, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "to": to,
            "messages": [{ "type": "text", "text": text }],
        });
        self.post_message("/v2/bot/message/push", body).await?;
        tracing::debug!(target = %to, "push message sent");
        Ok(())
    }

    async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "replyToken": reply_token,
            "messages": [{ "type": "text", "text": text }],
        });
        self.post_message("/v2/bot/message/reply", body).await
    }
}

fn compute_signature(secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(BASE64.encode(mac.finalize().into_bytes()))
}
