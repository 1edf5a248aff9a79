//! Order forwarding to the downstream POS collaborator.
//!
//! The order is POSTed as a plain JSON record with a bearer key; whatever
//! shape the POS actually wants (dining options, address mapping, retries)
//! is its adapter's concern, not ours. Forwarding failures are logged and
//! never fail the webhook.

use serde_json::json;

use tandoor_types::Order;

pub struct PosClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl PosClient {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key,
        }
    }

    /// Submits an order downstream. Best-effort: every failure path is a
    /// log line, not an error.
    pub async fn submit(&self, order: &Order) {
        let mut request = self.client.post(&self.url).json(&json!({ "order": order }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(
                    customer = %order.customer_name,
                    items = order.items.len(),
                    total = %order.total,
                    "order forwarded to pos"
                );
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "pos rejected the order");
            }
            Err(e) => {
                tracing::warn!(error = %e, "pos submission failed");
            }
        }
    }
}
