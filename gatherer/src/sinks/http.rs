//! HTTP endpoint sink.
//!
//! Every row (and the header at session start) is POSTed as the JSON string
//! serialization of the row text, with the literal `application-json` content
//! type the receiving endpoint expects. Sends are fire-and-forget tasks that
//! may overlap; failures are logged and never retried, giving at-most-once
//! delivery per sample.

use reqwest::header::CONTENT_TYPE;
use url::Url;

const ROW_CONTENT_TYPE: &str = "application-json";

#[derive(Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpSink {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Spawns one POST for `row` and returns immediately. The spawned task
    /// owns the request end to end; nothing awaits it and nothing aborts it.
    pub fn post(&self, row: String) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        tokio::spawn(async move {
            let body = match serde_json::to_string(&row) {
                Ok(body) => body,
                Err(err) => {
                    error!(%err, "failed to serialize export row");
                    return;
                }
            };
            match client
                .post(endpoint.clone())
                .header(CONTENT_TYPE, ROW_CONTENT_TYPE)
                .body(body)
                .send()
                .await
            {
                Ok(response) => debug!(status = %response.status(), "posted export row"),
                Err(err) => warn!(endpoint = %endpoint, %err, "failed to post export row"),
            }
        });
    }
}
