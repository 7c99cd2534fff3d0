use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Errors returned by [`InspectorClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The inspector answered with a non-success status.
    #[error("inspector returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid inspector url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRules {
    pub name: String,
    pub rules: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayOutcome {
    pub status: u16,
    pub status_text: String,
    pub body: Value,
}

/// One event as seen on the `/api/events` stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamedEvent {
    pub id: u64,
    pub received_at: String,
    pub headers: Value,
    pub body: Value,
}

pub struct InspectorClient {
    client: Client,
    base_url: String,
}

impl InspectorClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// `/api/configs/<name>` with the name as a single encoded path segment.
    fn config_url(&self, name: &str) -> Result<Url, ClientError> {
        let mut url =
            Url::parse(&self.api("/configs")).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .push(name);
        Ok(url)
    }

    pub async fn list_configs(&self) -> Result<Vec<String>, ClientError> {
        let body = decode(self.client.get(self.api("/configs")).send().await?).await?;
        Ok(serde_json::from_value(body["names"].clone())?)
    }

    pub async fn get_config(&self, name: &str) -> Result<ConfigRules, ClientError> {
        let body = decode(self.client.get(self.config_url(name)?).send().await?).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Save `rules` under `name`; returns the name as stored (trimmed).
    pub async fn save_config(&self, name: &str, rules: &Value) -> Result<String, ClientError> {
        let body = decode(
            self.client
                .post(self.api("/configs"))
                .json(&json!({ "name": name, "rules": rules }))
                .send()
                .await?,
        )
        .await?;
        Ok(serde_json::from_value(body["name"].clone())?)
    }

    pub async fn delete_config(&self, name: &str) -> Result<(), ClientError> {
        decode(self.client.delete(self.config_url(name)?).send().await?).await?;
        Ok(())
    }

    /// Deliver a webhook to the inspector; returns the assigned event id.
    pub async fn send_webhook(&self, payload: &Value) -> Result<u64, ClientError> {
        let body = decode(
            self.client
                .post(self.api("/webhook/receive"))
                .json(payload)
                .send()
                .await?,
        )
        .await?;
        Ok(serde_json::from_value(body["id"].clone())?)
    }

    /// Ask the inspector to relay `payload` to `url`.
    pub async fn relay(&self, url: &str, payload: &Value) -> Result<RelayOutcome, ClientError> {
        let body = decode(
            self.client
                .post(self.api("/webhook/send"))
                .json(&json!({ "url": url, "payload": payload }))
                .send()
                .await?,
        )
        .await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Open the live event stream.
    pub async fn events(&self) -> Result<EventStream, ClientError> {
        let response = self.client.get(self.api("/events")).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(EventStream {
            response,
            buffer: Vec::new(),
        })
    }
}

/// Incremental reader of `data: <json>\n\n` frames.
pub struct EventStream {
    response: Response,
    buffer: Vec<u8>,
}

impl EventStream {
    /// Next event, or `None` when the server closes the stream.
    pub async fn next_event(&mut self) -> Result<Option<StreamedEvent>, ClientError> {
        loop {
            if let Some(end) = self.buffer.windows(2).position(|w| w == b"\n\n") {
                let frame: Vec<u8> = self.buffer.drain(..end + 2).collect();
                let frame = String::from_utf8_lossy(&frame);
                let data: Vec<&str> = frame
                    .lines()
                    .filter_map(|line| line.strip_prefix("data:"))
                    .map(str::trim_start)
                    .collect();
                // Comment-only frames are keep-alives.
                if data.is_empty() {
                    continue;
                }
                return Ok(Some(serde_json::from_str(&data.join("\n"))?));
            }

            match self.response.chunk().await? {
                Some(chunk) => self.buffer.extend_from_slice(&chunk),
                None => return Ok(None),
            }
        }
    }
}

async fn decode(response: Response) -> Result<Value, ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(response.json().await?)
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_string))
        .unwrap_or(text);
    ClientError::Api { status, message }
}
