//! HTTP JSON client for the registry API
//!
//! [`ApiClient::post`] never fails on an HTTP status: any response that
//! arrives is returned as an [`ApiResponse`] with `error` set when the status
//! was not 200 or the body did not decode. Only transport failures (refused
//! connections, DNS, timeouts) become a [`MurError`](crate::error::MurError).

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::Result;

/// Timeout applied to every API request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Request body encoding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContentType {
    #[default]
    Json,
    Form,
    /// Payload JSON text sent verbatim under this content type
    Other(String),
}

enum RequestBody {
    Json(Value),
    Form(Vec<(String, String)>),
    Raw { content_type: String, text: String },
}

impl RequestBody {
    fn encode(payload: Value, content_type: &ContentType) -> Self {
        match content_type {
            ContentType::Json => RequestBody::Json(payload),
            ContentType::Form => RequestBody::Form(flatten_form(&payload)),
            ContentType::Other(content_type) => RequestBody::Raw {
                content_type: content_type.clone(),
                text: payload.to_string(),
            },
        }
    }
}

/// Flatten a JSON object into form pairs, skipping nulls
fn flatten_form(payload: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = payload else {
        return Vec::new();
    };
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), value)
        })
        .collect()
}

/// Uniform response envelope
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status_code: u16,
    /// Decoded payload, set only for a 200 with a well-formed body
    pub data: Option<T>,
    pub raw_data: Map<String, Value>,
    pub error: Option<String>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    fn from_body(status_code: u16, text: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(text);
        let raw_data = match &parsed {
            Ok(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };

        if status_code != 200 {
            return Self {
                status_code,
                data: None,
                raw_data,
                error: Some(text.to_string()),
            };
        }

        match parsed.and_then(serde_json::from_value::<T>) {
            Ok(data) => Self {
                status_code,
                data: Some(data),
                raw_data,
                error: None,
            },
            Err(e) => {
                debug!("Failed to parse response data: {e}");
                Self {
                    status_code,
                    data: None,
                    raw_data,
                    error: Some(format!("Failed to parse response: {e}")),
                }
            }
        }
    }
}

/// Client for the registry API
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    verbose: bool,
}

impl ApiClient {
    /// Create a client for `base_url`. TLS certificates are verified only for
    /// `https` base URLs.
    pub fn new(base_url: &str, verbose: bool) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let secure = base_url.starts_with("https://");
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .danger_accept_invalid_certs(!secure)
            .build()
            .map_err(|e| crate::error::api::request_failed(&base_url, e))?;
        Ok(Self {
            base_url,
            http,
            verbose,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for `endpoint`; one leading slash is dropped
    pub fn url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
        format!("{}/{}", self.base_url, endpoint)
    }

    /// POST `payload` to `endpoint`, decoding a 200 body as `T`
    pub fn post<P, T>(
        &self,
        endpoint: &str,
        payload: &P,
        headers: &[(String, String)],
        content_type: &ContentType,
    ) -> Result<ApiResponse<T>>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        let payload = serde_json::to_value(payload)
            .map_err(|e| crate::error::api::request_failed(endpoint, e))?;

        let mut request = self.http.post(&url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request = match RequestBody::encode(payload, content_type) {
            RequestBody::Json(body) => request.json(&body),
            RequestBody::Form(pairs) => request.form(&pairs),
            RequestBody::Raw { content_type, text } => {
                request.header(CONTENT_TYPE, content_type).body(text)
            }
        };

        let response = request.send().map_err(|e| {
            debug!("API request error: {e}");
            crate::error::api::request_failed(endpoint, e)
        })?;

        let status = response.status().as_u16();
        if self.verbose {
            info!("POST {endpoint} response status: {status}");
        }
        let text = response
            .text()
            .map_err(|e| crate::error::api::request_failed(endpoint, e))?;

        Ok(ApiResponse::from_body(status, &text))
    }
}
