use crate::api::{ApiRequest, ApiResponse, Method, RequestBody, Transport};
use crate::error::ApiError;
use async_trait::async_trait;
use log::warn;
use reqwest::multipart::Form;
use reqwest::{Client, Url};
use serde_json::Value;

/// Talks to the real backend over HTTPS.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            token: None,
        })
    }

    /// Every request carries `Authorization: Bearer <token>` when set.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(bytes).unwrap_or_else(|e| {
        warn!("Backend sent a non-JSON body: {}", e);
        Value::String(String::from_utf8_lossy(bytes).into_owned())
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self
            .client
            .request(method, self.url(&request.path))
            .query(&request.query);

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Form(fields) => {
                let form = fields
                    .into_iter()
                    .fold(Form::new(), |form, (key, value)| form.text(key, value));
                builder.multipart(form)
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        Ok(ApiResponse {
            status,
            body: decode_body(&bytes),
        })
    }
}
