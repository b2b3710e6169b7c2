pub mod admin;
pub mod auth;
pub mod endpoints;
pub mod http;
pub mod notifications;
pub mod polls;
pub mod sheets;

pub use http::HttpTransport;
pub use notifications::NotificationPage;
pub use polls::{AdminPolls, SheetPolls};
pub use sheets::SheetMutation;

use crate::error::ApiError;
use crate::normalize::{ListShape, Normalizer, PageState, PaginationDescriptor};
use async_trait::async_trait;
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Multipart form; a key may repeat.
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn post(path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn paged(self, page: u32, page_size: u32) -> Self {
        self.query("page", page).query("page_size", page_size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

/// Carries requests to the backend. Non-2xx statuses are returned as
/// responses, not errors; [`ApiClient`] decides what they mean.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// One page of a list resource after normalization.
#[derive(Debug, Clone)]
pub struct Page<R> {
    pub records: Vec<R>,
    pub pagination: PaginationDescriptor,
}

impl<R> Page<R> {
    pub fn state(&self, requested_page: u32, default_page_size: u32) -> PageState {
        self.pagination
            .resolve(self.records.len(), requested_page, default_page_size)
    }
}

pub struct ApiClient<T> {
    transport: Arc<T>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) async fn call(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        debug!("{} {}", method, path);

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                error!("{} {} failed: {}", method, path, e);
                return Err(e);
            }
        };

        if (200..300).contains(&response.status) {
            return Ok(response.body);
        }

        let err = ApiError::Status {
            status: response.status,
            body: response.body,
        };
        if err.is_client_error() {
            debug!("{} {} rejected with {}", method, path, response.status);
        } else {
            error!("{} {} failed with {}", method, path, response.status);
        }
        Err(err)
    }

    pub(crate) async fn fetch_page<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
        shape: ListShape,
        fallback_page_size: Option<u32>,
    ) -> Result<(Page<R>, Value), ApiError> {
        let body = self.call(request).await?;
        let normalizer = Normalizer::new(shape);
        let page = Page {
            records: normalizer.records(&body),
            pagination: normalizer.pagination(&body, fallback_page_size),
        };
        debug!("Fetched {} {}", page.records.len(), shape.resource);
        Ok((page, body))
    }
}
