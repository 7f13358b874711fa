use crate::core::config::ApiConfig;
use crate::core::storyboard::{
    ErrorBody, ExportRequest, GenerateReply, GenerateRequest, GenerationResult, Storyboard,
};
use crate::utils::time::with_timeout;
use anyhow::Context;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const GENERATE_PATH: &str = "api/generate";
pub const EXPORT_PATH: &str = "api/download-docx";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Non-2xx status, or a reply with `success: false`.
    #[error("server rejected the request (HTTP {status}): {}", .message.as_deref().unwrap_or("no details"))]
    Rejected { status: u16, message: Option<String> },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    /// Error text supplied by the backend, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
pub trait ApiBounds {}
#[cfg(target_arch = "wasm32")]
impl<T> ApiBounds for T {}

#[cfg(not(target_arch = "wasm32"))]
pub trait ApiBounds: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> ApiBounds for T {}

/// The generation backend, reached through its two endpoints.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait StoryboardApi: ApiBounds {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerationResult, ApiError>;
    async fn export_docx(&self, storyboard: &Storyboard) -> Result<Vec<u8>, ApiError>;
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

/// Interprets a `/api/generate` reply.
pub fn parse_generate_reply(status: u16, body: &str) -> Result<GenerationResult, ApiError> {
    let reply: GenerateReply = match serde_json::from_str(body) {
        Ok(reply) => reply,
        Err(_) if !is_success(status) => {
            return Err(ApiError::Rejected { status, message: None });
        }
        Err(e) => return Err(ApiError::Decode(e.to_string())),
    };

    if !is_success(status) || !reply.success {
        return Err(ApiError::Rejected {
            status,
            message: non_empty(reply.error),
        });
    }

    let storyboard = reply
        .storyboard
        .ok_or_else(|| ApiError::Decode("reply has no storyboard".to_string()))?;
    Ok(GenerationResult::new(storyboard, reply.text_content, reply.filename))
}

/// Interprets the body of a failed `/api/download-docx` call.
pub fn parse_export_failure(status: u16, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| non_empty(b.error));
    ApiError::Rejected { status, message }
}

/// Joins endpoint paths under `base`, keeping any path prefix it carries.
pub fn endpoint(base: &str, path: &str) -> anyhow::Result<Url> {
    let mut base = base.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let base = Url::parse(&base).with_context(|| format!("Invalid API base URL: {}", base))?;
    base.join(path)
        .with_context(|| format!("Invalid endpoint path: {}", path))
}

#[derive(Debug, Clone)]
pub struct HttpStoryboardApi {
    client: Client,
    generate_url: Url,
    export_url: Url,
    timeout: Option<Duration>,
}

impl HttpStoryboardApi {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::new(),
            generate_url: endpoint(&config.base_url, GENERATE_PATH)?,
            export_url: endpoint(&config.base_url, EXPORT_PATH)?,
            timeout: config.request_timeout(),
        })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl StoryboardApi for HttpStoryboardApi {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerationResult, ApiError> {
        debug!("POST {}", self.generate_url);
        let (status, body) = with_timeout(self.timeout, async {
            let resp = self
                .client
                .post(self.generate_url.clone())
                .json(request)
                .send()
                .await?;
            let status = resp.status().as_u16();
            let body = resp.text().await?;
            Ok::<_, ApiError>((status, body))
        })
        .await
        .map_err(ApiError::Timeout)??;

        debug!("Generate replied with HTTP {} ({} bytes)", status, body.len());
        parse_generate_reply(status, &body)
    }

    async fn export_docx(&self, storyboard: &Storyboard) -> Result<Vec<u8>, ApiError> {
        debug!("POST {}", self.export_url);
        let (status, body) = with_timeout(self.timeout, async {
            let resp = self
                .client
                .post(self.export_url.clone())
                .json(&ExportRequest { storyboard })
                .send()
                .await?;
            let status = resp.status().as_u16();
            let body = resp.bytes().await?;
            Ok::<_, ApiError>((status, body.to_vec()))
        })
        .await
        .map_err(ApiError::Timeout)??;

        if is_success(status) {
            Ok(body)
        } else {
            warn!("Export replied with HTTP {}", status);
            Err(parse_export_failure(status, &body))
        }
    }
}
