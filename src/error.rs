use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Uniform error record surfaced to the presentation layer.
///
/// `message` is always non-empty; everything else is omitted when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

impl NormalizedError {
    /// Error record carrying only a message (transport and shape failures).
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            message: if message.is_empty() {
                "Failed to load".to_string()
            } else {
                message
            },
            status: None,
            code: None,
            request_id: None,
            details: None,
            screenshot: None,
        }
    }
}

impl std::fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(status) = self.status {
            write!(f, " (status {})", status)?;
        }
        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }
        Ok(())
    }
}

/// Map a failed HTTP response onto a [`NormalizedError`].
///
/// Two backend eras produce two body shapes: a structured envelope
/// (`success: false` with an `error` payload and a top-level `requestId`)
/// and a plain `detail` field. Anything else falls back to the status line.
pub fn normalize(status: u16, status_text: &str, body: Option<&Value>) -> NormalizedError {
    let fallback = format!("HTTP {} {}", status, status_text).trim().to_string();

    if let Some(body) = body {
        // Structured envelope era.
        if body.get("success").and_then(Value::as_bool) == Some(false) {
            if let Some(error) = body.get("error").filter(|e| e.is_object()) {
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .map(String::from)
                    .unwrap_or(fallback);
                return NormalizedError {
                    message,
                    status: Some(status),
                    code: error.get("code").and_then(Value::as_str).map(String::from),
                    request_id: body
                        .get("requestId")
                        .and_then(Value::as_str)
                        .map(String::from),
                    details: error.get("details").cloned().filter(|d| !d.is_null()),
                    screenshot: error
                        .get("screenshot")
                        .and_then(Value::as_str)
                        .map(String::from),
                };
            }
        }

        // Plain `detail` era.
        if let Some(detail) = body.get("detail").filter(|d| !d.is_null()) {
            let message = match detail.as_str() {
                Some(s) if !s.is_empty() => s.to_string(),
                Some(_) => fallback,
                None => detail.to_string(),
            };
            let code = body
                .get("code")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| format!("http_{}", status));
            return NormalizedError {
                message,
                status: Some(status),
                code: Some(code),
                request_id: None,
                details: None,
                screenshot: None,
            };
        }
    }

    NormalizedError {
        message: fallback,
        status: Some(status),
        code: None,
        request_id: None,
        details: None,
        screenshot: None,
    }
}

/// Failure taxonomy for one fetch cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure before any HTTP response arrived.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx response, already normalized.
    #[error("{0}")]
    Http(NormalizedError),
    /// 2xx response whose payload lacks a review collection.
    #[error("{0}")]
    Shape(String),
    /// The cycle was superseded; never surfaced to the user.
    #[error("fetch cycle superseded")]
    Cancelled,
}

impl FetchError {
    /// Convert into the user-facing record. `Cancelled` has none by design.
    pub fn normalized(&self) -> Option<NormalizedError> {
        match self {
            FetchError::Transport(e) => Some(NormalizedError::from_message(e.to_string())),
            FetchError::Http(n) => Some(n.clone()),
            FetchError::Shape(m) => Some(NormalizedError::from_message(m.clone())),
            FetchError::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}
