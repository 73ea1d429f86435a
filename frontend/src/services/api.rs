use gloo::net::http::{Request, Response};
use serde::Deserialize;
use shared::schedule::{message_or, APPROVE_FAILED, NOTIFY_FAILED, OPTIMIZE_ENDPOINT};
use shared::{
    ApproveScheduleResponse, AvailabilityRecord, AvailabilityUpdate, AvailabilityUpdateResponse,
    NotifyActorsResponse, OptimizeError, OptimizeOutcome, OptimizeScheduleResponse,
};
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure of a single backend call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to parse response: {0}")]
    Decode(String),
    /// Non-2xx without a readable message
    #[error("Server error ({status})")]
    Server { status: u16 },
    /// The server answered and said no; the message is user-facing
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// Text for the alert banner. Transport-level problems collapse to
    /// `fallback`; the details go to the console log instead.
    pub fn banner_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected(message) => message.clone(),
            ApiError::Server { .. } => self.to_string(),
            ApiError::Network(_) | ApiError::Decode(_) => fallback.to_string(),
        }
    }
}

/// Error body some endpoints send with a non-2xx status
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Map a non-2xx body to the best error we can tell the user
fn error_from_body(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message: Some(message) }) if !message.trim().is_empty() => ApiError::Rejected(message),
        _ => ApiError::Server { status },
    }
}

/// API client for the scheduling backend
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// `base_url` is prepended to every path; empty targets the page's origin
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Save one date's availability.
    ///
    /// The endpoint answers with a JSON `{success, message}` body even on
    /// 4xx/5xx, so the body decides the outcome rather than the status.
    pub async fn update_availability<R: AvailabilityRecord>(&self, update: &AvailabilityUpdate<R>) -> Result<(), ApiError> {
        let url = self.url(R::ENDPOINT);

        let response = Request::post(&url)
            .json(&update.request())
            .map_err(|e| ApiError::Network(format!("Failed to serialize request: {}", e)))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let body: AvailabilityUpdateResponse = response.json().await.map_err(|e| ApiError::Decode(e.to_string()))?;

        if body.success {
            Ok(())
        } else {
            Err(ApiError::Rejected(message_or(body.message.as_deref(), "Unknown error")))
        }
    }

    /// Submit the optimization form and normalize whichever reply shape comes back
    pub async fn optimize_schedule(&self, payload: &BTreeMap<String, String>) -> Result<OptimizeOutcome, ApiError> {
        let url = self.url(OPTIMIZE_ENDPOINT);

        let response = Request::post(&url)
            .json(payload)
            .map_err(|e| ApiError::Network(format!("Failed to serialize request: {}", e)))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(Self::error_from_response(response).await);
        }

        let body: OptimizeScheduleResponse = response.json().await.map_err(|e| ApiError::Decode(e.to_string()))?;

        body.into_outcome().map_err(|e| match e {
            OptimizeError::Rejected(message) => ApiError::Rejected(message),
            OptimizeError::MissingSchedule => ApiError::Decode(e.to_string()),
        })
    }

    pub async fn approve_schedule(&self, path: &str) -> Result<ApproveScheduleResponse, ApiError> {
        let body: ApproveScheduleResponse = self.post_empty(path).await?;
        if body.success {
            Ok(body)
        } else {
            Err(ApiError::Rejected(message_or(body.message.as_deref(), APPROVE_FAILED)))
        }
    }

    pub async fn notify_actors(&self, path: &str) -> Result<NotifyActorsResponse, ApiError> {
        let body: NotifyActorsResponse = self.post_empty(path).await?;
        if body.success {
            Ok(body)
        } else {
            Err(ApiError::Rejected(message_or(body.message.as_deref(), NOTIFY_FAILED)))
        }
    }

    /// POST without a body and decode the JSON reply
    async fn post_empty<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let response = Request::post(&self.url(path))
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(Self::error_from_response(response).await);
        }

        response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn error_from_response(response: Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::warn!("🌐 API: {} returned status {}", response.url(), status);
        error_from_body(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::schedule::OPTIMIZATION_ERROR_MESSAGE;

    #[test]
    fn test_url_building() {
        assert_eq!(ApiClient::new("").url("/api/actor-availability"), "/api/actor-availability");
        assert_eq!(
            ApiClient::new("http://localhost:5000/").url("/approve-schedule/3"),
            "http://localhost:5000/approve-schedule/3"
        );
    }

    #[test]
    fn test_non_2xx_body_mapping() {
        assert_eq!(
            error_from_body(400, r#"{"success": false, "message": "No scenes in range"}"#),
            ApiError::Rejected("No scenes in range".to_string())
        );
        assert_eq!(error_from_body(500, "<html>Internal Server Error</html>"), ApiError::Server { status: 500 });
        assert_eq!(error_from_body(502, r#"{"message": ""}"#), ApiError::Server { status: 502 });
    }

    #[test]
    fn test_banner_messages() {
        let fallback = OPTIMIZATION_ERROR_MESSAGE;
        assert_eq!(ApiError::Rejected("Bad range".to_string()).banner_message(fallback), "Bad range");
        assert_eq!(ApiError::Server { status: 503 }.banner_message(fallback), "Server error (503)");
        assert_eq!(ApiError::Network("offline".to_string()).banner_message(fallback), fallback);
        assert_eq!(ApiError::Decode("eof".to_string()).banner_message(fallback), fallback);
    }
}
