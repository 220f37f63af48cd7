//! Contact form endpoints.
//!
//! Messages are validated and kept in memory for the lifetime of the
//! process.

use std::sync::{Arc, LazyLock, Mutex};

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ServerError;
use crate::state::AppState;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("invalid email regex"));

/// Contact form submission.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct ContactMessage {
    name: String,
    email: String,
    subject: String,
    message: String,
}

impl ContactMessage {
    fn validate(&self) -> Result<(), ServerError> {
        check_length("name", &self.name, 2, 100)?;
        if !EMAIL_PATTERN.is_match(&self.email) {
            return Err(ServerError::Validation("email is not a valid address".to_owned()));
        }
        check_length("subject", &self.subject, 5, 200)?;
        check_length("message", &self.message, 10, 5000)
    }
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), ServerError> {
    let len = value.chars().count();
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(ServerError::Validation(format!(
            "{field} must be between {min} and {max} characters"
        )))
    }
}

/// Stored submission.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct StoredMessage {
    id: usize,
    #[serde(flatten)]
    message: ContactMessage,
    submitted_at: DateTime<Utc>,
}

/// In-memory list of contact submissions.
#[derive(Debug, Default)]
pub(crate) struct ContactInbox {
    messages: Mutex<Vec<StoredMessage>>,
}

impl ContactInbox {
    fn push(&self, message: ContactMessage) -> Result<usize, ServerError> {
        let mut messages = self
            .messages
            .lock()
            .map_err(|_| ServerError::Internal("contact inbox lock poisoned".to_owned()))?;
        let id = messages.len() + 1;
        messages.push(StoredMessage {
            id,
            message,
            submitted_at: Utc::now(),
        });
        Ok(id)
    }

    fn all(&self) -> Result<Vec<StoredMessage>, ServerError> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .map_err(|_| ServerError::Internal("contact inbox lock poisoned".to_owned()))
    }
}

/// Response for POST /api/contact.
#[derive(Serialize)]
pub(crate) struct SubmitResponse {
    success: bool,
    message: &'static str,
}

/// Response for GET /api/contact/messages.
#[derive(Serialize)]
pub(crate) struct MessagesResponse {
    total: usize,
    messages: Vec<StoredMessage>,
}

/// Handle POST /api/contact.
pub(crate) async fn submit_message(
    State(state): State<Arc<AppState>>,
    Json(message): Json<ContactMessage>,
) -> Result<Json<SubmitResponse>, ServerError> {
    message.validate()?;
    tracing::info!(name = %message.name, email = %message.email, "Contact form submission");

    let id = state.inbox.push(message)?;
    tracing::debug!(id, "Stored contact message");

    Ok(Json(SubmitResponse {
        success: true,
        message: "Thank you for your message. I will get back to you soon.",
    }))
}

/// Handle GET /api/contact/messages.
pub(crate) async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessagesResponse>, ServerError> {
    let messages = state.inbox.all()?;
    Ok(Json(MessagesResponse {
        total: messages.len(),
        messages,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::app::test_support::{get, post_json, sample_storage, test_app};

    fn valid() -> Value {
        json!({
            "name": "Ada",
            "email": "ada@example.com",
            "subject": "Hello there",
            "message": "I enjoyed reading your notes."
        })
    }

    fn message(value: Value) -> ContactMessage {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_validate_accepts_valid_message() {
        assert!(message(valid()).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let cases = [
            ("name", json!("A")),
            ("email", json!("not-an-email")),
            ("email", json!("a@b")),
            ("subject", json!("Hi")),
            ("message", json!("short")),
            ("message", json!("x".repeat(5001))),
        ];

        for (field, value) in cases {
            let mut body = valid();
            body[field] = value;
            let err = message(body).validate().unwrap_err();
            assert!(err.to_string().contains(field), "{field}: {err}");
        }
    }

    #[tokio::test]
    async fn test_submit_and_list() {
        let app = test_app(sample_storage());

        let (status, body) = post_json(app.clone(), "/api/contact", &valid()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, _) = post_json(app.clone(), "/api/contact", &valid()).await;

        let (status, body) = get(app, "/api/contact/messages").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["messages"][0]["id"], 1);
        assert_eq!(body["messages"][1]["id"], 2);
        assert_eq!(body["messages"][0]["email"], "ada@example.com");
        assert!(body["messages"][0]["submitted_at"].is_string());
    }

    #[tokio::test]
    async fn test_submit_invalid_is_422() {
        let app = test_app(sample_storage());
        let mut body = valid();
        body["subject"] = json!("Yo");

        let (status, response) = post_json(app.clone(), "/api/contact", &body).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response["error"].as_str().unwrap().contains("subject"));
        let (_, listed) = get(app, "/api/contact/messages").await;
        assert_eq!(listed["total"], 0);
    }

    #[tokio::test]
    async fn test_submit_missing_field_is_422() {
        let (status, _) = post_json(
            test_app(sample_storage()),
            "/api/contact",
            &json!({"name": "Ada"}),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
