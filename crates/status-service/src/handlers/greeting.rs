//! Public greeting.

use crate::models::MessageResponse;
use axum::Json;

/// Handler for GET /
#[tracing::instrument(skip_all, name = "status.handlers.greeting")]
pub async fn greeting() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello World".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_greeting_message() {
        let Json(body) = greeting().await;
        assert_eq!(body.message, "Hello World");
    }
}
