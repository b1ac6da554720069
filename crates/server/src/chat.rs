use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shopchat_agent::{AddToCartOutcome, AgentRuntime, ChatReply};
use shopchat_core::{InterfaceError, ProductId};
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

#[derive(Clone)]
pub struct ChatState {
    runtime: Arc<AgentRuntime>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub id: i64,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct ChatError {
    pub reply: String,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct CartError {
    pub success: bool,
    pub message: String,
}

pub fn router(runtime: Arc<AgentRuntime>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/add_to_cart", post(add_to_cart))
        .with_state(ChatState { runtime })
}

pub async fn chat(
    State(state): State<ChatState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, (StatusCode, Json<ChatError>)> {
    let correlation_id = Uuid::new_v4().to_string();

    let request = match payload {
        Ok(Json(request)) if !request.message.trim().is_empty() => request,
        Ok(_) => {
            let error = InterfaceError::bad_request("message must not be blank")
                .with_correlation_id(&correlation_id);
            return Err(reject_chat(StatusCode::BAD_REQUEST, error));
        }
        Err(rejection) => {
            let (status, error) = interface_error(rejection, &correlation_id);
            return Err(reject_chat(status, error));
        }
    };

    let span = info_span!("chat", correlation_id = %correlation_id);
    let reply = state.runtime.handle_message(&request.message).instrument(span).await;
    Ok(Json(reply))
}

pub async fn add_to_cart(
    State(state): State<ChatState>,
    payload: Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<Json<AddToCartOutcome>, (StatusCode, Json<CartError>)> {
    let correlation_id = Uuid::new_v4().to_string();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let (status, error) = interface_error(rejection, &correlation_id);
            log_rejection(&error);
            let body = CartError { success: false, message: error.user_message().to_string() };
            return Err((status, Json(body)));
        }
    };

    let span = info_span!("add_to_cart", correlation_id = %correlation_id);
    let outcome = state.runtime.add_to_cart(ProductId(request.id)).instrument(span).await;
    Ok(Json(outcome))
}

fn interface_error(rejection: JsonRejection, correlation_id: &str) -> (StatusCode, InterfaceError) {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            InterfaceError::unsupported_media_type(rejection.body_text())
                .with_correlation_id(correlation_id),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            InterfaceError::bad_request(rejection.body_text()).with_correlation_id(correlation_id),
        ),
    }
}

fn reject_chat(status: StatusCode, error: InterfaceError) -> (StatusCode, Json<ChatError>) {
    log_rejection(&error);
    (status, Json(ChatError { reply: error.user_message().to_string() }))
}

fn log_rejection(error: &InterfaceError) {
    warn!(
        event_name = "http.request.rejected",
        correlation_id = %error.correlation_id(),
        error = %error,
        "request body rejected"
    );
}
