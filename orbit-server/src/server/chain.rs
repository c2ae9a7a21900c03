use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use orbit_core::{Block, ReceiveBlockOperationOutcome, ReceiveBlockOperationRequest};
use std::sync::Arc;
use super::{HealthResponse, ServerState, response_error};

pub(crate) async fn get_chain(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(state.chain_store.snapshot().await)
}

pub(crate) async fn receive_block(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Response {
    // Decoded by hand so malformed bodies map to 400 instead of axum's 422.
    let block: Block = match serde_json::from_slice(&body) {
        Ok(block) => block,
        Err(error) => {
            return response_error(StatusCode::BAD_REQUEST, format!("Malformed block: {}", error));
        }
    };

    match state
        .receive_block_operation
        .run(ReceiveBlockOperationRequest { block })
        .await
    {
        Ok(ReceiveBlockOperationOutcome::Accepted { .. }) => StatusCode::OK.into_response(),
        Ok(ReceiveBlockOperationOutcome::Rejected) => {
            response_error(StatusCode::BAD_REQUEST, "Invalid block")
        }
        Err(error) => response_error(StatusCode::INTERNAL_SERVER_ERROR, error.to_string()),
    }
}

pub(crate) async fn health(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        node_id: state.identity.node_id().to_string(),
        address: state.identity.address(),
        chain_length: state.chain_store.len().await,
        valid_blocks: state.chain_store.valid_count(),
    })
}
