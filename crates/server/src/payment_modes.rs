//! Payment mode registry endpoints.

use api_types::payment_mode::{PaymentModeListResponse, PaymentModeUpsert, PaymentModeView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn view(mode: engine::PaymentMode) -> PaymentModeView {
    PaymentModeView {
        id: mode.id,
        name: mode.name,
        mode_type: mode.mode_type,
        icon: mode.icon,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<PaymentModeListResponse>, ServerError> {
    let payment_modes = state.engine.list_payment_modes(&user.username).await?;
    Ok(Json(PaymentModeListResponse {
        payment_modes: payment_modes.into_iter().map(view).collect(),
    }))
}

pub async fn save(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PaymentModeUpsert>,
) -> Result<(StatusCode, Json<PaymentModeView>), ServerError> {
    let is_update = payload.id.is_some();
    let draft = engine::PaymentModeDraft {
        id: payload.id,
        name: payload.name,
        mode_type: payload.mode_type,
        icon: payload.icon,
    };

    let saved = state.engine.save_payment_mode(&user.username, draft).await?;
    let status = if is_update {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(view(saved))))
}

pub async fn delete_one(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_payment_mode(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
