//! Category registry endpoints.

use api_types::category::{CategoryListResponse, CategoryUpsert, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::transactions::map_kind_to_engine;
use crate::{ServerError, server::ServerState, user};

fn view(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: match category.kind {
            engine::CategoryKind::Income => api_types::CategoryKind::Income,
            engine::CategoryKind::Expense => api_types::CategoryKind::Expense,
        },
        icon: category.icon,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let categories = state.engine.list_categories(&user.username).await?;
    Ok(Json(CategoryListResponse {
        categories: categories.into_iter().map(view).collect(),
    }))
}

pub async fn save(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryUpsert>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let is_update = payload.id.is_some();
    let draft = engine::CategoryDraft {
        id: payload.id,
        name: payload.name,
        kind: map_kind_to_engine(payload.kind),
        icon: payload.icon,
    };

    let saved = state.engine.save_category(&user.username, draft).await?;
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
    state.engine.delete_category(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
