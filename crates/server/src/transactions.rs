//! Transactions API endpoints

use api_types::CategoryKind as ApiKind;
use api_types::transaction::{
    CategoryRef, DateRangeResponse, DeleteAllResponse, FilterQuery, TransactionListResponse,
    TransactionUpsert, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_kind(kind: engine::CategoryKind) -> ApiKind {
    match kind {
        engine::CategoryKind::Income => ApiKind::Income,
        engine::CategoryKind::Expense => ApiKind::Expense,
    }
}

pub(crate) fn map_kind_to_engine(kind: ApiKind) -> engine::CategoryKind {
    match kind {
        ApiKind::Income => engine::CategoryKind::Income,
        ApiKind::Expense => engine::CategoryKind::Expense,
    }
}

fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        date: tx.date,
        amount: tx.amount,
        name: tx.name,
        category: tx.category.map(|category| CategoryRef {
            name: category.name,
            kind: map_kind(category.kind),
        }),
        payment_mode: tx.payment_mode,
        note: tx.note,
    }
}

pub(crate) fn to_filter(query: FilterQuery) -> engine::TransactionFilter {
    engine::TransactionFilter {
        month: query.month,
        year: query.year,
        search: query.search,
        payment_mode: query.payment_mode,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let transactions = state.engine.list_transactions(&user.username).await?;
    Ok(Json(TransactionListResponse {
        transactions: transactions.into_iter().map(view).collect(),
    }))
}

pub async fn list_filtered(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let transactions = state
        .engine
        .list_transactions_filtered(&user.username, &to_filter(query))
        .await?;
    Ok(Json(TransactionListResponse {
        transactions: transactions.into_iter().map(view).collect(),
    }))
}

pub async fn date_range(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<DateRangeResponse>, ServerError> {
    let range = state.engine.transactions_date_range(&user.username).await?;
    let (first_date, last_date) = match range {
        Some((first, last)) => (Some(first), Some(last)),
        None => (None, None),
    };
    Ok(Json(DateRangeResponse {
        first_date,
        last_date,
    }))
}

pub async fn save(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionUpsert>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let is_update = payload.id.is_some();
    let draft = engine::TransactionDraft {
        id: payload.id,
        date: payload.date,
        amount: payload.amount,
        name: payload.name,
        category: payload.category.map(|category| engine::CategoryDraftRef {
            name: category.name,
            kind: category.kind.map(map_kind_to_engine),
        }),
        payment_mode: payload.payment_mode,
        note: payload.note,
    };

    let saved = state.engine.save_transaction(&user.username, draft).await?;
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
    state.engine.delete_transaction(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_all(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<DeleteAllResponse>, ServerError> {
    let deleted = state.engine.delete_all_transactions(&user.username).await?;
    Ok(Json(DeleteAllResponse { deleted }))
}
