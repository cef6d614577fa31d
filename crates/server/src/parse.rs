//! Natural-language parsing endpoint.

use api_types::parse::{ParseRequest, ParsedTransactionView};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, user};

pub async fn parse_text(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ParseRequest>,
) -> Result<Json<ParsedTransactionView>, ServerError> {
    let parsed = state.engine.parse_text(&user.username, &payload.text).await?;

    Ok(Json(ParsedTransactionView {
        amount: parsed.amount,
        currency: parsed.currency.map(|currency| currency.code().to_string()),
        category: parsed.category,
        date: parsed.date,
        payment_mode: parsed.payment_mode,
        note: parsed.note,
        original_text: parsed.original_text,
        confidence: parsed.confidence,
    }))
}
