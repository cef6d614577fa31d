//! Chart and calendar report endpoints.
//!
//! All three accept the same filter query as the transaction listing,
//! so the dashboard shows reports for exactly the rows it displays.

use api_types::stats::{
    CalendarMarkerView, CalendarResponse, DistributionResponse, DistributionSlice, MarkerKind,
    TrendResponse,
};
use api_types::transaction::FilterQuery;
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::transactions::to_filter;
use crate::{ServerError, server::ServerState, user};

pub async fn trend(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<TrendResponse>, ServerError> {
    let report = state
        .engine
        .trend_report(&user.username, &to_filter(query))
        .await?;

    Ok(Json(TrendResponse {
        keys: report.keys,
        labels: report.labels,
        income: report.income,
        expense: report.expense,
        balance: report.balance,
        total_income: report.total_income,
        total_expense: report.total_expense,
    }))
}

pub async fn distribution(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<DistributionResponse>, ServerError> {
    let distribution = state
        .engine
        .distribution_report(&user.username, &to_filter(query))
        .await?;

    Ok(Json(DistributionResponse {
        slices: distribution
            .slices
            .into_iter()
            .map(|slice| DistributionSlice {
                name: slice.name,
                y: slice.amount,
            })
            .collect(),
        total_income: distribution.total_income,
        total_expense: distribution.total_expense,
    }))
}

pub async fn calendar(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<CalendarResponse>, ServerError> {
    let markers = state
        .engine
        .calendar(&user.username, &to_filter(query))
        .await?;

    Ok(Json(CalendarResponse {
        markers: markers
            .into_iter()
            .map(|marker| CalendarMarkerView {
                date: marker.date,
                kind: match marker.kind {
                    engine::MarkerKind::Debit => MarkerKind::Debit,
                    engine::MarkerKind::Credit => MarkerKind::Credit,
                },
                amount: marker.amount,
                label: marker.label,
            })
            .collect(),
    }))
}
