use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod categories;
mod parse;
mod payment_modes;
mod server;
mod settings;
mod statistics;
mod transactions;
mod user;

pub mod types {
    pub mod transaction {
        pub use api_types::transaction::{
            DateRangeResponse, DeleteAllResponse, FilterQuery, TransactionListResponse,
            TransactionUpsert, TransactionView,
        };
    }

    pub mod category {
        pub use api_types::category::{CategoryListResponse, CategoryUpsert, CategoryView};
    }

    pub mod payment_mode {
        pub use api_types::payment_mode::{
            PaymentModeListResponse, PaymentModeUpsert, PaymentModeView,
        };
    }

    pub mod settings {
        pub use api_types::settings::SettingsView;
    }

    pub mod parse {
        pub use api_types::parse::{ParseRequest, ParsedTransactionView};
    }

    pub mod stats {
        pub use api_types::stats::{CalendarResponse, DistributionResponse, TrendResponse};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidTransaction(_) | EngineError::InvalidCategory(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res =
            ServerError::from(EngineError::InvalidTransaction("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(EngineError::InvalidCategory("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
