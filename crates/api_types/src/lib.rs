//! Wire types shared between the HTTP server and its clients.
//!
//! Field names follow the JSON conventions of the web client
//! (camelCase, `type` for the income/expense discriminator).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Income/expense discriminator, serialized as `"income"` /
/// `"expense"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    #[default]
    Expense,
}

pub mod transaction {
    use super::*;

    /// Denormalized category carried inside a transaction payload.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryRef {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: CategoryKind,
    }

    /// Category payload on create/update; a missing `type` defaults to
    /// expense on the server.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryRefUpsert {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: Option<CategoryKind>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: Uuid,
        /// ISO date, `YYYY-MM-DD`.
        pub date: NaiveDate,
        pub amount: f64,
        /// Legacy free-form label kept for spreadsheet imports.
        pub name: Option<String>,
        pub category: Option<CategoryRef>,
        pub payment_mode: Option<String>,
        pub note: Option<String>,
    }

    /// Request body for creating or updating a transaction. An `id`
    /// makes it an update.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionUpsert {
        pub id: Option<Uuid>,
        pub date: NaiveDate,
        pub amount: f64,
        pub name: Option<String>,
        pub category: Option<CategoryRefUpsert>,
        pub payment_mode: Option<String>,
        pub note: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    /// Query string of the filtered listing and the report endpoints.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FilterQuery {
        /// 1-based month.
        pub month: Option<u32>,
        pub year: Option<i32>,
        pub search: Option<String>,
        pub payment_mode: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DateRangeResponse {
        pub first_date: Option<NaiveDate>,
        pub last_date: Option<NaiveDate>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct DeleteAllResponse {
        pub deleted: u64,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: CategoryKind,
        pub icon: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryUpsert {
        pub id: Option<Uuid>,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: CategoryKind,
        pub icon: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod payment_mode {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct PaymentModeView {
        pub id: Uuid,
        pub name: String,
        /// Legacy numeric discriminator (1 = Cash, 2 = Mobile Wallet,
        /// ...).
        #[serde(rename = "type")]
        pub mode_type: i32,
        pub icon: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct PaymentModeUpsert {
        pub id: Option<Uuid>,
        pub name: String,
        #[serde(rename = "type")]
        pub mode_type: i32,
        pub icon: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PaymentModeListResponse {
        pub payment_modes: Vec<PaymentModeView>,
    }
}

pub mod settings {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SettingsView {
        pub currency: String,
        pub dark_mode: bool,
        pub theme: String,
    }
}

pub mod parse {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ParseRequest {
        pub text: String,
    }

    /// Best-effort parse result; absent fields were not recognized.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ParsedTransactionView {
        pub amount: Option<f64>,
        /// ISO currency code, `"INR"` or `"USD"`.
        pub currency: Option<String>,
        pub category: Option<String>,
        pub date: Option<NaiveDate>,
        pub payment_mode: Option<String>,
        pub note: Option<String>,
        pub original_text: String,
        pub confidence: f64,
    }
}

pub mod stats {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TrendResponse {
        /// Bucket keys, `YYYY-MM-DD` or `YYYY-MM`, sorted.
        pub keys: Vec<String>,
        pub labels: Vec<String>,
        pub income: Vec<f64>,
        pub expense: Vec<f64>,
        pub balance: Vec<f64>,
        pub total_income: f64,
        pub total_expense: f64,
    }

    /// One slice of the expense distribution chart, `y` being the
    /// amount as the chart library expects it.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct DistributionSlice {
        pub name: String,
        pub y: f64,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DistributionResponse {
        pub slices: Vec<DistributionSlice>,
        pub total_income: f64,
        pub total_expense: f64,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MarkerKind {
        Debit,
        Credit,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CalendarMarkerView {
        pub date: NaiveDate,
        pub kind: MarkerKind,
        pub amount: f64,
        /// Signed display string, `"-120"` or `"+3500"`.
        pub label: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CalendarResponse {
        pub markers: Vec<CalendarMarkerView>,
    }
}
