//! Transaction primitives.
//!
//! A transaction is a single income or expense record. `amount` and
//! `date` are mandatory; the category and payment mode are denormalized
//! by name so a transaction survives edits to the registries.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::categories::CategoryKind;
use crate::{EngineError, ResultEngine};

/// Denormalized category carried by a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub name: String,
    pub kind: CategoryKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub date: NaiveDate,
    pub amount: f64,
    /// Legacy field populated by spreadsheet imports; used as a
    /// fallback distribution bucket for uncategorized rows.
    pub name: Option<String>,
    pub category: Option<CategoryRef>,
    pub payment_mode: Option<String>,
    pub note: Option<String>,
}

/// Category payload accepted on save; a missing kind defaults to
/// expense, matching how uncategorized spending has always been
/// counted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryDraftRef {
    pub name: String,
    pub kind: Option<CategoryKind>,
}

/// Fields accepted when creating or updating a transaction. An `id`
/// turns the save into an update scoped to the owning user.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionDraft {
    pub id: Option<Uuid>,
    pub date: NaiveDate,
    pub amount: f64,
    pub name: Option<String>,
    pub category: Option<CategoryDraftRef>,
    pub payment_mode: Option<String>,
    pub note: Option<String>,
}

/// Filter applied by the dashboard when any of month, year, search or
/// payment mode is selected. An active filter switches the trend
/// report from monthly to daily buckets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionFilter {
    /// 1-based month.
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub search: Option<String>,
    pub payment_mode: Option<String>,
}

impl TransactionFilter {
    pub fn is_active(&self) -> bool {
        self.month.is_some()
            || self.year.is_some()
            || self
                .search
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty())
            || self.payment_mode.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub date: Date,
    pub amount: f64,
    pub name: Option<String>,
    pub category_name: Option<String>,
    pub category_kind: Option<String>,
    pub payment_mode: Option<String>,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            date: ActiveValue::Set(tx.date),
            amount: ActiveValue::Set(tx.amount),
            name: ActiveValue::Set(tx.name.clone()),
            category_name: ActiveValue::Set(tx.category.as_ref().map(|c| c.name.clone())),
            category_kind: ActiveValue::Set(
                tx.category.as_ref().map(|c| c.kind.as_str().to_string()),
            ),
            payment_mode: ActiveValue::Set(tx.payment_mode.clone()),
            note: ActiveValue::Set(tx.note.clone()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let category = model.category_name.map(|name| CategoryRef {
            name,
            kind: model
                .category_kind
                .as_deref()
                .and_then(|k| CategoryKind::try_from(k).ok())
                .unwrap_or_default(),
        });
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction not exists".to_string()))?,
            user_id: model.user_id,
            date: model.date,
            amount: model.amount,
            name: model.name,
            category,
            payment_mode: model.payment_mode,
            note: model.note,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_is_inactive_when_empty() {
        assert!(!TransactionFilter::default().is_active());
    }

    #[test]
    fn filter_ignores_blank_search() {
        let filter = TransactionFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!filter.is_active());
    }

    #[test]
    fn filter_is_active_with_month() {
        let filter = TransactionFilter {
            month: Some(3),
            ..Default::default()
        };
        assert!(filter.is_active());
    }

    #[test]
    fn model_without_kind_defaults_to_expense() {
        let model = Model {
            id: Uuid::new_v4().to_string(),
            user_id: "alice".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            amount: 10.0,
            name: None,
            category_name: Some("Misc".to_string()),
            category_kind: None,
            payment_mode: None,
            note: None,
        };
        let tx = Transaction::try_from(model).unwrap();
        assert_eq!(tx.category.unwrap().kind, CategoryKind::Expense);
    }
}
