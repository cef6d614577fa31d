//! Core engine of the expense tracker.
//!
//! Owns the persistence of transactions, categories, payment modes and
//! per-user settings, and exposes the two pure computation layers on
//! top of them: the natural-language transaction parser and the
//! chart/calendar aggregation. Every operation is scoped to a user id
//! supplied by the caller; the engine never authenticates anybody.

use chrono::{Datelike, NaiveDate};
use sea_orm::{Condition, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

pub use categories::{Category, CategoryDraft, CategoryKind};
pub use error::EngineError;
pub use parser::{Currency, ParsedTransaction, parse_transaction_text, parse_with_reference};
pub use payment_modes::{PaymentMode, PaymentModeDraft};
pub use reports::{
    CalendarMarker, CategorySlice, Distribution, Granularity, MarkerKind, TrendReport,
    calendar_markers, category_distribution, trend,
};
pub use settings::{Settings, SettingsDraft};
pub use transactions::{
    CategoryDraftRef, CategoryRef, Transaction, TransactionDraft, TransactionFilter,
};

mod categories;
mod error;
mod parser;
mod payment_modes;
mod reports;
mod settings;
mod transactions;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;

#[derive(Clone, Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    /// All transactions of a user, newest first.
    pub async fn list_transactions(&self, user_id: &str) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::Date)
            .all(&self.database)
            .await?;

        models.into_iter().map(Transaction::try_from).collect()
    }

    /// Transactions matching the dashboard filter. Filtering happens
    /// after the fetch so search and payment mode share one
    /// case-insensitive code path.
    pub async fn list_transactions_filtered(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let transactions = self.list_transactions(user_id).await?;
        Ok(apply_filter(transactions, filter))
    }

    /// Oldest and newest transaction date of a user, `None` when the
    /// user has no transactions.
    pub async fn transactions_date_range(
        &self,
        user_id: &str,
    ) -> ResultEngine<Option<(NaiveDate, NaiveDate)>> {
        let first = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_asc(transactions::Column::Date)
            .one(&self.database)
            .await?;
        let last = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::Date)
            .one(&self.database)
            .await?;

        match (first, last) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date))),
            _ => Ok(None),
        }
    }

    /// Insert a new transaction, or update an existing one when the
    /// draft carries an id. Updates are scoped to the owning user.
    pub async fn save_transaction(
        &self,
        user_id: &str,
        draft: TransactionDraft,
    ) -> ResultEngine<Transaction> {
        if !draft.amount.is_finite() {
            return Err(EngineError::InvalidTransaction(
                "amount must be a finite number".to_string(),
            ));
        }

        let transaction = Transaction {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            user_id: user_id.to_string(),
            date: draft.date,
            amount: draft.amount,
            name: draft.name,
            category: draft.category.map(|category| CategoryRef {
                name: category.name,
                // A payload without a kind has always been expense.
                kind: category.kind.unwrap_or_default(),
            }),
            payment_mode: draft.payment_mode,
            note: draft.note,
        };

        if draft.id.is_some() {
            let existing = transactions::Entity::find_by_id(transaction.id.to_string())
                .filter(transactions::Column::UserId.eq(user_id))
                .one(&self.database)
                .await?;
            if existing.is_none() {
                return Err(EngineError::KeyNotFound("transaction not exists".to_string()));
            }
            transactions::ActiveModel::from(&transaction)
                .update(&self.database)
                .await?;
        } else {
            transactions::ActiveModel::from(&transaction)
                .insert(&self.database)
                .await?;
        }

        Ok(transaction)
    }

    pub async fn delete_transaction(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id.to_string()))
            .filter(transactions::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("transaction not exists".to_string()));
        }
        Ok(())
    }

    /// Wipe a user's transaction history. Returns how many rows went.
    pub async fn delete_all_transactions(&self, user_id: &str) -> ResultEngine<u64> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }

    /// Global default categories plus the user's own, sorted by name.
    pub async fn list_categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(
                Condition::any()
                    .add(categories::Column::UserId.is_null())
                    .add(categories::Column::UserId.eq(user_id)),
            )
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;

        models.into_iter().map(Category::try_from).collect()
    }

    pub async fn save_category(
        &self,
        user_id: &str,
        draft: CategoryDraft,
    ) -> ResultEngine<Category> {
        if draft.name.trim().is_empty() {
            return Err(EngineError::InvalidCategory(
                "category name must not be empty".to_string(),
            ));
        }

        let category = Category {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            name: draft.name,
            kind: draft.kind,
            icon: draft.icon,
            user_id: Some(user_id.to_string()),
        };

        if draft.id.is_some() {
            let existing = categories::Entity::find_by_id(category.id.to_string())
                .filter(categories::Column::UserId.eq(user_id))
                .one(&self.database)
                .await?;
            if existing.is_none() {
                return Err(EngineError::KeyNotFound("category not exists".to_string()));
            }
            categories::ActiveModel::from(&category)
                .update(&self.database)
                .await?;
        } else {
            categories::ActiveModel::from(&category)
                .insert(&self.database)
                .await?;
        }

        Ok(category)
    }

    /// Delete a user-owned category. The global defaults are shared
    /// and cannot be removed.
    pub async fn delete_category(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        let result = categories::Entity::delete_many()
            .filter(categories::Column::Id.eq(id.to_string()))
            .filter(categories::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("category not exists".to_string()));
        }
        Ok(())
    }

    /// Global default payment modes plus the user's own.
    pub async fn list_payment_modes(&self, user_id: &str) -> ResultEngine<Vec<PaymentMode>> {
        let models = payment_modes::Entity::find()
            .filter(
                Condition::any()
                    .add(payment_modes::Column::UserId.is_null())
                    .add(payment_modes::Column::UserId.eq(user_id)),
            )
            .order_by_asc(payment_modes::Column::ModeType)
            .all(&self.database)
            .await?;

        models.into_iter().map(PaymentMode::try_from).collect()
    }

    pub async fn save_payment_mode(
        &self,
        user_id: &str,
        draft: PaymentModeDraft,
    ) -> ResultEngine<PaymentMode> {
        if draft.name.trim().is_empty() {
            return Err(EngineError::InvalidCategory(
                "payment mode name must not be empty".to_string(),
            ));
        }

        let mode = PaymentMode {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            name: draft.name,
            mode_type: draft.mode_type,
            icon: draft.icon,
            user_id: Some(user_id.to_string()),
        };

        if draft.id.is_some() {
            let existing = payment_modes::Entity::find_by_id(mode.id.to_string())
                .filter(payment_modes::Column::UserId.eq(user_id))
                .one(&self.database)
                .await?;
            if existing.is_none() {
                return Err(EngineError::KeyNotFound("payment mode not exists".to_string()));
            }
            payment_modes::ActiveModel::from(&mode)
                .update(&self.database)
                .await?;
        } else {
            payment_modes::ActiveModel::from(&mode)
                .insert(&self.database)
                .await?;
        }

        Ok(mode)
    }

    pub async fn delete_payment_mode(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        let result = payment_modes::Entity::delete_many()
            .filter(payment_modes::Column::Id.eq(id.to_string()))
            .filter(payment_modes::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("payment mode not exists".to_string()));
        }
        Ok(())
    }

    /// A user's display settings, falling back to the defaults when
    /// nothing was saved yet.
    pub async fn settings(&self, user_id: &str) -> ResultEngine<Settings> {
        let model = settings::Entity::find_by_id(user_id).one(&self.database).await?;
        Ok(model
            .map(Settings::from)
            .unwrap_or_else(|| Settings::default_for(user_id)))
    }

    /// Upsert a user's display settings.
    pub async fn update_settings(
        &self,
        user_id: &str,
        draft: SettingsDraft,
    ) -> ResultEngine<Settings> {
        let settings = Settings {
            user_id: user_id.to_string(),
            currency: draft.currency,
            dark_mode: draft.dark_mode,
            theme: draft.theme,
        };

        let existing = settings::Entity::find_by_id(user_id).one(&self.database).await?;
        let model = settings::ActiveModel::from(&settings);
        if existing.is_some() {
            model.update(&self.database).await?;
        } else {
            model.insert(&self.database).await?;
        }

        Ok(settings)
    }

    /// Run the natural-language parser against the user's category and
    /// payment mode registries.
    pub async fn parse_text(&self, user_id: &str, text: &str) -> ResultEngine<ParsedTransaction> {
        let categories = self.list_categories(user_id).await?;
        let payment_modes = self.list_payment_modes(user_id).await?;
        Ok(parser::parse_transaction_text(text, &categories, &payment_modes))
    }

    /// Income/expense/balance trend. Daily buckets while a filter is
    /// active, monthly otherwise.
    pub async fn trend_report(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<TrendReport> {
        let transactions = self.list_transactions_filtered(user_id, filter).await?;
        let granularity = if filter.is_active() {
            Granularity::Daily
        } else {
            Granularity::Monthly
        };
        Ok(reports::trend(&transactions, granularity))
    }

    pub async fn distribution_report(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<Distribution> {
        let transactions = self.list_transactions_filtered(user_id, filter).await?;
        Ok(reports::category_distribution(&transactions))
    }

    pub async fn calendar(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<CalendarMarker>> {
        let transactions = self.list_transactions_filtered(user_id, filter).await?;
        Ok(reports::calendar_markers(&transactions))
    }
}

fn apply_filter(transactions: Vec<Transaction>, filter: &TransactionFilter) -> Vec<Transaction> {
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    transactions
        .into_iter()
        .filter(|transaction| {
            filter.month.is_none_or(|month| transaction.date.month() == month)
                && filter.year.is_none_or(|year| transaction.date.year() == year)
                && filter.payment_mode.as_deref().is_none_or(|mode| {
                    transaction
                        .payment_mode
                        .as_deref()
                        .is_some_and(|m| m.eq_ignore_ascii_case(mode))
                })
                && needle.as_deref().is_none_or(|needle| {
                    let mut haystacks = [
                        transaction.note.as_deref(),
                        transaction.name.as_deref(),
                        transaction.category.as_ref().map(|c| c.name.as_str()),
                    ]
                    .into_iter()
                    .flatten();
                    haystacks.any(|haystack| haystack.to_lowercase().contains(needle))
                })
        })
        .collect()
}
