//! Seeds the global default categories and payment modes.
//!
//! Rows are inserted with a NULL user id, which every account sees.
//! Re-running on a populated database is a no-op.

use sea_orm::{ConnectionTrait, Statement};
use sea_orm_migration::prelude::*;
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    Kind,
    Icon,
    UserId,
}

#[derive(Iden)]
enum PaymentModes {
    Table,
    Id,
    Name,
    ModeType,
    Icon,
    UserId,
}

const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Bills", "expense"),
    ("Cosmetics", "expense"),
    ("Education", "expense"),
    ("Entertainment", "expense"),
    ("Fitness", "expense"),
    ("Food", "expense"),
    ("Fuel", "expense"),
    ("Grocery", "expense"),
    ("HealthCare", "expense"),
    ("Home", "expense"),
    ("Insurance", "expense"),
    ("Investment", "expense"),
    ("Other Income", "income"),
    ("Party", "expense"),
    ("Pets", "expense"),
    ("Repairs", "expense"),
    ("Salary", "income"),
    ("Shopping", "expense"),
    ("Transportation", "expense"),
    ("Vacation", "expense"),
];

const DEFAULT_PAYMENT_MODES: &[(&str, i32)] = &[
    ("Cash", 1),
    ("Mobile Wallet", 2),
    ("Credit Card", 3),
    ("Debit Card", 4),
    ("Bank Account", 5),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        let seeded = db
            .query_one(Statement::from_string(
                backend,
                "SELECT 1 FROM categories WHERE user_id IS NULL LIMIT 1;".to_string(),
            ))
            .await?
            .is_some();

        if !seeded {
            for (name, kind) in DEFAULT_CATEGORIES {
                let stmt = Query::insert()
                    .into_table(Categories::Table)
                    .columns([
                        Categories::Id,
                        Categories::Name,
                        Categories::Kind,
                        Categories::Icon,
                        Categories::UserId,
                    ])
                    .values_panic([
                        Uuid::new_v4().to_string().into(),
                        (*name).into(),
                        (*kind).into(),
                        None::<String>.into(),
                        None::<String>.into(),
                    ])
                    .to_owned();
                db.execute(backend.build(&stmt)).await?;
            }
        }

        let seeded = db
            .query_one(Statement::from_string(
                backend,
                "SELECT 1 FROM payment_modes WHERE user_id IS NULL LIMIT 1;".to_string(),
            ))
            .await?
            .is_some();

        if !seeded {
            for (name, mode_type) in DEFAULT_PAYMENT_MODES {
                let stmt = Query::insert()
                    .into_table(PaymentModes::Table)
                    .columns([
                        PaymentModes::Id,
                        PaymentModes::Name,
                        PaymentModes::ModeType,
                        PaymentModes::Icon,
                        PaymentModes::UserId,
                    ])
                    .values_panic([
                        Uuid::new_v4().to_string().into(),
                        (*name).into(),
                        (*mode_type).into(),
                        None::<String>.into(),
                        None::<String>.into(),
                    ])
                    .to_owned();
                db.execute(backend.build(&stmt)).await?;
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        let stmt = Query::delete()
            .from_table(Categories::Table)
            .and_where(Expr::col(Categories::UserId).is_null())
            .to_owned();
        db.execute(backend.build(&stmt)).await?;

        let stmt = Query::delete()
            .from_table(PaymentModes::Table)
            .and_where(Expr::col(PaymentModes::UserId).is_null())
            .to_owned();
        db.execute(backend.build(&stmt)).await?;

        Ok(())
    }
}
