//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication
//! - `transactions`: income/expense records with a denormalized category
//! - `categories`: income/expense classification, global or per user
//! - `payment_modes`: named payment methods, global or per user
//! - `settings`: per-user display preferences

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Date,
    Amount,
    Name,
    CategoryName,
    CategoryKind,
    PaymentMode,
    Note,
}

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

#[derive(Iden)]
enum Settings {
    Table,
    UserId,
    Currency,
    DarkMode,
    Theme,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).string().not_null())
                    .col(ColumnDef::new(Transactions::Date).date().not_null())
                    .col(ColumnDef::new(Transactions::Amount).double().not_null())
                    .col(ColumnDef::new(Transactions::Name).string())
                    .col(ColumnDef::new(Transactions::CategoryName).string())
                    .col(ColumnDef::new(Transactions::CategoryKind).string())
                    .col(ColumnDef::new(Transactions::PaymentMode).string())
                    .col(ColumnDef::new(Transactions::Note).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-user_id")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Kind).string().not_null())
                    .col(ColumnDef::new(Categories::Icon).string())
                    // NULL marks a global default visible to everyone.
                    .col(ColumnDef::new(Categories::UserId).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-user_id-name-unique")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentModes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentModes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentModes::Name).string().not_null())
                    .col(
                        ColumnDef::new(PaymentModes::ModeType)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentModes::Icon).string())
                    .col(ColumnDef::new(PaymentModes::UserId).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payment_modes-user_id-name-unique")
                    .table(PaymentModes::Table)
                    .col(PaymentModes::UserId)
                    .col(PaymentModes::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Settings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Settings::UserId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Settings::Currency)
                            .string()
                            .not_null()
                            .default("INR"),
                    )
                    .col(
                        ColumnDef::new(Settings::DarkMode)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Settings::Theme)
                            .string()
                            .not_null()
                            .default("blue"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-settings-user_id")
                            .from(Settings::Table, Settings::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Settings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentModes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
