//! Payment mode primitives.
//!
//! A payment mode is a named method of payment (cash, card, wallet)
//! with a numeric type used by legacy clients. Like categories, rows
//! with a NULL `user_id` are global defaults.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMode {
    pub id: Uuid,
    pub name: String,
    /// Legacy numeric discriminator (1 = Cash, 2 = Mobile Wallet, ...).
    pub mode_type: i32,
    pub icon: Option<String>,
    pub user_id: Option<String>,
}

/// Fields accepted when creating or updating a payment mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentModeDraft {
    pub id: Option<Uuid>,
    pub name: String,
    pub mode_type: i32,
    pub icon: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_modes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub mode_type: i32,
    pub icon: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PaymentMode> for ActiveModel {
    fn from(mode: &PaymentMode) -> Self {
        Self {
            id: ActiveValue::Set(mode.id.to_string()),
            name: ActiveValue::Set(mode.name.clone()),
            mode_type: ActiveValue::Set(mode.mode_type),
            icon: ActiveValue::Set(mode.icon.clone()),
            user_id: ActiveValue::Set(mode.user_id.clone()),
        }
    }
}

impl TryFrom<Model> for PaymentMode {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("payment mode not exists".to_string()))?,
            name: model.name,
            mode_type: model.mode_type,
            icon: model.icon,
            user_id: model.user_id,
        })
    }
}
