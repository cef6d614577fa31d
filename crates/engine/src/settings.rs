//! Per-user display settings.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub user_id: String,
    /// ISO currency code used for display formatting only.
    pub currency: String,
    pub dark_mode: bool,
    pub theme: String,
}

impl Settings {
    pub fn default_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            currency: "INR".to_string(),
            dark_mode: false,
            theme: "blue".to_string(),
        }
    }
}

/// Fields accepted on a settings update; the row is upserted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsDraft {
    pub currency: String,
    pub dark_mode: bool,
    pub theme: String,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub currency: String,
    pub dark_mode: bool,
    pub theme: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Settings> for ActiveModel {
    fn from(settings: &Settings) -> Self {
        Self {
            user_id: ActiveValue::Set(settings.user_id.clone()),
            currency: ActiveValue::Set(settings.currency.clone()),
            dark_mode: ActiveValue::Set(settings.dark_mode),
            theme: ActiveValue::Set(settings.theme.clone()),
        }
    }
}

impl From<Model> for Settings {
    fn from(model: Model) -> Self {
        Self {
            user_id: model.user_id,
            currency: model.currency,
            dark_mode: model.dark_mode,
            theme: model.theme,
        }
    }
}
