//! Per-user display settings endpoints.

use api_types::settings::SettingsView;
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, user};

fn view(settings: engine::Settings) -> SettingsView {
    SettingsView {
        currency: settings.currency,
        dark_mode: settings.dark_mode,
        theme: settings.theme,
    }
}

pub async fn get_settings(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SettingsView>, ServerError> {
    let settings = state.engine.settings(&user.username).await?;
    Ok(Json(view(settings)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SettingsView>,
) -> Result<Json<SettingsView>, ServerError> {
    let draft = engine::SettingsDraft {
        currency: payload.currency,
        dark_mode: payload.dark_mode,
        theme: payload.theme,
    };
    let saved = state.engine.update_settings(&user.username, draft).await?;
    Ok(Json(view(saved)))
}
