use tauri::State;

use crate::{
    settings::SpinSettings,
    wheels::{SpinPlan, SpinResolution},
    AppState,
};

/// Starts a spin on the active wheel. `None` means a spin is already in
/// flight and the request was ignored.
#[tauri::command]
pub async fn spin_wheel(state: State<'_, AppState>) -> Result<Option<SpinPlan>, String> {
    let duration_ms = state.settings.spin().duration_ms;
    let controller = state.wheels.clone();
    Ok(controller.spin(duration_ms).await)
}

/// Called by the web view once the spin animation has settled.
#[tauri::command]
pub async fn complete_spin(
    state: State<'_, AppState>,
    token: String,
) -> Result<SpinResolution, String> {
    let controller = state.wheels.clone();
    Ok(controller.complete_spin(&token).await)
}

#[tauri::command]
pub fn get_spin_settings(state: State<'_, AppState>) -> Result<SpinSettings, String> {
    Ok(state.settings.spin())
}

#[tauri::command]
pub fn set_spin_settings(
    settings: SpinSettings,
    state: State<'_, AppState>,
) -> Result<SpinSettings, String> {
    state
        .settings
        .update_spin(settings)
        .map_err(|e| e.to_string())
}
