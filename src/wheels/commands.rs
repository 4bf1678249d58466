use tauri::State;

use crate::{
    render::{WheelGeometry, WheelLayout},
    wheels::{CollectionSnapshot, WheelController},
    AppState,
};

fn controller_from_state(state: &State<'_, AppState>) -> WheelController {
    state.wheels.clone()
}

#[tauri::command]
pub async fn get_collection(state: State<'_, AppState>) -> Result<CollectionSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.get_snapshot().await)
}

#[tauri::command]
pub async fn create_wheel(state: State<'_, AppState>) -> Result<CollectionSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.create_wheel().await)
}

#[tauri::command]
pub async fn delete_wheel(
    state: State<'_, AppState>,
    wheel_id: String,
) -> Result<CollectionSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.delete_wheel(&wheel_id).await)
}

#[tauri::command]
pub async fn rename_wheel(
    state: State<'_, AppState>,
    wheel_id: String,
    name: String,
) -> Result<CollectionSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.rename_wheel(&wheel_id, name).await)
}

#[tauri::command]
pub async fn set_active_wheel(
    state: State<'_, AppState>,
    wheel_id: String,
) -> Result<CollectionSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.set_active_wheel(&wheel_id).await)
}

#[tauri::command]
pub async fn add_segment(
    state: State<'_, AppState>,
    wheel_id: String,
) -> Result<CollectionSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.add_segment(&wheel_id).await)
}

#[tauri::command]
pub async fn update_segment_label(
    state: State<'_, AppState>,
    wheel_id: String,
    segment_id: String,
    label: String,
) -> Result<CollectionSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller
        .update_segment_label(&wheel_id, &segment_id, label)
        .await)
}

#[tauri::command]
pub async fn delete_segment(
    state: State<'_, AppState>,
    wheel_id: String,
    segment_id: String,
) -> Result<CollectionSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.delete_segment(&wheel_id, &segment_id).await)
}

#[tauri::command]
pub async fn get_wheel_layout(
    state: State<'_, AppState>,
    wheel_id: Option<String>,
    rotation: Option<f64>,
    geometry: Option<WheelGeometry>,
) -> Result<WheelLayout, String> {
    let controller = controller_from_state(&state);
    let geometry = geometry.unwrap_or_default();
    controller
        .layout(wheel_id.as_deref(), rotation.unwrap_or(0.0), &geometry)
        .await
        .ok_or_else(|| "Wheel not found".to_string())
}
