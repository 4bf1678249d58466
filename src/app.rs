use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager, RunEvent};

use crate::{
    db::Database,
    persistence::COLLECTION_KEY,
    settings::SettingsStore,
    spin::commands::{complete_spin, get_spin_settings, set_spin_settings, spin_wheel},
    utils::logging::init_logging,
    wheels::{
        commands::{
            add_segment, create_wheel, delete_segment, delete_wheel, get_collection,
            get_wheel_layout, rename_wheel, set_active_wheel, update_segment_label,
        },
        CollectionSnapshot, SpinPlan, SpinResolution, StateObserver, WheelController,
    },
};

pub(crate) struct AppState {
    pub(crate) wheels: WheelController,
    pub(crate) settings: SettingsStore,
}

/// Forwards controller changes to the web view as Tauri events.
struct EventEmitter {
    app_handle: AppHandle,
}

impl EventEmitter {
    fn emit<T: Serialize + Clone>(&self, event: &str, payload: T) {
        if let Err(err) = self.app_handle.emit(event, payload) {
            warn!("Failed to emit {event}: {err}");
        }
    }
}

impl StateObserver for EventEmitter {
    fn collection_changed(&self, snapshot: &CollectionSnapshot) {
        self.emit("collection-changed", snapshot);
    }

    fn spin_started(&self, plan: &SpinPlan) {
        self.emit("spin-started", plan);
    }

    fn spin_finished(&self, resolution: &SpinResolution) {
        self.emit("spin-finished", resolution);
    }
}

fn log_last_save(database: &Database) {
    let entry = tauri::async_runtime::block_on(database.get_entry(COLLECTION_KEY));
    match entry {
        Ok(Some(entry)) => info!(
            "Wheel collection in {} last saved at {}",
            database.path().display(),
            entry.updated_at
        ),
        Ok(None) => info!("No wheel collection saved in {} yet", database.path().display()),
        Err(err) => warn!("Could not read wheel collection metadata: {err:#}"),
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    init_logging();

    info!("Wheelspin starting up...");

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let db_path = app_data_dir.join("wheelspin.sqlite3");
                let database = Database::new(db_path)?;

                log_last_save(&database);

                let observer = Arc::new(EventEmitter {
                    app_handle: app.handle().clone(),
                });
                let wheels = tauri::async_runtime::block_on(WheelController::load(
                    database, observer,
                ));

                let settings_path = app_data_dir.join("settings.json");
                let settings = SettingsStore::new(settings_path)?;

                app.manage(AppState { wheels, settings });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            get_collection,
            create_wheel,
            delete_wheel,
            rename_wheel,
            set_active_wheel,
            add_segment,
            update_segment_label,
            delete_segment,
            get_wheel_layout,
            spin_wheel,
            complete_spin,
            get_spin_settings,
            set_spin_settings,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| {
        if let RunEvent::Exit = event {
            // Write the last snapshot before the process goes away.
            if let Some(state) = app_handle.try_state::<AppState>() {
                let wheels = state.wheels.clone();
                tauri::async_runtime::block_on(async move { wheels.shutdown().await });
            }
        }
    });
}
