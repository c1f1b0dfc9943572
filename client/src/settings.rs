use bevy::prelude::*;
use shared::GameplaySettings;
use std::path::PathBuf;

const DEFAULT_SETTINGS_PATH: &str = "assets/settings/gameplay.ron";

/// Tuning loaded once at startup. The simulation copies it on construction.
#[derive(Resource, Debug, Clone)]
pub struct Settings(pub GameplaySettings);

pub(super) fn plugin(app: &mut App) {
    let path = read_settings_path_from_cli_env();

    let settings = match GameplaySettings::load(&path) {
        Ok(settings) => {
            info!("Loaded gameplay settings from {}", path.display());
            settings
        }
        Err(err) => {
            warn!(
                "Could not load gameplay settings from {} ({err}); using defaults.",
                path.display()
            );
            GameplaySettings::default()
        }
    };

    app.insert_resource(Settings(settings));
}

/// Returns the settings file path from CLI args or environment.
///
/// Supported:
///   --settings <path>
///   --settings=<path>
///   GAMEPLAY_SETTINGS environment variable
fn read_settings_path_from_cli_env() -> PathBuf {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--settings" {
            if let Some(path) = args.next() {
                return PathBuf::from(path);
            }
        } else if let Some(path) = arg.strip_prefix("--settings=") {
            return PathBuf::from(path);
        }
    }

    std::env::var("GAMEPLAY_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH))
}
