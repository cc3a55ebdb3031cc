use quarry_settings::config::Settings;
use std::process::ExitCode;

const DEFAULT_SETTINGS_PATH: &str = "settings.cfg";

fn main() -> ExitCode {
    // Initialize Telemetry
    tracing_subscriber::fmt()
        .with_env_filter("quarry_settings=debug,info")
        .with_target(false)
        .json()
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string());

    let settings = match Settings::from_file(&path) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(path = %path, error = %err, "Settings rejected");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        path = %path,
        user_agents = settings.download.user_agents.len(),
        download_timeout_secs = settings.download.download_timeout,
        extraction_timeout_secs = settings.extraction.extraction_timeout,
        "Settings loaded"
    );

    match serde_json::to_string_pretty(&settings) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to serialize resolved settings");
            ExitCode::FAILURE
        }
    }
}
