//! MMC Deployer - Entry Point
//!
//! Deploys application archives to a Mule Management Console from a build
//! pipeline. Options come from an optional JSON settings file overridden by
//! `--key=value` arguments.

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;

use mmcdeploy::app::options::{JobOptions, PASSWORD_ENV};
use mmcdeploy::app::run::{run, test_connection};
use mmcdeploy::filesys::file::File;
use mmcdeploy::logs::{init_logging, LogOptions};
use mmcdeploy::storage::settings::{load_settings, Settings};
use mmcdeploy::utils::version_info;

use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("Failed to print version: {e}"),
        }
        return ExitCode::SUCCESS;
    }

    // Retrieve the settings file, if any
    let mut settings = match cli_args.get("settings") {
        Some(path) => match load_settings(&File::new(path)).await {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    if let Err(e) = settings.apply_args(&cli_args) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        log_file: settings.log_file.clone(),
        json_format: settings.json_logs,
        ..Default::default()
    };
    let _guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            println!("Failed to initialize logging: {e}");
            None
        }
    };

    let job = match JobOptions::from_settings(&settings, env::var(PASSWORD_ENV).ok()) {
        Ok(job) => job,
        Err(e) => {
            error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Check the connection and exit
    if cli_args.contains_key("test-connection") {
        return match test_connection(&job).await {
            Ok(()) => {
                info!("Connection to {} successful", job.console_url);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Connection to {} failed: {e}", job.console_url);
                ExitCode::FAILURE
            }
        };
    }

    info!("Running deployment with options: {:?}", job);
    match run(job, await_shutdown_signal()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Failed to run the deployment: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Ctrl+C received, shutting down...");
    }
}
