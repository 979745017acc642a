//! Job option validation tests

use std::collections::HashMap;
use std::time::Duration;

use mmcdeploy::app::options::JobOptions;
use mmcdeploy::errors::DeployError;
use mmcdeploy::filesys::file::File;
use mmcdeploy::storage::settings::{load_settings, Settings};
use secrecy::ExposeSecret;

fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.console.url = "http://mmc.local:8585/mmc-console/api".to_string();
    settings.console.username = "admin".to_string();
    settings.job.file_location = "target/*.zip".to_string();
    settings.job.application_name = "testapp".to_string();
    settings.job.artifact_version = "1.0.0".to_string();
    settings.job.target_name = "Test".to_string();
    settings
}

#[test]
fn test_blank_deployment_name_defaults_to_application() {
    let mut settings = settings();
    settings.job.deployment_name = "  ".to_string();

    let job = JobOptions::from_settings(&settings, None).unwrap();
    assert_eq!(job.deployment_name, "testapp");
    assert_eq!(job.console_url.host_str(), Some("mmc.local"));
}

#[test]
fn test_explicit_deployment_name() {
    let mut settings = settings();
    settings.job.deployment_name = "testapp-blue".to_string();

    let job = JobOptions::from_settings(&settings, None).unwrap();
    assert_eq!(job.deployment_name, "testapp-blue");
}

#[test]
fn test_missing_required_fields() {
    let mut no_app = settings();
    no_app.job.application_name = String::new();
    assert!(matches!(JobOptions::from_settings(&no_app, None), Err(DeployError::ConfigError(_))));

    let mut no_version = settings();
    no_version.job.artifact_version = " ".to_string();
    assert!(matches!(JobOptions::from_settings(&no_version, None), Err(DeployError::ConfigError(_))));

    let mut no_target = settings();
    no_target.job.target_name = String::new();
    assert!(matches!(JobOptions::from_settings(&no_target, None), Err(DeployError::ConfigError(_))));
}

#[test]
fn test_invalid_console_url() {
    let mut settings = settings();
    settings.console.url = "not a url".to_string();

    assert!(matches!(JobOptions::from_settings(&settings, None), Err(DeployError::InvalidUrl(_))));
}

#[test]
fn test_password_falls_back_to_environment() {
    let job = JobOptions::from_settings(&settings(), Some("from-env".to_string())).unwrap();
    assert_eq!(job.credentials.password.expose_secret(), "from-env");

    let mut with_password = settings();
    with_password.console.password = Some("from-settings".to_string());
    let job = JobOptions::from_settings(&with_password, Some("from-env".to_string())).unwrap();
    assert_eq!(job.credentials.password.expose_secret(), "from-settings");
}

#[test]
fn test_startup_timeout_only_parsed_for_complete_deployment() {
    let mut settings = settings();
    settings.job.startup_timeout = "soon".to_string();

    let job = JobOptions::from_settings(&settings, None).unwrap();
    assert_eq!(job.deploy.startup_timeout, None);

    settings.job.complete_deployment = true;
    assert!(matches!(JobOptions::from_settings(&settings, None), Err(DeployError::ConfigError(_))));

    settings.job.startup_timeout = "2500".to_string();
    let job = JobOptions::from_settings(&settings, None).unwrap();
    assert!(job.deploy.complete_deployment);
    assert_eq!(job.deploy.startup_timeout, Some(Duration::from_millis(2500)));

    settings.job.startup_timeout = "0".to_string();
    let job = JobOptions::from_settings(&settings, None).unwrap();
    assert_eq!(job.deploy.startup_timeout, None);
}

#[test]
fn test_requests_per_artifact_file() {
    let job = JobOptions::from_settings(&settings(), None).unwrap();

    let requests = job.requests(vec![File::new("target/a.zip"), File::new("target/b.zip")]);
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.target_name == "Test" && r.deployment_name == "testapp"));
    assert_eq!(requests[1].artifact.file.path(), std::path::Path::new("target/b.zip"));
    assert_eq!(requests[1].application_name(), "testapp");
}

#[tokio::test]
async fn test_settings_file_with_arguments() {
    let path = std::env::temp_dir().join(format!("mmcdeploy-settings-{}.json", uuid::Uuid::new_v4()));
    tokio::fs::write(
        &path,
        r#"{
            "log_level": "debug",
            "console": { "url": "http://mmc:8080/api", "username": "deployer" },
            "job": { "application_name": "testapp", "artifact_version": "1.0.0", "file_location": "app.zip" }
        }"#,
    )
    .await
    .unwrap();

    let mut settings = load_settings(&File::new(&path)).await.unwrap();
    settings
        .apply_args(&HashMap::from([("target".to_string(), "Test".to_string())]))
        .unwrap();

    let job = JobOptions::from_settings(&settings, None).unwrap();
    assert_eq!(job.target_name, "Test");
    assert_eq!(job.credentials.username, "deployer");
}

#[tokio::test]
async fn test_missing_settings_file() {
    let result = load_settings(&File::new("/nonexistent/mmcdeploy.json")).await;
    assert!(matches!(result, Err(DeployError::Internal(message)) if message.contains("Unable to read settings file")));
}
