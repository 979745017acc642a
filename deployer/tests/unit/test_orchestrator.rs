//! Orchestration tests against the in-memory console

use std::sync::Arc;
use std::time::Duration;

use mmc_models::DeploymentStatus::{Deployed, Deleting, Failed, InProgress, Undeployed};
use mmcdeploy::deploy::orchestrator::{DeployOptions, Orchestrator};
use mmcdeploy::errors::DeployError;
use mmcdeploy::filesys::file::File;
use mmcdeploy::models::artifact::Artifact;
use mmcdeploy::models::deployment::DeployRequest;
use tokio_test::assert_ok;

use crate::common::{deployment, FakeConsole};

fn request(name: &str, version: &str, target: &str) -> DeployRequest {
    DeployRequest {
        artifact: Artifact::new(name, version, File::new(format!("target/{}-{}.zip", name, version))),
        target_name: target.to_string(),
        deployment_name: name.to_string(),
    }
}

fn complete() -> DeployOptions {
    DeployOptions {
        complete_deployment: true,
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_perform_deploys_and_activates() {
    let console = Arc::new(FakeConsole::new().with_server("Test", "s-1"));
    console.script_status("d-1", vec![InProgress, InProgress, InProgress, Deployed]);
    let orchestrator = Orchestrator::new(console.clone(), complete());

    assert!(orchestrator.perform(&[request("testapp", "1.0.0", "Test")]).await);

    assert_eq!(
        console.calls(),
        vec![
            "upload testapp 1.0.0",
            "create_deployment testapp",
            "deploy d-1",
            "status d-1",
            "status d-1",
            "status d-1",
            "status d-1",
        ]
    );
    let deployments = console.deployments();
    assert_eq!(deployments.len(), 1);
    assert_eq!(deployments[0].servers, vec!["s-1".to_string()]);
    assert_eq!(deployments[0].applications, vec!["v-1".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_perform_rolls_back_failed_startup() {
    let console = Arc::new(FakeConsole::new().with_server("Test", "s-1"));
    console.script_status("d-1", vec![InProgress, Failed]);
    let orchestrator = Orchestrator::new(console.clone(), complete());

    assert!(!orchestrator.perform(&[request("testapp", "1.0.0", "Test")]).await);

    assert_eq!(console.count("delete_deployment d-1"), 1);
    assert!(console.deployments().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_rollback_gives_up_on_stuck_deletion() {
    let console = Arc::new(FakeConsole::new().with_server("Test", "s-1"));
    let mut statuses = vec![InProgress, Failed];
    statuses.extend(std::iter::repeat(Deleting).take(200_000));
    console.script_status("d-1", statuses);
    let options = DeployOptions {
        complete_deployment: true,
        startup_timeout: Some(Duration::from_secs(1)),
        delete_timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let orchestrator = Orchestrator::new(console.clone(), options);

    let performed = tokio::time::timeout(
        Duration::from_secs(3600),
        orchestrator.perform(&[request("testapp", "1.0.0", "Test")]),
    )
    .await;

    assert_eq!(performed, Ok(false));
    assert_eq!(console.count("delete_deployment d-1"), 1);
    // Two activation checks, then one check per 50ms until the 2s budget runs out
    let checks = console.count("status d-1");
    assert!((40..=45).contains(&checks), "{} status checks", checks);
}

#[tokio::test(start_paused = true)]
async fn test_do_deploy_replaces_previous_version() {
    let console = Arc::new(
        FakeConsole::new()
            .with_server("Test", "s-1")
            .with_application("testapp", "a-1", &[("0.9.0", "v-0")])
            .with_deployment(deployment("old", "testapp-0.9", Deployed, &["s-1"], &[], &["v-0"]))
            .with_deployment(deployment("named", "testapp", Undeployed, &["s-1"], &[], &["v-0"])),
    );
    let orchestrator = Orchestrator::new(console.clone(), DeployOptions::default());

    let id = orchestrator.do_deploy(&request("testapp", "1.0.0", "Test")).await.unwrap();

    let calls = console.calls();
    let position = |call: &str| calls.iter().position(|c| c == call).unwrap();
    assert!(position("upload testapp 1.0.0") < position("delete_deployment named"));
    assert!(position("delete_deployment named") < position("undeploy old"));
    assert!(position("undeploy old") < position("create_deployment testapp"));
    assert!(console.calls().iter().all(|c| !c.starts_with("deploy ")));

    // Without cleanup the undeployed old deployment stays
    let remaining: Vec<String> = console.deployments().into_iter().map(|d| d.id).collect();
    assert_eq!(remaining, vec!["old".to_string(), id]);
}

#[tokio::test(start_paused = true)]
async fn test_do_deploy_deletes_old_deployments() {
    let console = Arc::new(
        FakeConsole::new()
            .with_server("Test", "s-1")
            .with_application("testapp", "a-1", &[("0.9.0", "v-0")])
            .with_deployment(deployment("old", "testapp-0.9", Deployed, &["s-1"], &[], &["v-0"])),
    );
    let options = DeployOptions {
        delete_old_deployments: true,
        ..Default::default()
    };
    let orchestrator = Orchestrator::new(console.clone(), options);

    let id = orchestrator.do_deploy(&request("testapp", "1.0.0", "Test")).await.unwrap();

    assert_eq!(console.count("undeploy old"), 1);
    assert_eq!(console.count("delete_deployment old"), 1);
    let remaining: Vec<String> = console.deployments().into_iter().map(|d| d.id).collect();
    assert_eq!(remaining, vec![id]);
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_is_deleted_before_upload() {
    let console = Arc::new(FakeConsole::new().with_server("Test", "s-1"));
    let orchestrator = Orchestrator::new(console.clone(), DeployOptions::default());

    assert_ok!(orchestrator.do_deploy(&request("testapp", "1.0-SNAPSHOT", "Test")).await);

    let calls = console.calls();
    assert_eq!(calls[0], "delete_application testapp 1.0-SNAPSHOT");
    assert_eq!(calls[1], "upload testapp 1.0-SNAPSHOT");
}

#[tokio::test(start_paused = true)]
async fn test_startup_timeout() {
    let console = Arc::new(FakeConsole::new().with_server("Test", "s-1"));
    console.script_status("d-1", vec![InProgress; 20]);
    let options = DeployOptions {
        complete_deployment: true,
        startup_timeout: Some(Duration::from_millis(200)),
        ..Default::default()
    };
    let orchestrator = Orchestrator::new(console.clone(), options);

    let result = orchestrator.do_deploy(&request("testapp", "1.0.0", "Test")).await;
    assert!(matches!(result, Err(DeployError::Timeout(_))));
}

#[tokio::test]
async fn test_unknown_target_fails_after_upload() {
    let console = Arc::new(FakeConsole::new().with_server("Test", "s-1"));
    let orchestrator = Orchestrator::new(console.clone(), DeployOptions::default());

    let result = orchestrator.do_deploy(&request("testapp", "1.0.0", "Prod")).await;

    assert!(matches!(result, Err(DeployError::TargetNotFound(_))));
    assert_eq!(console.count("upload testapp 1.0.0"), 1);
    assert!(console.deployments().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_perform_continues_after_failure() {
    let console = Arc::new(FakeConsole::new().with_server("Test", "s-1"));
    let orchestrator = Orchestrator::new(console.clone(), DeployOptions::default());

    let success = orchestrator
        .perform(&[request("broken", "1.0.0", "Nowhere"), request("testapp", "1.0.0", "Test")])
        .await;

    assert!(!success);
    assert_eq!(console.count("create_deployment testapp"), 1);
}

#[tokio::test]
async fn test_perform_nothing_to_deploy() {
    let console = Arc::new(FakeConsole::new());
    let orchestrator = Orchestrator::new(console.clone(), DeployOptions::default());

    assert!(!orchestrator.perform(&[]).await);
    assert!(console.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_delete_deployments() {
    let console = Arc::new(
        FakeConsole::new()
            .with_cluster("Farm", "c-1", &[])
            .with_application("testapp", "a-1", &[("1.0.0", "v-1")])
            .with_deployment(deployment("d-7", "testapp", Undeployed, &[], &["c-1"], &["v-1"])),
    );
    let orchestrator = Orchestrator::new(console.clone(), DeployOptions::default());

    assert_ok!(orchestrator.delete_deployments("testapp", "Farm").await);
    assert!(console.deployments().is_empty());
}
