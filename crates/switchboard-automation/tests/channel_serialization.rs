//! Channel behaviour observed through a recording runner.

use serde_json::json;
use std::time::Duration;
use switchboard_automation::{ScriptChannel, maps_handlers};
use switchboard_core::{Arguments, AutomationError, CallContext};
use switchboard_testing::{RecordingRunner, assert_no_overlap};

fn args(value: serde_json::Value) -> Arguments {
    serde_json::from_value(value).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_scripts_run_one_at_a_time() {
    let runner = RecordingRunner::new().with_delay(Duration::from_millis(20));
    let channel = ScriptChannel::new(runner.shared());

    let tasks: Vec<_> = (0..6)
        .map(|i| {
            let channel = channel.clone();
            tokio::spawn(async move { channel.run(&format!("return {i}")).await })
        })
        .collect();

    let outputs = futures::future::join_all(tasks).await;
    for (i, output) in outputs.into_iter().enumerate() {
        assert_eq!(output.unwrap().unwrap(), format!("return {i}"));
    }

    let windows = runner.windows();
    assert_eq!(windows.len(), 6);
    assert_no_overlap(&windows);
}

#[tokio::test]
async fn failures_are_reported_once_without_retry() {
    let runner = RecordingRunner::new();
    runner.push_result(Err(AutomationError::CompilationFailed(
        "0:4: syntax error".into(),
    )));
    let channel = ScriptChannel::new(runner.shared());

    let err = channel.run("bad script").await.unwrap_err();
    assert!(matches!(err, AutomationError::CompilationFailed(_)));
    assert_eq!(runner.execution_count(), 1);
}

#[tokio::test]
async fn timed_out_script_releases_the_channel() {
    let slow = RecordingRunner::new().with_delay(Duration::from_secs(5));
    let channel = ScriptChannel::new(slow.shared()).with_timeout(Duration::from_millis(50));

    let err = channel.run("slow").await.unwrap_err();
    assert_eq!(err, AutomationError::Timeout { seconds: 0 });

    let next = tokio::time::timeout(Duration::from_secs(1), channel.run("next")).await;
    assert!(next.is_ok(), "channel stayed locked after a timeout");
}

#[tokio::test]
async fn maps_search_runs_through_channel() {
    let runner = RecordingRunner::new();
    let channel = ScriptChannel::new(runner.shared());
    let handlers = maps_handlers(&channel);
    let (_, search) = handlers
        .iter()
        .find(|(name, _)| *name == "maps_search")
        .unwrap();

    let result = search
        .call(args(json!({"query": "coffee near me"})), CallContext::new("maps_search"))
        .await
        .unwrap();

    assert!(!result.is_error());
    let scripts = runner.scripts();
    assert_eq!(scripts.len(), 1);
    assert!(scripts[0].contains("maps://?q=coffee+near+me"));
}

#[tokio::test]
async fn empty_output_reports_completion() {
    let runner = RecordingRunner::new();
    runner.push_result(Ok(String::new()));
    let channel = ScriptChannel::new(runner.shared());
    let handlers = maps_handlers(&channel);
    let (_, open) = handlers
        .iter()
        .find(|(name, _)| *name == "maps_open")
        .unwrap();

    let result = open
        .call(args(json!({"address": "1 Infinite Loop"})), CallContext::new("maps_open"))
        .await
        .unwrap();
    assert_eq!(result.text_content(), "maps_open completed");
}

#[tokio::test]
async fn automation_failures_become_error_results() {
    let runner = RecordingRunner::new();
    runner.push_result(Err(AutomationError::ExecutionFailed(
        "Maps got an error (-1743)".into(),
    )));
    let channel = ScriptChannel::new(runner.shared());
    let handlers = maps_handlers(&channel);
    let (_, pin) = handlers
        .iter()
        .find(|(name, _)| *name == "maps_pin")
        .unwrap();

    let result = pin
        .call(
            args(json!({"latitude": 1.5, "longitude": 2.5})),
            CallContext::new("maps_pin"),
        )
        .await
        .unwrap();
    assert!(result.is_error());
    assert_eq!(
        result.text_content(),
        "Error: Script execution failed: Maps got an error (-1743)"
    );
}

#[tokio::test]
async fn invalid_direction_mode_never_reaches_the_host() {
    let runner = RecordingRunner::new();
    let channel = ScriptChannel::new(runner.shared());
    let handlers = maps_handlers(&channel);
    let (_, directions) = handlers
        .iter()
        .find(|(name, _)| *name == "maps_directions")
        .unwrap();

    let result = directions
        .call(
            args(json!({"to": "Airport", "mode": "cycling"})),
            CallContext::new("maps_directions"),
        )
        .await
        .unwrap();
    assert!(result.is_error());
    assert!(result.text_content().starts_with("Error: Invalid mode"));
    assert_eq!(runner.execution_count(), 0);

    let result = directions
        .call(
            args(json!({"to": "Airport", "mode": "transit"})),
            CallContext::new("maps_directions"),
        )
        .await
        .unwrap();
    assert!(!result.is_error());
    assert!(runner.scripts()[0].contains("dirflg=r"));
}

#[tokio::test]
async fn null_direction_mode_means_driving() {
    let runner = RecordingRunner::new();
    let channel = ScriptChannel::new(runner.shared());
    let handlers = maps_handlers(&channel);
    let (_, directions) = handlers
        .iter()
        .find(|(name, _)| *name == "maps_directions")
        .unwrap();

    let result = directions
        .call(
            args(json!({"to": "Airport", "mode": null})),
            CallContext::new("maps_directions"),
        )
        .await
        .unwrap();
    assert!(!result.is_error());
    assert_eq!(runner.execution_count(), 1);
    assert!(runner.scripts()[0].contains("dirflg=d"));
}
