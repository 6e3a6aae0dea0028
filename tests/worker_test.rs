//! Worker lifecycle and channel handoff tests using scripted devices


use sit_smart_coach::config::Config;
use sit_smart_coach::status::{Severity, StatusMessage, Topic};
use sit_smart_coach::worker::{spawn_worker_with, PostureWorker, StatusChannel, WorkerControls};
use sit_smart_coach::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};
use test_helpers::{FakeCamera, ScriptedDetector};

/// Configuration with fast ticks so tests complete quickly
fn fast_config() -> Config {
    let mut config = Config::default();
    config.timing.worker_tick_ms = 5;
    config.timing.pause_poll_ms = 5;
    config
}

/// Poll the channel until a value arrives or the deadline passes
fn poll_until(channel: &StatusChannel, timeout: Duration) -> Option<Vec<StatusMessage>> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Some(messages) = channel.poll() {
            return Some(messages);
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    None
}

#[test]
fn test_worker_publishes_posture_triple() {
    let channel = Arc::new(StatusChannel::new());
    let controls = WorkerControls::new();
    let worker = PostureWorker::new(
        FakeCamera::working(),
        ScriptedDetector::always_good(),
        &fast_config(),
        Arc::clone(&channel),
        controls.clone(),
    );
    let handle = worker.spawn();

    let messages = poll_until(&channel, Duration::from_secs(2)).expect("worker should publish");
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].topic, Topic::Elbow);
    assert_eq!(messages[0].severity, Severity::Ok);
    assert_eq!(messages[1].topic, Topic::Distance);
    assert_eq!(messages[2].topic, Topic::Gaze);

    controls.stop();
    handle.join().unwrap();
}

#[test]
fn test_missing_body_publishes_single_warning() {
    let channel = Arc::new(StatusChannel::new());
    let controls = WorkerControls::new();
    let handle = PostureWorker::new(
        FakeCamera::working(),
        ScriptedDetector::never_sees_anyone(),
        &fast_config(),
        Arc::clone(&channel),
        controls.clone(),
    )
    .spawn();

    let messages = poll_until(&channel, Duration::from_secs(2)).expect("worker should publish");
    assert_eq!(messages, vec![StatusMessage::move_into_frame()]);

    controls.stop();
    handle.join().unwrap();
}

#[test]
fn test_read_failure_publishes_camera_warning() {
    let channel = Arc::new(StatusChannel::new());
    let controls = WorkerControls::new();
    let handle = PostureWorker::new(
        FakeCamera::broken(),
        ScriptedDetector::always_good(),
        &fast_config(),
        Arc::clone(&channel),
        controls.clone(),
    )
    .spawn();

    let messages = poll_until(&channel, Duration::from_secs(2)).expect("worker should publish");
    assert_eq!(messages, vec![StatusMessage::camera_read_failed()]);

    controls.stop();
    handle.join().unwrap();
}

#[test]
fn test_pause_suppresses_publishing_and_resume_continues() {
    let channel = Arc::new(StatusChannel::new());
    let controls = WorkerControls::new();
    let handle = PostureWorker::new(
        FakeCamera::working(),
        ScriptedDetector::always_good(),
        &fast_config(),
        Arc::clone(&channel),
        controls.clone(),
    )
    .spawn();

    // Let it publish at least once, then pause
    poll_until(&channel, Duration::from_secs(2)).expect("worker should publish before pause");
    controls.pause();

    // An in-flight tick may still land; give it time, then drain
    std::thread::sleep(Duration::from_millis(50));
    let _ = channel.poll();

    // While paused, nothing new arrives
    std::thread::sleep(Duration::from_millis(100));
    assert!(channel.poll().is_none());

    // Resuming picks the loop back up
    controls.resume();
    assert!(poll_until(&channel, Duration::from_secs(2)).is_some());

    controls.stop();
    handle.join().unwrap();
}

#[test]
fn test_consumer_only_ever_sees_newest_analysis() {
    let channel = Arc::new(StatusChannel::new());
    let controls = WorkerControls::new();

    // Body for two ticks, then gone forever
    let script = vec![
        Some(test_helpers::good_posture_frame()),
        Some(test_helpers::good_posture_frame()),
    ];
    let handle = PostureWorker::new(
        FakeCamera::working(),
        ScriptedDetector::new(script, None),
        &fast_config(),
        Arc::clone(&channel),
        controls.clone(),
    )
    .spawn();

    // Let many ticks pass without polling; only the newest state survives
    std::thread::sleep(Duration::from_millis(200));
    let messages = channel.poll().expect("slot should hold the latest analysis");
    assert_eq!(messages, vec![StatusMessage::move_into_frame()]);

    controls.stop();
    handle.join().unwrap();
}

#[test]
fn test_failed_camera_open_publishes_fatal_warning_and_exits() {
    let channel = Arc::new(StatusChannel::new());
    let handle = spawn_worker_with::<FakeCamera, ScriptedDetector, _, _>(
        fast_config(),
        Arc::clone(&channel),
        WorkerControls::new(),
        |_| Err(Error::CameraOpen("no such device".to_string())),
        |_| Ok(ScriptedDetector::always_good()),
    );

    // The thread exits on its own, without a stop request
    handle.join().unwrap();

    // Exactly one fatal warning is left behind
    let messages = channel.poll().expect("fatal warning should be published");
    assert_eq!(messages, vec![StatusMessage::camera_not_detected()]);
    assert!(channel.poll().is_none());
}

#[test]
fn test_failed_model_load_publishes_internal_error_and_exits() {
    let channel = Arc::new(StatusChannel::new());
    let handle = spawn_worker_with::<FakeCamera, ScriptedDetector, _, _>(
        fast_config(),
        Arc::clone(&channel),
        WorkerControls::new(),
        |_| Ok(FakeCamera::working()),
        |_| Err(Error::ModelOutputError("missing model file".to_string())),
    );

    handle.join().unwrap();

    let messages = channel.poll().expect("fatal warning should be published");
    assert_eq!(messages, vec![StatusMessage::internal_error()]);
    assert!(channel.poll().is_none());
}

#[test]
fn test_stop_terminates_promptly() {
    let channel = Arc::new(StatusChannel::new());
    let controls = WorkerControls::new();
    let handle = PostureWorker::new(
        FakeCamera::working(),
        ScriptedDetector::always_good(),
        &fast_config(),
        Arc::clone(&channel),
        controls.clone(),
    )
    .spawn();

    poll_until(&channel, Duration::from_secs(2)).expect("worker should publish");

    let started = Instant::now();
    controls.stop();
    handle.join().unwrap();
    // Bounded by one tick plus the tick sleep, with generous slack
    assert!(started.elapsed() < Duration::from_secs(1));
}
