//! End-to-end pipeline tests against mock adapters and the host clock.

use std::time::{Duration, Instant};

use dimmer::Error;
use dimmer::adapters::time::Esp32TimeAdapter;
use dimmer::app::Pipeline;
use dimmer::app::events::AppEvent;
use dimmer::config::PipelineConfig;
use dimmer::control::DriveCommand;
use dimmer::error::SensorError;
use dimmer::handoff::StageId;

use crate::mock_hw::{MockActuator, MockSensor, RecordingSink, wait_until};

fn fast_config() -> PipelineConfig {
    PipelineConfig {
        sample_period_ms: 5,
        stall_timeout_ms: Some(500),
        ..PipelineConfig::default()
    }
}

#[test]
fn constant_input_drives_actuator_with_same_level() {
    let actuator = MockActuator::new();
    let sink = RecordingSink::new();
    let handle = Pipeline::spawn(
        fast_config(),
        MockSensor::constant(500),
        actuator.clone(),
        sink.clone(),
        Esp32TimeAdapter::new(),
    )
    .unwrap();

    assert!(wait_until(Duration::from_secs(2), || actuator.applied_count() >= 5));
    let stats = handle.shutdown().unwrap();

    let applied = actuator.applied();
    assert!(applied.iter().all(|c| *c == DriveCommand::from_filtered(500, 1023)));
    assert!(stats.commands_issued >= 5);
    assert_eq!(stats.commands_failed, 0);
    assert!(sink.count(|e| matches!(e, AppEvent::DriveIssued { pulse_us: 488, .. })) >= 5);
}

#[test]
fn shutdown_wakes_every_stage_promptly() {
    // Sampler sleeps a long period; filter and actuator block on empty handoffs.
    let config = PipelineConfig {
        sample_period_ms: 10_000,
        stall_timeout_ms: None,
        ..PipelineConfig::default()
    };
    let sink = RecordingSink::new();
    let handle = Pipeline::spawn(
        config,
        MockSensor::constant(100),
        MockActuator::new(),
        sink.clone(),
        Esp32TimeAdapter::new(),
    )
    .unwrap();

    assert!(wait_until(Duration::from_secs(2), || {
        sink.count(|e| matches!(e, AppEvent::DriveIssued { .. })) == 1
    }));

    let start = Instant::now();
    handle.shutdown().unwrap();
    assert!(start.elapsed() < Duration::from_secs(2));

    for stage in StageId::ALL {
        assert_eq!(sink.count(|e| *e == AppEvent::StageStopped(stage)), 1, "{stage:?}");
    }
}

#[test]
fn actuation_failures_do_not_stop_the_pipeline() {
    let actuator = MockActuator::failing_first(3);
    let handle = Pipeline::spawn(
        fast_config(),
        MockSensor::constant(700),
        actuator.clone(),
        RecordingSink::new(),
        Esp32TimeAdapter::new(),
    )
    .unwrap();

    assert!(wait_until(Duration::from_secs(2), || actuator.applied_count() >= 2));
    let stats = handle.shutdown().unwrap();

    assert_eq!(stats.commands_failed, 3);
    assert!(actuator.applied().iter().all(|c| c.level() == 700));
}

#[test]
fn out_of_range_and_failed_reads_keep_previous_value() {
    let sensor = MockSensor::scripted(
        vec![
            Ok(400),
            Ok(5000),
            Err(SensorError::AdcReadFailed(-1)),
            Ok(1024),
        ],
        400,
    );
    let actuator = MockActuator::new();
    let sink = RecordingSink::new();
    let handle = Pipeline::spawn(
        fast_config(),
        sensor,
        actuator.clone(),
        sink.clone(),
        Esp32TimeAdapter::new(),
    )
    .unwrap();

    assert!(wait_until(Duration::from_secs(2), || handle.stats().sampler_cycles() >= 8));
    let stats = handle.shutdown().unwrap();

    assert_eq!(stats.samples_rejected, 2);
    assert_eq!(stats.samples_failed, 1);
    assert!(actuator.applied().iter().all(|c| c.level() == 400));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::SampleRejected { retained: 400, .. })),
        3
    );
}

#[test]
fn slow_sensor_reports_stall_and_deadline_miss() {
    let config = PipelineConfig {
        sample_period_ms: 10,
        stall_timeout_ms: Some(40),
        ..PipelineConfig::default()
    };
    let sink = RecordingSink::new();
    let handle = Pipeline::spawn(
        config,
        MockSensor::constant(300).with_delay(Duration::from_millis(150)),
        MockActuator::new(),
        sink.clone(),
        Esp32TimeAdapter::new(),
    )
    .unwrap();

    let filter_stalled = |e: &AppEvent| {
        matches!(e, AppEvent::StageStalled { stage: StageId::Filter, .. })
    };
    assert!(wait_until(Duration::from_secs(3), || {
        sink.count(|e| matches!(e, AppEvent::DeadlineMissed(_))) >= 1
            && sink.count(filter_stalled) >= 1
    }));
    let stats = handle.shutdown().unwrap();

    assert!(stats.deadline_misses >= 1);
    assert!(stats.worst_lateness_ms >= 100);
    assert!(stats.stalls >= 1);
}

#[test]
fn invalid_config_is_rejected_before_any_thread_starts() {
    let config = PipelineConfig {
        sample_period_ms: 0,
        ..PipelineConfig::default()
    };
    let sink = RecordingSink::new();
    let result = Pipeline::spawn(
        config,
        MockSensor::constant(0),
        MockActuator::new(),
        sink.clone(),
        Esp32TimeAdapter::new(),
    );

    assert!(matches!(result, Err(Error::Config(_))));
    assert!(sink.events().is_empty());
}
