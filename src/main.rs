//! Dimmer firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        Adapters (outer ring)                     │
//! │                                                                  │
//! │  PotSensor       LedActuator     LogEventSink   Esp32TimeAdapter │
//! │  SimPotSensor    (ActuatorPort)  (EventSink)    (TimePort)       │
//! │  (SensorPort)                                                    │
//! │                                                                  │
//! │  ──────────────────── Port Trait Boundary ─────────────────────  │
//! │                                                                  │
//! │   Sampler ──[raw]──▶ Filter ──[filtered]──▶ Actuator driver      │
//! │   (periodic)         (trimmed mean)         (reactive)           │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On ESP-IDF the pipeline runs forever and logs its counters once a
//! minute.  On the host it drives the same pipeline from a synthetic
//! potentiometer and stops on Ctrl-C or after `--cycles` samples.
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use dimmer::adapters::hardware::LedActuator;
use dimmer::adapters::log_sink::LogEventSink;
use dimmer::adapters::time::Esp32TimeAdapter;
use dimmer::app::Pipeline;
use dimmer::config::PipelineConfig;
use dimmer::drivers::led::LedDriver;
use dimmer::drivers::ledc::LedcChannel;
use dimmer::pins;

fn banner() {
    info!("╔══════════════════════════════════════╗");
    info!("║  Dimmer v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
}

fn led_actuator() -> LedActuator<LedcChannel> {
    let channel = LedcChannel::new(pins::LED_LEDC_CHANNEL, pins::LED_PWM_RESOLUTION_BITS);
    LedActuator::new(LedDriver::new(channel))
}

// ── Firmware ──────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn main() -> Result<()> {
    use std::time::Duration;

    use dimmer::adapters::hardware::PotSensor;
    use dimmer::drivers::hw_init;
    use dimmer::sensors::Potentiometer;

    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    banner();

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;

    // ── 3. Pipeline ───────────────────────────────────────────
    let config = PipelineConfig::default();
    let sensor = PotSensor::new(Potentiometer::new(pins::POT_ADC1_CHANNEL));
    let handle = Pipeline::spawn(
        config,
        sensor,
        led_actuator(),
        LogEventSink::new(),
        Esp32TimeAdapter::new(),
    )?;

    // ── 4. Supervise ──────────────────────────────────────────
    loop {
        std::thread::sleep(Duration::from_secs(60));
        info!("STATS | {}", serde_json::to_string(&handle.stats().snapshot())?);
    }
}

// ── Host simulator ────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(clap::Parser, Debug)]
#[command(
    name = "dimmer",
    version,
    about = "Host simulation of the potentiometer → LED dimmer pipeline"
)]
struct Cli {
    /// JSON pipeline config; built-in defaults when omitted.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Override the sample period (ms).
    #[arg(long)]
    period_ms: Option<u32>,

    /// Stop once this many samples have been taken (default: run until Ctrl-C).
    #[arg(long)]
    cycles: Option<u64>,

    /// Waveform slope, in 12-bit ADC counts per sample.
    #[arg(long, default_value_t = 160)]
    step: u16,

    /// Inject a full-scale spike every N samples (0 = never).
    #[arg(long, default_value_t = 7)]
    spike_every: u32,
}

#[cfg(not(target_os = "espidf"))]
fn main() -> Result<()> {
    use std::time::Duration;

    use anyhow::Context;
    use clap::Parser;
    use tracing_subscriber::EnvFilter;

    use dimmer::adapters::sim::{SimPotSensor, SimWaveform};

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
    banner();

    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            PipelineConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };
    if let Some(period_ms) = cli.period_ms {
        config.sample_period_ms = period_ms;
        // Keep the stall window proportional when only the period changes.
        config.stall_timeout_ms = config.stall_timeout_ms.map(|_| period_ms.saturating_mul(3));
    }
    let poll = Duration::from_millis(u64::from(config.sample_period_ms.clamp(1, 100)));

    let sensor = SimPotSensor::new(SimWaveform::new(cli.step, cli.spike_every));
    let handle = Pipeline::spawn(
        config,
        sensor,
        led_actuator(),
        LogEventSink::new(),
        Esp32TimeAdapter::new(),
    )?;

    let token = handle.shutdown_token();
    {
        let token = token.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl-C received, stopping pipeline");
            token.trigger();
        })
        .context("installing Ctrl-C handler")?;
    }

    while !token.is_requested() && handle.is_running() {
        if cli.cycles.is_some_and(|n| handle.stats().sampler_cycles() >= n) {
            info!("Reached {} samples, stopping pipeline", handle.stats().sampler_cycles());
            break;
        }
        std::thread::sleep(poll);
    }

    let stats = handle.shutdown()?;
    info!("STATS | {}", serde_json::to_string(&stats)?);
    Ok(())
}
