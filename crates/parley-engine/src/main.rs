//! Demo host for the Parley messaging engine.
//!
//! Runs the engine against an in-memory world seeded from the scenario in
//! `parley-config.yaml`. Chat lines are read from stdin as `Name: text`;
//! every line an actor receives is logged under the `inbox` target.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `parley-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Seed the world and build the engine
//! 4. Spawn the tick loop
//! 5. Feed stdin lines to the engine until EOF or Ctrl-C

mod error;
mod session;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parley_core::{EngineError, ParleyConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;
use crate::session::Session;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if startup fails, stdin cannot be read, or the tick
/// loop stops.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so report afterwards.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("parley-engine starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    info!(
        range = config.chat.range,
        whisper_range = config.chat.whisper_range,
        tick_interval_ms = config.engine.tick_interval_ms,
        actors = config.scenario.actors.len(),
        "Configuration loaded"
    );

    // 3. Seed the world and build the engine.
    let period = Duration::from_millis(config.engine.tick_interval_ms);
    let session = Arc::new(Mutex::new(Session::new(config)?));

    // 4. Spawn the tick loop.
    let mut ticker = tokio::spawn(run_ticks(Arc::clone(&session), period));

    // 5. Feed stdin to the engine.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed");
                    break;
                };
                let mut session = session.lock().await;
                if let Err(e) = session.input(&line) {
                    report(&e);
                }
                show_deliveries(&mut session);
            }
            joined = &mut ticker => {
                return match joined {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(e.into()),
                    Err(e) => Err(AppError::Task { message: e.to_string() }.into()),
                };
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Interrupted");
                break;
            }
        }
    }

    ticker.abort();
    let session = session.lock().await;
    info!(
        tick = session.engine().clock().tick(),
        pending = session.engine().missives().scheduler().len(),
        "parley-engine stopped"
    );
    Ok(())
}

/// Tick the session at a fixed period until the clock gives out.
async fn run_ticks(session: Arc<Mutex<Session>>, period: Duration) -> Result<(), AppError> {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        let mut session = session.lock().await;
        session.tick()?;
        show_deliveries(&mut session);
    }
}

/// Log every line delivered to an actor since the last call.
fn show_deliveries(session: &mut Session) {
    for (name, line) in session.drain() {
        info!(target: "inbox", "[{name}] {line}");
    }
}

/// Log a failed input line. Missive rejections have already been shown to
/// the sender.
fn report(error: &AppError) {
    match error {
        AppError::Engine {
            source: EngineError::Missive { .. },
        } => debug!(%error, "missive rejected"),
        _ => warn!(%error, "input rejected"),
    }
}

/// Load configuration from `parley-config.yaml` in the working directory.
///
/// Falls back to defaults when the file does not exist. The flag reports
/// whether the file was read.
fn load_config() -> Result<(ParleyConfig, bool), AppError> {
    let config_path = Path::new("parley-config.yaml");
    if config_path.exists() {
        let config = ParleyConfig::from_file(config_path)?;
        Ok((config, true))
    } else {
        Ok((ParleyConfig::default(), false))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tick_loop_advances_the_clock() {
        let session = Arc::new(Mutex::new(
            Session::new(ParleyConfig::default()).unwrap(),
        ));
        let ticker = tokio::spawn(run_ticks(Arc::clone(&session), Duration::from_millis(5)));

        tokio::time::sleep(Duration::from_millis(100)).await;
        ticker.abort();

        let tick = session.lock().await.engine().clock().tick();
        assert!(tick >= 2, "clock stuck at {tick}");
    }
}
