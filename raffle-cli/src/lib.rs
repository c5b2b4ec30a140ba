pub mod commands;
pub mod config;
pub mod driver;
pub mod json;
pub mod output;
pub mod session;
pub mod terminal;

use raffle_core::{Raffle, RafflePorts, Scheduler};
use raffle_persistence::{KeyValueStore, SnapshotRepository};

use crate::config::{Config, OutputMode};
use crate::json::JsonLinesRenderer;
use crate::output::SharedOutput;
use crate::terminal::{TerminalBell, TerminalRenderer};

/// Wire a raffle to the configured front end. Renderer, bell and any command
/// replies all write through `out`.
pub fn build_raffle<S, K>(
    config: &Config,
    scheduler: S,
    store: K,
    out: SharedOutput,
) -> Raffle<S>
where
    S: Scheduler,
    K: KeyValueStore + 'static,
{
    let ports = RafflePorts::default().with_store(SnapshotRepository::new(store));
    let ports = match config.output {
        OutputMode::Text => ports
            .with_renderer(TerminalRenderer::new(out.clone()))
            .with_audio(TerminalBell::new(out)),
        OutputMode::Json => ports
            .with_renderer(JsonLinesRenderer::new(out.clone()))
            .with_audio(JsonLinesRenderer::new(out)),
    };

    Raffle::with_config(
        scheduler,
        ports,
        config.timings.clone(),
        config.timestamp_format.clone(),
    )
}
