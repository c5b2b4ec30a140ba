use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::info;

use raffle_cli::build_raffle;
use raffle_cli::config::Config;
use raffle_cli::driver::TokioScheduler;
use raffle_cli::output::SharedOutput;
use raffle_cli::session::{CliSession, Flow};
use raffle_persistence::connection::connect_to_state_file;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::new().context("Invalid configuration")?;

    // Logs go to stderr so stdout stays clean for the JSON front end
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(config.log_level)
        .init();

    info!("Starting raffle draw...");

    // Unreadable saved state starts empty rather than blocking startup
    let store = connect_to_state_file(&config.state_file);
    let (scheduler, mut timers) = TokioScheduler::new();
    let out = SharedOutput::stdout();
    let raffle = build_raffle(&config, scheduler, store, out.clone());
    let mut session = CliSession::new(raffle, config.output, out);

    if let Some(path) = &config.participants_file {
        session.load_file(path)?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        // Piped input may end mid-draw; let the draw finish first
        if !stdin_open && !session.raffle().status().is_in_flight() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if stdin_open => match line.context("Failed to read stdin")? {
                Some(line) => {
                    if session.handle_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                None => {
                    info!("Input closed");
                    stdin_open = false;
                }
            },
            Some(timer) = timers.recv() => session.handle_timer(timer)?,
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    info!("Raffle draw shutdown complete.");
    Ok(())
}
