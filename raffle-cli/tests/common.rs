#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use raffle_cli::build_raffle;
use raffle_cli::config::{Config, OutputMode};
use raffle_cli::output::SharedOutput;
use raffle_cli::session::CliSession;
use raffle_core::{ManualScheduler, Scheduler};
use raffle_persistence::connection::connect_to_memory_store;
use raffle_types::DisplayUpdate;

/// Captures everything written to the session output
#[derive(Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn updates(&self) -> Vec<DisplayUpdate> {
        self.text()
            .lines()
            .map(|line| serde_json::from_str(line).expect("every line should be a display update"))
            .collect()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn config_with(output: OutputMode) -> Config {
    Config {
        output,
        ..Config::default()
    }
}

pub fn create_session<S: Scheduler>(
    output: OutputMode,
    scheduler: S,
) -> (CliSession<S>, Capture) {
    let capture = Capture::default();
    let out = SharedOutput::new(capture.clone());
    let raffle = build_raffle(
        &config_with(output),
        scheduler,
        connect_to_memory_store(),
        out.clone(),
    );
    (CliSession::new(raffle, output, out), capture)
}

pub fn create_manual_session(output: OutputMode) -> (CliSession<ManualScheduler>, Capture) {
    create_session(output, ManualScheduler::new())
}

/// Fires every pending timer through the session
pub fn run_timers(session: &mut CliSession<ManualScheduler>) {
    while let Some(timer) = session.raffle_mut().scheduler_mut().pop_due() {
        session.handle_timer(timer).unwrap();
    }
}

pub fn write_names_file(names: &[&str]) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("raffle-names-{}.txt", uuid::Uuid::new_v4()));
    std::fs::write(&path, names.join("\n")).unwrap();
    path
}
