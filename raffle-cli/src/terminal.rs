use std::io::{self, Write};

use tracing::warn;

use raffle_core::{AudioError, AudioPlayer, Renderer, wheel};
use raffle_types::{Settings, SoundCue, WheelSegment, WinnerRecord};

use crate::output::SharedOutput;

/// Plain text renderer for an interactive terminal.
pub struct TerminalRenderer {
    out: SharedOutput,
    scrambling: bool, // Scramble names overwrite one line in place
}

impl TerminalRenderer {
    pub fn new(out: SharedOutput) -> Self {
        Self {
            out,
            scrambling: false,
        }
    }

    fn line(&mut self, text: &str) {
        let result = if std::mem::take(&mut self.scrambling) {
            writeln!(self.out, "\n{}", text)
        } else {
            writeln!(self.out, "{}", text)
        };
        report(result.and_then(|_| self.out.flush()));
    }
}

fn report(result: io::Result<()>) {
    if let Err(e) = result {
        warn!("Failed to write to terminal: {}", e);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

pub fn format_names(names: &[String]) -> String {
    if names.is_empty() {
        return "(none)".to_string();
    }
    names.join(", ")
}

/// Slices alternate between `[name]` and `(name)` like the two wheel colours.
pub fn format_wheel(segments: &[WheelSegment]) -> String {
    if segments.is_empty() {
        return "(empty)".to_string();
    }
    segments
        .iter()
        .map(|segment| {
            if segment.is_even() {
                format!("[{}]", segment.name)
            } else {
                format!("({})", segment.name)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_winners(records: &[WinnerRecord]) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| format!("{:>3}. {} ({})", i + 1, record.name, record.timestamp))
        .collect()
}

pub fn format_settings(settings: &Settings) -> String {
    format!(
        "sound {}, remove winners {}, countdown {}, single display {}, dark mode {}",
        on_off(settings.sound_on),
        on_off(settings.remove_winner_enabled),
        on_off(settings.countdown_enabled),
        on_off(settings.single_display),
        on_off(settings.dark_mode)
    )
}

impl Renderer for TerminalRenderer {
    fn render_eligible_list(&mut self, names: &[String]) {
        let text = format!("Eligible ({}): {}", names.len(), format_names(names));
        self.line(&text);
    }

    fn render_wheel(&mut self, segments: &[WheelSegment]) {
        self.line(&format!("Wheel: {}", format_wheel(segments)));
    }

    fn render_winner_history(&mut self, records: &[WinnerRecord]) {
        if records.is_empty() {
            self.line("Winners: none yet");
            return;
        }
        self.line(&format!("Winners ({}):", records.len()));
        for entry in format_winners(records) {
            self.line(&entry);
        }
    }

    fn render_countdown_tick(&mut self, remaining: u32) {
        self.line(&format!("  {}...", remaining));
    }

    fn render_scramble_name(&mut self, name: &str) {
        self.scrambling = true;
        let result = write!(self.out, "\r  {:<40}", name);
        report(result.and_then(|_| self.out.flush()));
    }

    fn render_final_winner(&mut self, name: &str) {
        self.line(&format!("  >>> {} <<<", name));
    }

    fn render_spin_target(&mut self, winner_index: usize, eligible_count: usize) {
        let rotation = wheel::target_rotation(winner_index, eligible_count);
        self.line(&format!(
            "  Wheel spinning over {} slots ({:.1} degrees)",
            eligible_count, rotation
        ));
    }

    fn set_draw_header_text(&mut self, text: &str) {
        self.line(&format!("== {} ==", text));
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.line(&format!("Settings: {}", format_settings(settings)));
    }
}

/// Rings the terminal bell for every cue.
pub struct TerminalBell {
    out: SharedOutput,
}

impl TerminalBell {
    pub fn new(out: SharedOutput) -> Self {
        Self { out }
    }
}

impl AudioPlayer for TerminalBell {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        self.out
            .write_all(b"\x07")
            .and_then(|_| self.out.flush())
            .map_err(|e| AudioError::PlaybackRejected {
                cue,
                reason: e.to_string(),
            })
    }
}
