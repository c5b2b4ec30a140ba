//! Collaborators injected into the raffle: presentation, audio and randomness.

use raffle_types::{Settings, SoundCue, WheelSegment, WinnerRecord};

/// Presentation layer driven by the draw state machine. The core owns no
/// display details; it only calls these at defined transition points.
pub trait Renderer {
    fn render_eligible_list(&mut self, names: &[String]);
    fn render_winner_history(&mut self, records: &[WinnerRecord]);
    fn render_countdown_tick(&mut self, remaining: u32);
    fn render_scramble_name(&mut self, name: &str);
    fn render_final_winner(&mut self, name: &str);
    fn render_spin_target(&mut self, winner_index: usize, eligible_count: usize);
    fn set_draw_header_text(&mut self, text: &str);

    /// Hide the reveal panel.
    fn clear_reveal(&mut self) {}

    /// Redraw the idle wheel, one slice per eligible name.
    fn render_wheel(&mut self, _segments: &[WheelSegment]) {}

    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Renderer that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render_eligible_list(&mut self, _names: &[String]) {}
    fn render_winner_history(&mut self, _records: &[WinnerRecord]) {}
    fn render_countdown_tick(&mut self, _remaining: u32) {}
    fn render_scramble_name(&mut self, _name: &str) {}
    fn render_final_winner(&mut self, _name: &str) {}
    fn render_spin_target(&mut self, _winner_index: usize, _eligible_count: usize) {}
    fn set_draw_header_text(&mut self, _text: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    #[error("Playback of {cue:?} was rejected: {reason}")]
    PlaybackRejected { cue: SoundCue, reason: String },
    #[error("No sound asset for {0:?}")]
    MissingAsset(SoundCue),
}

pub trait AudioPlayer {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioPlayer for SilentAudio {
    fn play(&mut self, _cue: SoundCue) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Uniform index source. Not required to be cryptographically secure.
pub trait RandomSource {
    /// Return an index in `0..upper`. `upper` is always at least 1.
    fn next_index(&mut self, upper: usize) -> usize;
}

/// Draws indices from the OS-seeded entropy in a v4 UUID.
///
/// The 122 random bits make the modulo bias negligible for any realistic
/// participant count.
/// Reuses the `uuid` generator the workspace already carries for session ids
/// instead of pulling in a separate RNG crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidRandom;

impl RandomSource for UuidRandom {
    fn next_index(&mut self, upper: usize) -> usize {
        if upper <= 1 {
            return 0;
        }
        (uuid::Uuid::new_v4().as_u128() % upper as u128) as usize
    }
}
