use std::io::{self, Write};

use tracing::warn;

use raffle_core::{AudioError, AudioPlayer, Renderer, wheel};
use raffle_types::{DisplayUpdate, Settings, SoundCue, WheelSegment, WinnerRecord};

use crate::output::SharedOutput;

/// Writes one `DisplayUpdate` per line for a browser front end to apply.
pub struct JsonLinesRenderer {
    out: SharedOutput,
}

impl JsonLinesRenderer {
    pub fn new(out: SharedOutput) -> Self {
        Self { out }
    }

    pub fn emit(&mut self, update: &DisplayUpdate) -> io::Result<()> {
        write_update(&mut self.out, update)
    }

    fn send(&mut self, update: DisplayUpdate) {
        if let Err(e) = self.emit(&update) {
            warn!("Failed to write display update: {}", e);
        }
    }
}

pub fn write_update(out: &mut impl Write, update: &DisplayUpdate) -> io::Result<()> {
    let line = serde_json::to_string(update)?;
    writeln!(out, "{}", line)?;
    out.flush()
}

impl Renderer for JsonLinesRenderer {
    fn render_eligible_list(&mut self, names: &[String]) {
        self.send(DisplayUpdate::EligibleList {
            names: names.to_vec(),
            count: names.len(),
        });
    }

    fn render_wheel(&mut self, segments: &[WheelSegment]) {
        self.send(DisplayUpdate::WheelSegments {
            segments: segments.to_vec(),
        });
    }

    fn render_winner_history(&mut self, records: &[WinnerRecord]) {
        self.send(DisplayUpdate::WinnerHistory {
            records: records.to_vec(),
        });
    }

    fn render_countdown_tick(&mut self, remaining: u32) {
        self.send(DisplayUpdate::CountdownTick { remaining });
    }

    fn render_scramble_name(&mut self, name: &str) {
        self.send(DisplayUpdate::ScrambleName {
            name: name.to_string(),
        });
    }

    fn render_final_winner(&mut self, name: &str) {
        self.send(DisplayUpdate::FinalWinner {
            name: name.to_string(),
        });
    }

    fn render_spin_target(&mut self, winner_index: usize, eligible_count: usize) {
        self.send(DisplayUpdate::SpinTarget {
            winner_index,
            eligible_count,
            rotation_degrees: wheel::target_rotation(winner_index, eligible_count),
        });
    }

    fn set_draw_header_text(&mut self, text: &str) {
        self.send(DisplayUpdate::DrawHeader {
            text: text.to_string(),
        });
    }

    fn clear_reveal(&mut self) {
        self.send(DisplayUpdate::RevealCleared);
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.send(DisplayUpdate::SettingsApplied {
            settings: *settings,
        });
    }
}

/// The browser plays the asset named in the update.
impl AudioPlayer for JsonLinesRenderer {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        let update = DisplayUpdate::PlaySound {
            cue,
            asset_id: cue.asset_id().to_string(),
        };
        self.emit(&update)
            .map_err(|e| AudioError::PlaybackRejected {
                cue,
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Capture(Rc<RefCell<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn updates(&self) -> Vec<DisplayUpdate> {
            String::from_utf8_lossy(&self.0.borrow())
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    #[test]
    fn test_one_update_per_line() {
        let capture = Capture::default();
        let mut renderer = JsonLinesRenderer::new(SharedOutput::new(capture.clone()));

        renderer.clear_reveal();
        renderer.render_spin_target(1, 4);
        renderer.render_final_winner("Ben");

        let updates = capture.updates();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0], DisplayUpdate::RevealCleared);
        assert_eq!(
            updates[1],
            DisplayUpdate::SpinTarget {
                winner_index: 1,
                eligible_count: 4,
                rotation_degrees: 1800.0 + 90.0 + 45.0,
            }
        );
    }

    #[test]
    fn test_wheel_segments_line() {
        let capture = Capture::default();
        let mut renderer = JsonLinesRenderer::new(SharedOutput::new(capture.clone()));

        renderer.render_wheel(&wheel::segments(&["Ann".to_string(), "Ben".to_string()]));

        match capture.updates().as_slice() {
            [DisplayUpdate::WheelSegments { segments }] => {
                assert_eq!(segments.len(), 2);
                assert_eq!(segments[1].name, "Ben");
                assert_eq!(segments[1].start_degrees, 180.0);
            }
            other => panic!("unexpected updates {:?}", other),
        }
    }

    #[test]
    fn test_sound_names_asset() {
        let capture = Capture::default();
        let mut renderer = JsonLinesRenderer::new(SharedOutput::new(capture.clone()));

        renderer.play(SoundCue::Tick).unwrap();

        assert_eq!(
            capture.updates(),
            vec![DisplayUpdate::PlaySound {
                cue: SoundCue::Tick,
                asset_id: "tick-sound".to_string(),
            }]
        );
    }
}
