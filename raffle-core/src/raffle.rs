use chrono::format::{Item, StrftimeItems};
use tracing::{info, warn};

use crate::draw_events::{DrawEvent, DrawEventBus, DrawEventHandler};
use crate::draw_sequencer::{DrawContext, DrawSequencer, HEADER_READY, StepOutcome};
use crate::history_ledger::HistoryLedger;
use crate::participant_pool::ParticipantPool;
use crate::ports::{AudioPlayer, NullRenderer, RandomSource, Renderer, SilentAudio, UuidRandom};
use crate::scheduler::{DrawTimer, Scheduler};
use crate::timings::DrawTimings;
use crate::wheel;
use raffle_persistence::{MemoryStore, RaffleSnapshot, SnapshotRepository, SnapshotStore};
use raffle_types::{DrawStatus, RaffleError, SessionId, Settings, WinnerRecord};

/// Day/month/year with a 24 hour clock.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

pub fn is_valid_timestamp_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Collaborators injected into a [`Raffle`].
pub struct RafflePorts {
    pub renderer: Box<dyn Renderer>,
    pub audio: Box<dyn AudioPlayer>,
    pub winner_random: Box<dyn RandomSource>, // Picks the winner
    pub scramble_random: Box<dyn RandomSource>, // Picks cosmetic scramble names
    pub store: Box<dyn SnapshotStore>,
}

impl RafflePorts {
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_audio(mut self, audio: impl AudioPlayer + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_winner_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.winner_random = Box::new(random);
        self
    }

    pub fn with_scramble_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.scramble_random = Box::new(random);
        self
    }

    pub fn with_store(mut self, store: impl SnapshotStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }
}

impl Default for RafflePorts {
    fn default() -> Self {
        Self {
            renderer: Box::new(NullRenderer),
            audio: Box::new(SilentAudio),
            winner_random: Box::new(UuidRandom),
            scramble_random: Box::new(UuidRandom),
            store: Box::new(SnapshotRepository::new(MemoryStore::new())),
        }
    }
}

/// Single owner of the raffle state. Every mutation goes through a method
/// here, which re-renders what changed and persists the result.
pub struct Raffle<S: Scheduler> {
    pool: ParticipantPool,
    ledger: HistoryLedger,
    settings: Settings,
    timings: DrawTimings,
    timestamp_format: String,
    sequencer: DrawSequencer,
    scheduler: S,
    ports: RafflePorts,
    event_bus: DrawEventBus,
}

impl<S: Scheduler> Raffle<S> {
    pub fn new(scheduler: S, ports: RafflePorts) -> Self {
        Self::with_config(
            scheduler,
            ports,
            DrawTimings::default(),
            DEFAULT_TIMESTAMP_FORMAT,
        )
    }

    /// Build a raffle from whatever the store holds. Missing or corrupt saved
    /// fields start at their defaults.
    pub fn with_config(
        scheduler: S,
        mut ports: RafflePorts,
        timings: DrawTimings,
        timestamp_format: impl Into<String>,
    ) -> Self {
        let mut timestamp_format = timestamp_format.into();
        if !is_valid_timestamp_format(&timestamp_format) {
            warn!(
                "Invalid timestamp format '{}', using '{}'",
                timestamp_format, DEFAULT_TIMESTAMP_FORMAT
            );
            timestamp_format = DEFAULT_TIMESTAMP_FORMAT.to_string();
        }

        let snapshot = ports.store.load();
        info!(
            "Restored {} participants, {} winners, {} removed names",
            snapshot.participants.len(),
            snapshot.winners.len(),
            snapshot.removed_names.len()
        );

        let pool = ParticipantPool::restore(
            snapshot.participants,
            snapshot.removed_names,
            snapshot.settings.remove_winner_enabled,
        );

        let mut raffle = Self {
            pool,
            ledger: HistoryLedger::restore(snapshot.winners),
            settings: snapshot.settings,
            timings,
            timestamp_format,
            sequencer: DrawSequencer::new(),
            scheduler,
            ports,
            event_bus: DrawEventBus::new(),
        };
        raffle.render_all();
        raffle
    }

    pub fn add_event_handler(&mut self, handler: Box<dyn DrawEventHandler>) {
        self.event_bus.add_handler(handler);
    }

    // --- Participant pool ---

    pub fn load_participants(&mut self, raw: &str) -> Result<usize, RaffleError> {
        let count = self.pool.load_participants(raw)?;
        info!("Loaded {} participants", count);

        self.refresh_eligible();
        self.persist();
        self.event_bus.publish(DrawEvent::ParticipantsLoaded { count });
        Ok(count)
    }

    pub fn eligible_names(&self) -> Vec<String> {
        self.pool.eligible_names()
    }

    pub fn all_names(&self) -> &[String] {
        self.pool.all_names()
    }

    pub fn removed_names(&self) -> &[String] {
        self.pool.removed_names()
    }

    // --- Draw ---

    pub fn start_draw(&mut self) -> Result<(), RaffleError> {
        let countdown = self.settings.countdown_enabled;
        let eligible_count = self.pool.eligible_count();

        let outcome = self.with_draw_context(|sequencer, ctx| sequencer.start(ctx))?;
        if let Some(session_id) = self.sequencer.active_session_id() {
            self.event_bus.publish(DrawEvent::DrawStarted {
                session_id,
                eligible_count,
                countdown,
            });
            self.publish_step(session_id, &outcome);
        }
        Ok(())
    }

    /// Dispatch a due timer. Returns the committed record when the draw settles.
    pub fn handle_timer(&mut self, timer: DrawTimer) -> Result<Option<WinnerRecord>, RaffleError> {
        let result = self.with_draw_context(|sequencer, ctx| sequencer.handle(&timer, ctx));

        match result {
            Ok(StepOutcome::Settled { winner }) => {
                Ok(Some(self.commit_winner(timer.session_id, winner)))
            }
            Ok(outcome) => {
                self.publish_step(timer.session_id, &outcome);
                Ok(None)
            }
            Err(error) => {
                self.event_bus.publish(DrawEvent::DrawAborted {
                    session_id: timer.session_id,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Hide the reveal and reset the header without touching the draw.
    pub fn reset_wheel_display(&mut self) {
        self.sequencer.reset_display(self.ports.renderer.as_mut());
    }

    pub fn status(&self) -> DrawStatus {
        self.sequencer.status()
    }

    pub fn last_winner(&self) -> Option<&str> {
        self.sequencer.last_winner()
    }

    // --- History ---

    /// Past winners, most recent first.
    pub fn winners(&self) -> Vec<WinnerRecord> {
        self.ledger.list_winners()
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.ledger
    }

    /// Bring every removed winner back into the pool. History is kept.
    /// Callers confirm with the user first.
    pub fn reset_round(&mut self) {
        self.pool.clear_removed();
        self.sequencer.dismiss_result(self.ports.renderer.as_mut());
        self.refresh_eligible();
        self.persist();

        info!("Round reset, {} names eligible", self.pool.eligible_count());
        self.event_bus.publish(DrawEvent::RoundReset);
    }

    /// Erase all winners and removed names. Callers confirm with the user first.
    pub fn clear_history(&mut self) {
        self.ledger.clear();
        self.pool.clear_removed();
        self.sequencer.dismiss_result(self.ports.renderer.as_mut());
        self.refresh_eligible();
        self.render_history();
        self.persist();

        info!("Winner history cleared");
        self.event_bus.publish(DrawEvent::HistoryCleared);
    }

    // --- Settings ---

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_sound(&mut self, on: bool) {
        self.update_settings(|settings| settings.sound_on = on);
    }

    pub fn set_remove_winner(&mut self, enabled: bool) {
        self.update_settings(|settings| settings.remove_winner_enabled = enabled);
        self.pool.set_remove_winner_enabled(enabled);
        self.refresh_eligible();
    }

    pub fn set_countdown(&mut self, enabled: bool) {
        self.update_settings(|settings| settings.countdown_enabled = enabled);
    }

    pub fn set_single_display(&mut self, enabled: bool) {
        self.update_settings(|settings| settings.single_display = enabled);
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.update_settings(|settings| settings.dark_mode = enabled);
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        let enabled = !self.settings.dark_mode;
        self.set_dark_mode(enabled);
        enabled
    }

    pub fn timings(&self) -> &DrawTimings {
        &self.timings
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // --- Internals ---

    fn with_draw_context<R>(
        &mut self,
        f: impl FnOnce(&mut DrawSequencer, &mut DrawContext<'_>) -> R,
    ) -> R {
        let eligible = self.pool.eligible_names();
        let mut ctx = DrawContext {
            eligible: &eligible,
            settings: &self.settings,
            timings: &self.timings,
            scheduler: &mut self.scheduler,
            renderer: self.ports.renderer.as_mut(),
            audio: self.ports.audio.as_mut(),
            winner_random: self.ports.winner_random.as_mut(),
            scramble_random: self.ports.scramble_random.as_mut(),
        };
        f(&mut self.sequencer, &mut ctx)
    }

    fn commit_winner(&mut self, session_id: SessionId, winner: String) -> WinnerRecord {
        let timestamp = chrono::Local::now()
            .format(&self.timestamp_format)
            .to_string();
        let record = self.ledger.record_winner(winner, timestamp);

        if self.settings.remove_winner_enabled {
            self.pool.mark_removed(&record.name);
            self.refresh_eligible();
        }
        self.render_history();
        self.persist();

        info!("Recorded winner '{}' at {}", record.name, record.timestamp);
        self.event_bus.publish(DrawEvent::WinnerRevealed {
            session_id,
            record: record.clone(),
        });
        record
    }

    fn publish_step(&mut self, session_id: SessionId, outcome: &StepOutcome) {
        let event = match outcome {
            StepOutcome::CountdownTick { remaining } => DrawEvent::CountdownTick {
                session_id,
                remaining: *remaining,
            },
            StepOutcome::WinnerSelected {
                winner_index,
                eligible_count,
            } => DrawEvent::WinnerSelected {
                session_id,
                winner_index: *winner_index,
                eligible_count: *eligible_count,
            },
            _ => return,
        };
        self.event_bus.publish(event);
    }

    fn update_settings(&mut self, apply: impl FnOnce(&mut Settings)) {
        let before = self.settings;
        apply(&mut self.settings);
        if self.settings == before {
            return;
        }

        self.ports.renderer.apply_settings(&self.settings);
        self.persist();
        self.event_bus.publish(DrawEvent::SettingsChanged {
            settings: self.settings,
        });
    }

    fn refresh_eligible(&mut self) {
        let eligible = self.pool.eligible_names();
        self.ports.renderer.render_eligible_list(&eligible);
        self.ports.renderer.render_wheel(&wheel::segments(&eligible));
    }

    fn render_history(&mut self) {
        let records = self.ledger.list_winners();
        self.ports.renderer.render_winner_history(&records);
    }

    fn render_all(&mut self) {
        self.ports.renderer.apply_settings(&self.settings);
        self.refresh_eligible();
        self.render_history();
        self.ports.renderer.set_draw_header_text(HEADER_READY);
    }

    fn persist(&mut self) {
        let snapshot = RaffleSnapshot {
            participants: self.pool.all_names().to_vec(),
            winners: self.ledger.chronological().to_vec(),
            removed_names: self.pool.removed_names().to_vec(),
            settings: self.settings,
        };
        if let Err(e) = self.ports.store.save(&snapshot) {
            warn!("Failed to persist raffle state, keeping it in memory: {}", e);
        }
    }
}
