use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ports::{AudioPlayer, RandomSource, Renderer};
use crate::scheduler::{DrawStep, DrawTimer, Scheduler};
use crate::timings::DrawTimings;
use raffle_types::{DrawStatus, RaffleError, SessionId, Settings, SoundCue};

pub const HEADER_READY: &str = "Ready to spin";
pub const HEADER_IN_PROGRESS: &str = "Draw in progress...";
pub const REVEAL_PLACEHOLDER: &str = "Revealing result...";
pub const SCRAMBLE_EMPTY: &str = "Result incoming...";

pub fn winner_header(name: &str) -> String {
    format!("Winner: {}", name)
}

/// State of the one draw currently running.
#[derive(Debug, Clone)]
pub struct DrawSession {
    pub id: SessionId,
    pub status: DrawStatus,
    pub selected_winner: Option<String>, // Fixed on entry to Spinning
    pub winner_index: Option<usize>,
    pub started_at: Instant,
    pub reveal_started_at: Option<Instant>,
}

impl DrawSession {
    fn new(started_at: Instant) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: DrawStatus::Idle,
            selected_winner: None,
            winner_index: None,
            started_at,
            reveal_started_at: None,
        }
    }
}

/// Everything a phase transition may touch, borrowed from the coordinator
/// for the duration of one call.
pub struct DrawContext<'a> {
    /// Eligible names at the instant of the call.
    pub eligible: &'a [String],
    pub settings: &'a Settings,
    pub timings: &'a DrawTimings,
    pub scheduler: &'a mut dyn Scheduler,
    pub renderer: &'a mut dyn Renderer,
    pub audio: &'a mut dyn AudioPlayer,
    pub winner_random: &'a mut dyn RandomSource,
    pub scramble_random: &'a mut dyn RandomSource,
}

impl DrawContext<'_> {
    fn play(&mut self, cue: SoundCue) {
        if !self.settings.sound_on {
            return;
        }
        if let Err(e) = self.audio.play(cue) {
            warn!("Sound '{}' failed: {}", cue.asset_id(), e);
        }
    }

    fn schedule(&mut self, delay: Duration, session_id: SessionId, step: DrawStep) {
        self.scheduler.after(delay, DrawTimer { session_id, step });
    }
}

/// What a start or timer dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Ignored,
    CountdownStarted,
    CountdownTick { remaining: u32 },
    WinnerSelected {
        winner_index: usize,
        eligible_count: usize,
    },
    RevealStarted,
    Scrambled,
    Settled { winner: String },
}

/// Idle -> CountingDown? -> Spinning -> Revealing -> Settled.
///
/// Phases advance only through `start` and `handle`; timers from any session
/// other than the active one are dropped.
#[derive(Debug, Default)]
pub struct DrawSequencer {
    session: Option<DrawSession>,
    last_winner: Option<String>,
}

impl DrawSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> DrawStatus {
        match (&self.session, &self.last_winner) {
            (Some(session), _) => session.status,
            (None, Some(_)) => DrawStatus::Settled,
            (None, None) => DrawStatus::Idle,
        }
    }

    pub fn session(&self) -> Option<&DrawSession> {
        self.session.as_ref()
    }

    pub fn active_session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|session| session.id)
    }

    /// Winner of the last settled draw, kept until the next draw starts or the
    /// result is dismissed.
    pub fn last_winner(&self) -> Option<&str> {
        self.last_winner.as_deref()
    }

    pub fn start(&mut self, ctx: &mut DrawContext<'_>) -> Result<StepOutcome, RaffleError> {
        let status = self.status();
        if status.is_in_flight() {
            return Err(RaffleError::DrawAlreadyInProgress { status });
        }
        if ctx.eligible.is_empty() {
            return Err(RaffleError::NoEligibleParticipants);
        }

        self.last_winner = None;
        ctx.renderer.clear_reveal();
        ctx.renderer.set_draw_header_text(HEADER_IN_PROGRESS);
        ctx.play(SoundCue::Spin);

        let session = DrawSession::new(ctx.scheduler.now());
        let session_id = session.id;
        self.session = Some(session);
        info!(
            "Draw {} started with {} eligible participants",
            session_id,
            ctx.eligible.len()
        );

        if ctx.settings.countdown_enabled {
            self.set_status(DrawStatus::CountingDown);
            let tick = ctx.timings.countdown_tick;
            let from = ctx.timings.countdown_from;
            ctx.schedule(tick, session_id, DrawStep::CountdownTick { remaining: from });
            Ok(StepOutcome::CountdownStarted)
        } else {
            self.enter_spinning(ctx)
        }
    }

    pub fn handle(
        &mut self,
        timer: &DrawTimer,
        ctx: &mut DrawContext<'_>,
    ) -> Result<StepOutcome, RaffleError> {
        let Some(session) = self.session.as_ref() else {
            debug!("Ignoring {:?} for finished draw {}", timer.step, timer.session_id);
            return Ok(StepOutcome::Ignored);
        };
        if session.id != timer.session_id {
            debug!(
                "Ignoring {:?} for draw {}, active draw is {}",
                timer.step, timer.session_id, session.id
            );
            return Ok(StepOutcome::Ignored);
        }

        match (session.status, timer.step) {
            (DrawStatus::CountingDown, DrawStep::CountdownTick { remaining: 0 }) => {
                self.enter_spinning(ctx)
            }
            (DrawStatus::CountingDown, DrawStep::CountdownTick { remaining }) => {
                ctx.renderer.render_countdown_tick(remaining);
                ctx.play(SoundCue::Tick);
                let tick = ctx.timings.countdown_tick;
                ctx.schedule(
                    tick,
                    timer.session_id,
                    DrawStep::CountdownTick {
                        remaining: remaining - 1,
                    },
                );
                Ok(StepOutcome::CountdownTick { remaining })
            }
            (DrawStatus::Spinning, DrawStep::SpinComplete) => Ok(self.enter_revealing(ctx)),
            (DrawStatus::Revealing, DrawStep::ScrambleTick) => Ok(self.scramble_or_settle(ctx)),
            (status, step) => {
                warn!("Timer {:?} does not match draw phase {:?}", step, status);
                Ok(StepOutcome::Ignored)
            }
        }
    }

    /// Hide the reveal and reset the header. Never changes the draw status.
    pub fn reset_display(&self, renderer: &mut dyn Renderer) {
        renderer.clear_reveal();
        if !self.status().is_in_flight() {
            renderer.set_draw_header_text(HEADER_READY);
        }
    }

    /// Forget the last settled result. No effect while a draw is running.
    pub fn dismiss_result(&mut self, renderer: &mut dyn Renderer) {
        if self.status().is_in_flight() {
            return;
        }
        self.last_winner = None;
        renderer.clear_reveal();
        renderer.set_draw_header_text(HEADER_READY);
    }

    fn set_status(&mut self, status: DrawStatus) {
        if let Some(session) = self.session.as_mut() {
            session.status = status;
        }
    }

    fn enter_spinning(&mut self, ctx: &mut DrawContext<'_>) -> Result<StepOutcome, RaffleError> {
        if ctx.eligible.is_empty() {
            warn!("No eligible participants left when the spin started");
            self.abort(ctx);
            return Err(RaffleError::NoEligibleParticipants);
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(StepOutcome::Ignored);
        };

        // The winner is fixed now; the wheel only animates towards it.
        let eligible_count = ctx.eligible.len();
        let winner_index = ctx
            .winner_random
            .next_index(eligible_count)
            .min(eligible_count - 1);
        let winner = ctx.eligible[winner_index].clone();

        session.status = DrawStatus::Spinning;
        session.winner_index = Some(winner_index);
        session.selected_winner = Some(winner);
        let session_id = session.id;

        ctx.renderer.render_spin_target(winner_index, eligible_count);
        let spin = ctx.timings.spin_duration;
        ctx.schedule(spin, session_id, DrawStep::SpinComplete);

        Ok(StepOutcome::WinnerSelected {
            winner_index,
            eligible_count,
        })
    }

    fn enter_revealing(&mut self, ctx: &mut DrawContext<'_>) -> StepOutcome {
        let now = ctx.scheduler.now();
        let Some(session) = self.session.as_mut() else {
            return StepOutcome::Ignored;
        };
        session.status = DrawStatus::Revealing;
        session.reveal_started_at = Some(now);
        let session_id = session.id;

        ctx.play(SoundCue::Win);
        ctx.renderer.render_scramble_name(REVEAL_PLACEHOLDER);
        let interval = ctx.timings.scramble_interval;
        ctx.schedule(interval, session_id, DrawStep::ScrambleTick);

        StepOutcome::RevealStarted
    }

    fn scramble_or_settle(&mut self, ctx: &mut DrawContext<'_>) -> StepOutcome {
        let now = ctx.scheduler.now();
        let Some(session) = self.session.as_ref() else {
            return StepOutcome::Ignored;
        };
        let session_id = session.id;
        let reveal_started = session.reveal_started_at.unwrap_or(now);

        if now.duration_since(reveal_started) < ctx.timings.scramble_duration {
            // Cosmetic only: drawn from whoever is eligible right now
            let name = match ctx.eligible.len() {
                0 => SCRAMBLE_EMPTY.to_string(),
                len => {
                    let index = ctx.scramble_random.next_index(len).min(len - 1);
                    ctx.eligible[index].clone()
                }
            };
            ctx.renderer.render_scramble_name(&name);
            let interval = ctx.timings.scramble_interval;
            ctx.schedule(interval, session_id, DrawStep::ScrambleTick);
            return StepOutcome::Scrambled;
        }

        self.settle(ctx)
    }

    fn settle(&mut self, ctx: &mut DrawContext<'_>) -> StepOutcome {
        let Some(session) = self.session.take() else {
            return StepOutcome::Ignored;
        };
        let Some(winner) = session.selected_winner else {
            warn!("Draw {} reached the reveal without a winner", session.id);
            self.last_winner = None;
            ctx.renderer.set_draw_header_text(HEADER_READY);
            return StepOutcome::Ignored;
        };

        ctx.renderer.render_final_winner(&winner);
        ctx.renderer.set_draw_header_text(&winner_header(&winner));
        info!(
            "Draw {} settled on '{}' after {:?}",
            session.id,
            winner,
            ctx.scheduler.now().duration_since(session.started_at)
        );

        self.last_winner = Some(winner.clone());
        StepOutcome::Settled { winner }
    }

    fn abort(&mut self, ctx: &mut DrawContext<'_>) {
        if let Some(session) = self.session.take() {
            info!("Draw {} aborted in {:?}", session.id, session.status);
        }
        self.last_winner = None;
        ctx.renderer.set_draw_header_text(HEADER_READY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{NullRenderer, SilentAudio};
    use crate::scheduler::ManualScheduler;

    struct FirstIndex;

    impl RandomSource for FirstIndex {
        fn next_index(&mut self, _upper: usize) -> usize {
            0
        }
    }

    struct Harness {
        sequencer: DrawSequencer,
        scheduler: ManualScheduler,
        settings: Settings,
        timings: DrawTimings,
        eligible: Vec<String>,
    }

    impl Harness {
        fn new(names: &[&str], countdown_enabled: bool) -> Self {
            Self {
                sequencer: DrawSequencer::new(),
                scheduler: ManualScheduler::new(),
                settings: Settings {
                    countdown_enabled,
                    ..Settings::default()
                },
                timings: DrawTimings::default(),
                eligible: names.iter().map(|name| name.to_string()).collect(),
            }
        }

        fn with_ctx<R>(
            &mut self,
            f: impl FnOnce(&mut DrawSequencer, &mut DrawContext<'_>) -> R,
        ) -> R {
            let mut renderer = NullRenderer;
            let mut audio = SilentAudio;
            let mut winner_random = FirstIndex;
            let mut scramble_random = FirstIndex;
            let mut ctx = DrawContext {
                eligible: &self.eligible,
                settings: &self.settings,
                timings: &self.timings,
                scheduler: &mut self.scheduler,
                renderer: &mut renderer,
                audio: &mut audio,
                winner_random: &mut winner_random,
                scramble_random: &mut scramble_random,
            };
            f(&mut self.sequencer, &mut ctx)
        }

        fn start(&mut self) -> Result<StepOutcome, RaffleError> {
            self.with_ctx(|sequencer, ctx| sequencer.start(ctx))
        }

        fn step(&mut self) -> Option<Result<StepOutcome, RaffleError>> {
            let timer = self.scheduler.pop_due()?;
            Some(self.with_ctx(|sequencer, ctx| sequencer.handle(&timer, ctx)))
        }
    }

    #[test]
    fn test_start_without_countdown_selects_immediately() {
        let mut harness = Harness::new(&["A", "B"], false);

        let outcome = harness.start().unwrap();
        assert_eq!(
            outcome,
            StepOutcome::WinnerSelected {
                winner_index: 0,
                eligible_count: 2
            }
        );
        assert_eq!(harness.sequencer.status(), DrawStatus::Spinning);
        assert_eq!(
            harness.sequencer.session().unwrap().selected_winner.as_deref(),
            Some("A")
        );
    }

    #[test]
    fn test_start_rejected_while_in_flight() {
        let mut harness = Harness::new(&["A"], true);
        harness.start().unwrap();

        let result = harness.start();
        assert_eq!(
            result,
            Err(RaffleError::DrawAlreadyInProgress {
                status: DrawStatus::CountingDown
            })
        );
        assert_eq!(harness.sequencer.status(), DrawStatus::CountingDown);
    }

    #[test]
    fn test_start_with_empty_pool_stays_idle() {
        let mut harness = Harness::new(&[], false);
        assert_eq!(harness.start(), Err(RaffleError::NoEligibleParticipants));
        assert_eq!(harness.sequencer.status(), DrawStatus::Idle);
        assert_eq!(harness.scheduler.pending(), 0);
    }

    #[test]
    fn test_countdown_ticks_from_ten_to_one() {
        let mut harness = Harness::new(&["A"], true);
        assert_eq!(harness.start().unwrap(), StepOutcome::CountdownStarted);

        let mut ticks = Vec::new();
        while let Some(result) = harness.step() {
            match result.unwrap() {
                StepOutcome::CountdownTick { remaining } => ticks.push(remaining),
                StepOutcome::WinnerSelected { .. } => break,
                other => panic!("unexpected outcome {:?}", other),
            }
        }

        assert_eq!(ticks, (1..=10).rev().collect::<Vec<_>>());
        assert_eq!(harness.sequencer.status(), DrawStatus::Spinning);
        assert_eq!(harness.scheduler.elapsed(), Duration::from_secs(11));
    }

    #[test]
    fn test_pool_emptied_during_countdown_aborts_to_idle() {
        let mut harness = Harness::new(&["A"], true);
        harness.start().unwrap();
        harness.eligible.clear();

        let mut last = None;
        while let Some(result) = harness.step() {
            last = Some(result);
        }

        assert_eq!(last, Some(Err(RaffleError::NoEligibleParticipants)));
        assert_eq!(harness.sequencer.status(), DrawStatus::Idle);
        assert!(harness.sequencer.session().is_none());
    }

    #[test]
    fn test_full_draw_settles_after_scramble() {
        let mut harness = Harness::new(&["A", "B", "C"], false);
        harness.start().unwrap();

        let mut scrambles = 0;
        let mut settled = None;
        while let Some(result) = harness.step() {
            match result.unwrap() {
                StepOutcome::Scrambled => scrambles += 1,
                StepOutcome::Settled { winner } => settled = Some(winner),
                _ => {}
            }
        }

        assert_eq!(settled.as_deref(), Some("A"));
        assert_eq!(scrambles, 29); // 100 ms ticks strictly inside the 3 s window
        assert_eq!(harness.sequencer.status(), DrawStatus::Settled);
        assert_eq!(harness.sequencer.last_winner(), Some("A"));
        assert_eq!(harness.scheduler.elapsed(), Duration::from_millis(7500));
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut harness = Harness::new(&["A"], false);
        harness.start().unwrap();

        let stale = DrawTimer {
            session_id: Uuid::new_v4(),
            step: DrawStep::SpinComplete,
        };
        let outcome = harness.with_ctx(|sequencer, ctx| sequencer.handle(&stale, ctx));
        assert_eq!(outcome, Ok(StepOutcome::Ignored));
        assert_eq!(harness.sequencer.status(), DrawStatus::Spinning);
    }

    #[test]
    fn test_reset_display_keeps_status() {
        let mut harness = Harness::new(&["A"], false);
        harness.start().unwrap();
        while harness.step().is_some() {}
        assert_eq!(harness.sequencer.status(), DrawStatus::Settled);

        harness.sequencer.reset_display(&mut NullRenderer);
        assert_eq!(harness.sequencer.status(), DrawStatus::Settled);

        harness.sequencer.dismiss_result(&mut NullRenderer);
        assert_eq!(harness.sequencer.status(), DrawStatus::Idle);
    }
}
