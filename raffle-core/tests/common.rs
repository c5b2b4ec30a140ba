#![allow(dead_code)]

use raffle_core::{
    AudioError, AudioPlayer, DrawEvent, DrawEventHandler, ManualScheduler, Raffle, RafflePorts,
    RandomSource, Renderer, wheel,
};
use raffle_persistence::{KeyValueStore, MemoryStore, PersistenceError, SnapshotRepository};
use raffle_types::{
    DisplayUpdate, RaffleError, Settings, SoundCue, WheelSegment, WinnerRecord,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub type TestRaffle = Raffle<ManualScheduler>;

/// Always returns the same index
pub struct FixedIndex(pub usize);

impl RandomSource for FixedIndex {
    fn next_index(&mut self, _upper: usize) -> usize {
        self.0
    }
}

/// Returns scripted indices in order, then repeats the last one
pub struct ScriptedRandom {
    indices: VecDeque<usize>,
    last: usize,
}

impl ScriptedRandom {
    pub fn new(indices: &[usize]) -> Self {
        Self {
            indices: indices.iter().copied().collect(),
            last: 0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_index(&mut self, _upper: usize) -> usize {
        if let Some(next) = self.indices.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// Renderer that records every call as a display update
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    updates: Arc<Mutex<Vec<DisplayUpdate>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<DisplayUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.updates.lock().unwrap().clear();
    }

    pub fn last_header(&self) -> Option<String> {
        self.updates().into_iter().rev().find_map(|update| match update {
            DisplayUpdate::DrawHeader { text } => Some(text),
            _ => None,
        })
    }

    pub fn last_eligible_count(&self) -> Option<usize> {
        self.updates().into_iter().rev().find_map(|update| match update {
            DisplayUpdate::EligibleList { count, .. } => Some(count),
            _ => None,
        })
    }

    pub fn last_wheel(&self) -> Option<Vec<WheelSegment>> {
        self.updates().into_iter().rev().find_map(|update| match update {
            DisplayUpdate::WheelSegments { segments } => Some(segments),
            _ => None,
        })
    }

    pub fn countdown_ticks(&self) -> Vec<u32> {
        self.updates()
            .into_iter()
            .filter_map(|update| match update {
                DisplayUpdate::CountdownTick { remaining } => Some(remaining),
                _ => None,
            })
            .collect()
    }

    pub fn scramble_names(&self) -> Vec<String> {
        self.updates()
            .into_iter()
            .filter_map(|update| match update {
                DisplayUpdate::ScrambleName { name } => Some(name),
                _ => None,
            })
            .collect()
    }

    fn push(&self, update: DisplayUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}

impl Renderer for RecordingRenderer {
    fn render_eligible_list(&mut self, names: &[String]) {
        self.push(DisplayUpdate::EligibleList {
            names: names.to_vec(),
            count: names.len(),
        });
    }

    fn render_winner_history(&mut self, records: &[WinnerRecord]) {
        self.push(DisplayUpdate::WinnerHistory {
            records: records.to_vec(),
        });
    }

    fn render_countdown_tick(&mut self, remaining: u32) {
        self.push(DisplayUpdate::CountdownTick { remaining });
    }

    fn render_scramble_name(&mut self, name: &str) {
        self.push(DisplayUpdate::ScrambleName {
            name: name.to_string(),
        });
    }

    fn render_final_winner(&mut self, name: &str) {
        self.push(DisplayUpdate::FinalWinner {
            name: name.to_string(),
        });
    }

    fn render_spin_target(&mut self, winner_index: usize, eligible_count: usize) {
        self.push(DisplayUpdate::SpinTarget {
            winner_index,
            eligible_count,
            rotation_degrees: wheel::target_rotation(winner_index, eligible_count),
        });
    }

    fn set_draw_header_text(&mut self, text: &str) {
        self.push(DisplayUpdate::DrawHeader {
            text: text.to_string(),
        });
    }

    fn clear_reveal(&mut self) {
        self.push(DisplayUpdate::RevealCleared);
    }

    fn render_wheel(&mut self, segments: &[WheelSegment]) {
        self.push(DisplayUpdate::WheelSegments {
            segments: segments.to_vec(),
        });
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.push(DisplayUpdate::SettingsApplied {
            settings: *settings,
        });
    }
}

/// Audio player that records cues, optionally rejecting every one
#[derive(Clone, Default)]
pub struct RecordingAudio {
    cues: Arc<Mutex<Vec<SoundCue>>>,
    reject: bool,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self {
            cues: Arc::new(Mutex::new(Vec::new())),
            reject: true,
        }
    }

    pub fn cues(&self) -> Vec<SoundCue> {
        self.cues.lock().unwrap().clone()
    }
}

impl AudioPlayer for RecordingAudio {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        self.cues.lock().unwrap().push(cue);
        if self.reject {
            return Err(AudioError::PlaybackRejected {
                cue,
                reason: "autoplay blocked".to_string(),
            });
        }
        Ok(())
    }
}

/// Key-value store shared between raffle instances, to test reloads
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<MemoryStore>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_store(store: MemoryStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.lock().unwrap().get(key).unwrap()
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.inner.lock().unwrap().get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.inner.lock().unwrap().set(key, value)
    }
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<DrawEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<DrawEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&DrawEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl DrawEventHandler for EventCollector {
    fn handle_event(&mut self, event: DrawEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Handles to the test doubles wired into a raffle
pub struct TestHandles {
    pub renderer: RecordingRenderer,
    pub audio: RecordingAudio,
    pub store: SharedStore,
    pub events: EventCollector,
}

/// Creates a raffle over a fresh shared store with the winner always at `winner_index`
pub fn create_test_raffle(winner_index: usize) -> (TestRaffle, TestHandles) {
    create_raffle_with_store(SharedStore::new(), FixedIndex(winner_index))
}

pub fn create_raffle_with_store(
    store: SharedStore,
    winner_random: impl RandomSource + 'static,
) -> (TestRaffle, TestHandles) {
    let renderer = RecordingRenderer::new();
    let audio = RecordingAudio::new();
    let events = EventCollector::new();

    let ports = RafflePorts::default()
        .with_renderer(renderer.clone())
        .with_audio(audio.clone())
        .with_winner_random(winner_random)
        .with_scramble_random(FixedIndex(0))
        .with_store(SnapshotRepository::new(store.clone()));

    let mut raffle = Raffle::new(ManualScheduler::new(), ports);
    raffle.add_event_handler(Box::new(events.clone()));

    (
        raffle,
        TestHandles {
            renderer,
            audio,
            store,
            events,
        },
    )
}

/// Creates a raffle with the given names loaded
pub fn create_loaded_raffle(names: &[&str], winner_index: usize) -> (TestRaffle, TestHandles) {
    let (mut raffle, handles) = create_test_raffle(winner_index);
    raffle
        .load_participants(&names.join("\n"))
        .expect("test names should not be empty");
    (raffle, handles)
}

/// Fires due timers until none are left, returning the committed winner if any
pub fn run_to_completion(raffle: &mut TestRaffle) -> Result<Option<WinnerRecord>, RaffleError> {
    let mut settled = None;
    while let Some(timer) = raffle.scheduler_mut().pop_due() {
        if let Some(record) = raffle.handle_timer(timer)? {
            settled = Some(record);
        }
    }
    Ok(settled)
}

/// Starts a draw and runs it to the end
pub fn run_draw(raffle: &mut TestRaffle) -> Result<Option<WinnerRecord>, RaffleError> {
    raffle.start_draw()?;
    run_to_completion(raffle)
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

pub fn is_subsequence(sub: &[String], full: &[String]) -> bool {
    let mut full_iter = full.iter();
    sub.iter().all(|name| full_iter.any(|candidate| candidate == name))
}
