use raffle_types::{RaffleError, SessionId, Settings, WinnerRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    ParticipantsLoaded {
        count: usize,
    },
    DrawStarted {
        session_id: SessionId,
        eligible_count: usize,
        countdown: bool,
    },
    CountdownTick {
        session_id: SessionId,
        remaining: u32,
    },
    WinnerSelected {
        session_id: SessionId,
        winner_index: usize,
        eligible_count: usize,
    },
    WinnerRevealed {
        session_id: SessionId,
        record: WinnerRecord,
    },
    DrawAborted {
        session_id: SessionId,
        error: RaffleError,
    },
    RoundReset,
    HistoryCleared,
    SettingsChanged {
        settings: Settings,
    },
}

impl DrawEvent {
    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            DrawEvent::DrawStarted { session_id, .. }
            | DrawEvent::CountdownTick { session_id, .. }
            | DrawEvent::WinnerSelected { session_id, .. }
            | DrawEvent::WinnerRevealed { session_id, .. }
            | DrawEvent::DrawAborted { session_id, .. } => Some(*session_id),
            DrawEvent::ParticipantsLoaded { .. }
            | DrawEvent::RoundReset
            | DrawEvent::HistoryCleared
            | DrawEvent::SettingsChanged { .. } => None,
        }
    }
}

/// Event handler trait for observing raffle activity
pub trait DrawEventHandler {
    fn handle_event(&mut self, event: DrawEvent);
}

/// Simple event bus for distributing draw events
pub struct DrawEventBus {
    handlers: Vec<Box<dyn DrawEventHandler>>,
}

impl DrawEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn DrawEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: DrawEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for DrawEventBus {
    fn default() -> Self {
        Self::new()
    }
}
