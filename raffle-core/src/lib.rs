pub mod draw_events;
pub mod draw_sequencer;
pub mod history_ledger;
pub mod participant_pool;
pub mod ports;
pub mod raffle;
pub mod scheduler;
pub mod timings;
pub mod wheel;

// Re-export main components
pub use draw_events::*;
pub use draw_sequencer::*;
pub use history_ledger::*;
pub use participant_pool::*;
pub use ports::*;
pub use raffle::*;
pub use scheduler::*;
pub use timings::*;
