pub mod display;
pub mod draw;
pub mod errors;
pub mod settings;
pub mod wheel;

pub type SessionId = uuid::Uuid;

// Re-export all types
pub use display::*;
pub use draw::*;
pub use errors::*;
pub use settings::*;
pub use wheel::*;
