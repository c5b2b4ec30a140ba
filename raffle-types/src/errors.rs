use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::DrawStatus;

/// Errors surfaced to the user as a blocking notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum RaffleError {
    #[error("No names found in the uploaded list")]
    EmptyInput,
    #[error("No eligible participants left to draw from")]
    NoEligibleParticipants,
    #[error("A draw is already in progress ({status:?})")]
    DrawAlreadyInProgress { status: DrawStatus },
}
