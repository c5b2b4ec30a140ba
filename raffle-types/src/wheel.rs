use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One slice of the wheel, in degrees clockwise from the top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WheelSegment {
    pub index: usize,
    pub name: String,
    pub start_degrees: f64,
    pub end_degrees: f64,
}

impl WheelSegment {
    /// Even slices take the first of the two alternating colours.
    pub fn is_even(&self) -> bool {
        self.index % 2 == 0
    }
}
