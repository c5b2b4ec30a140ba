//! Wheel geometry for the spin animation.

use raffle_types::WheelSegment;

/// Full turns made before the wheel settles on the winner.
pub const SPIN_TURNS: f64 = 5.0;

pub fn angle_per_segment(segment_count: usize) -> f64 {
    if segment_count == 0 {
        return 0.0;
    }
    360.0 / segment_count as f64
}

/// Final rotation in degrees that lands the pointer in the middle of the
/// winner's segment after `SPIN_TURNS` full turns.
pub fn target_rotation(winner_index: usize, segment_count: usize) -> f64 {
    let angle = angle_per_segment(segment_count);
    360.0 * SPIN_TURNS + angle * winner_index as f64 + angle / 2.0
}

/// One slice per eligible name, in list order.
pub fn segments(names: &[String]) -> Vec<WheelSegment> {
    let angle = angle_per_segment(names.len());
    names
        .iter()
        .enumerate()
        .map(|(index, name)| WheelSegment {
            index,
            name: name.clone(),
            start_degrees: angle * index as f64,
            end_degrees: angle * (index + 1) as f64,
        })
        .collect()
}
