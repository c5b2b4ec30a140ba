use raffle_types::WinnerRecord;

/// Append-only record of past winners, stored in draw order.
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    winners: Vec<WinnerRecord>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restore(winners: Vec<WinnerRecord>) -> Self {
        Self { winners }
    }

    /// Append a winner. The same name may appear any number of times.
    pub fn record_winner(
        &mut self,
        name: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> WinnerRecord {
        let record = WinnerRecord::new(name, timestamp);
        self.winners.push(record.clone());
        record
    }

    /// Winners for display, most recent first.
    pub fn list_winners(&self) -> Vec<WinnerRecord> {
        self.winners.iter().rev().cloned().collect()
    }

    pub fn chronological(&self) -> &[WinnerRecord] {
        &self.winners
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }

    pub fn clear(&mut self) {
        self.winners.clear();
    }
}
