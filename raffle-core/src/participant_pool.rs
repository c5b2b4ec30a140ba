use raffle_types::RaffleError;

/// Split raw upload text into participant names.
///
/// `\r\n` and lone `\r` count as line breaks, each line is trimmed and blank
/// lines are dropped. Order and duplicates are preserved.
pub fn parse_participants(raw: &str) -> Vec<String> {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
pub struct ParticipantPool {
    all_names: Vec<String>,
    removed_names: Vec<String>, // Ordered set, insertion order
    remove_winner_enabled: bool,
}

impl ParticipantPool {
    pub fn new(remove_winner_enabled: bool) -> Self {
        Self {
            all_names: Vec::new(),
            removed_names: Vec::new(),
            remove_winner_enabled,
        }
    }

    /// Rebuild a pool from saved state. Duplicate removed entries collapse.
    pub fn restore(
        all_names: Vec<String>,
        removed_names: Vec<String>,
        remove_winner_enabled: bool,
    ) -> Self {
        let mut pool = Self {
            all_names,
            removed_names: Vec::new(),
            remove_winner_enabled,
        };
        for name in removed_names {
            pool.mark_removed(&name);
        }
        pool
    }

    /// Replace the whole list with the names found in `raw`.
    /// On `EmptyInput` the current list is kept.
    pub fn load_participants(&mut self, raw: &str) -> Result<usize, RaffleError> {
        let names = parse_participants(raw);
        if names.is_empty() {
            return Err(RaffleError::EmptyInput);
        }

        self.all_names = names;
        Ok(self.all_names.len())
    }

    pub fn eligible_names(&self) -> Vec<String> {
        if !self.remove_winner_enabled {
            return self.all_names.clone();
        }

        self.all_names
            .iter()
            .filter(|name| !self.is_removed(name))
            .cloned()
            .collect()
    }

    pub fn eligible_count(&self) -> usize {
        if !self.remove_winner_enabled {
            return self.all_names.len();
        }
        self.all_names.iter().filter(|name| !self.is_removed(name)).count()
    }

    pub fn mark_removed(&mut self, name: &str) {
        if !self.is_removed(name) {
            self.removed_names.push(name.to_string());
        }
    }

    pub fn clear_removed(&mut self) {
        self.removed_names.clear();
    }

    pub fn is_removed(&self, name: &str) -> bool {
        self.removed_names.iter().any(|removed| removed == name)
    }

    pub fn set_remove_winner_enabled(&mut self, enabled: bool) {
        self.remove_winner_enabled = enabled;
    }

    pub fn all_names(&self) -> &[String] {
        &self.all_names
    }

    pub fn removed_names(&self) -> &[String] {
        &self.removed_names
    }
}

impl Default for ParticipantPool {
    fn default() -> Self {
        Self::new(true)
    }
}
