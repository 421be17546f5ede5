//! Bounded command history.

/// Number of lines retained by default.
pub const DEFAULT_CAPACITY: usize = 20;

/// Oldest-first command history with a fixed capacity.
///
/// Pushing at capacity evicts the oldest entry. Entries are single lines
/// (the interpreter never feeds a newline through), so the newline-joined
/// form used for persistence is lossless.
#[derive(Debug)]
pub struct History {
    entries: Vec<String>,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A history retaining at most `capacity` lines. Capacities below one
    /// are clamped to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a line, evicting the oldest entry when full.
    pub fn push(&mut self, line: &str) {
        if self.entries.len() == self.capacity {
            self.entries.remove(0);
        }
        self.entries.push(line.to_string());
    }

    /// Entries oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Newline-joined form for the key-value store.
    pub fn serialize(&self) -> String {
        self.entries.join("\n")
    }

    /// Rebuild from [`History::serialize`] output. Blank lines are
    /// skipped; the capacity bound applies, so an oversized dump keeps
    /// only its newest entries.
    pub fn deserialize(text: &str, capacity: usize) -> Self {
        let mut history = Self::with_capacity(capacity);
        for line in text.lines().filter(|l| !l.is_empty()) {
            history.push(line);
        }
        history
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
