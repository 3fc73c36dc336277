/// Result of the latest `listen` call plus the one before it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchedSet {
    previous: Vec<String>,
    current: Vec<String>,
}

impl MatchedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the current result into history and installs `next`.
    pub fn replace(&mut self, next: Vec<String>) {
        self.previous = std::mem::replace(&mut self.current, next);
    }

    pub fn current(&self) -> &[String] {
        &self.current
    }

    pub fn previous(&self) -> &[String] {
        &self.previous
    }

    /// Compares content, not identity: two identical results in a row
    /// report no change.
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}
