//! Save options

/// File name the database is written under inside the output directory
pub const DEFAULT_DATABASE_NAME: &str = "gilgamesh.db";

/// How the database file is replaced on save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStrategy {
    /// Open the existing file, drop the tables and recreate them.
    ///
    /// A failure after the drop leaves the file with missing or empty tables.
    #[default]
    InPlace,

    /// Build a fresh database next to the target and rename it over the target
    /// once the transaction has committed. A failed save leaves the previous
    /// file untouched.
    AtomicRename,
}

/// Options for [`crate::TraceSession::save_with`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Database file name, relative to the output directory
    pub file_name: String,

    /// Replacement strategy
    pub strategy: SaveStrategy,
}

impl SaveOptions {
    pub fn new() -> Self {
        SaveOptions {
            file_name: DEFAULT_DATABASE_NAME.to_string(),
            strategy: SaveStrategy::InPlace,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_strategy(mut self, strategy: SaveStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self::new()
    }
}
