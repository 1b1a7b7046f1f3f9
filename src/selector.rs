use crate::catalog::{Mood, MoodCatalog};
use crate::error::Result;

/// Raw selection input: slider position, direct click on a label, or a config/CLI id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoodInput {
    Index(usize),
    Id(String),
}

impl From<usize> for MoodInput {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for MoodInput {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

/// Tracks which mood option is marked active. At most one at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodSelector {
    active: Option<usize>,
}

impl MoodSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn is_active(&self, ordinal: usize) -> bool {
        self.active == Some(ordinal)
    }

    /// Validates the input against the catalog. Invalid input leaves the
    /// active marker untouched.
    pub fn select<'c>(&mut self, catalog: &'c MoodCatalog, input: &MoodInput) -> Result<&'c Mood> {
        let mood = match input {
            MoodInput::Index(index) => catalog.by_index(*index)?,
            MoodInput::Id(id) => catalog.by_id(id)?,
        };
        self.active = Some(mood.ordinal);
        Ok(mood)
    }

    /// Click-wheel rotation. Wraps around both ends of the catalog.
    pub fn rotate<'c>(&mut self, catalog: &'c MoodCatalog, delta: isize) -> Result<&'c Mood> {
        let len = catalog.len() as isize;
        let target = match self.active {
            Some(current) => (current as isize + delta).rem_euclid(len),
            None if delta > 0 => (delta - 1).rem_euclid(len),
            None => delta.rem_euclid(len),
        };
        self.select(catalog, &MoodInput::Index(target as usize))
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}
