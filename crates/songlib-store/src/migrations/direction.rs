use std::fmt;

use crate::queries::names::{DELETE_MIGRATION, INSERT_MIGRATION};

/// Which way a migration run goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Filename suffix selecting this direction's scripts
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Direction::Up => "_up.sql",
            Direction::Down => "_down.sql",
        }
    }

    /// Fragment that records the script's effect in the tracking table
    pub fn tracking_query(&self) -> &'static str {
        match self {
            Direction::Up => INSERT_MIGRATION,
            Direction::Down => DELETE_MIGRATION,
        }
    }

    /// Operation name used in logs and error context
    pub fn op(&self) -> &'static str {
        match self {
            Direction::Up => "migrate_up",
            Direction::Down => "migrate_down",
        }
    }

    /// Up skips versions already tracked; Down replays everything
    pub fn skips_applied(&self) -> bool {
        matches!(self, Direction::Up)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_strategy() {
        assert_eq!(Direction::Up.file_suffix(), "_up.sql");
        assert_eq!(Direction::Down.file_suffix(), "_down.sql");
        assert_eq!(Direction::Up.tracking_query(), "insert_migration");
        assert_eq!(Direction::Down.tracking_query(), "delete_migration");
        assert!(Direction::Up.skips_applied());
        assert!(!Direction::Down.skips_applied());
        assert_eq!(Direction::Down.to_string(), "down");
    }
}
