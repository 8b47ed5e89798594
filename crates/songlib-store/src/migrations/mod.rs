//! Schema migration runner
//!
//! Migrations are `<version>_<description>_<up|down>.sql` files in one
//! directory. Up applies every version not yet recorded in the tracking
//! table, in filename order. Down replays every down file in filename order
//! without consulting the tracking table.

mod direction;
mod executor;
mod runner;
mod scanner;
mod tracker;

pub use direction::Direction;
pub use executor::apply_script;
pub use runner::{MigrationReport, Migrator, UpFailure};
pub use scanner::{scan, version_from_file_name, MigrationFile};
pub use tracker::VersionTracker;
