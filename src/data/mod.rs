//! Monster records and the bundled dataset: record model, bulk loader, validation.

pub mod loader;
pub mod monster;
pub mod validate;

pub use loader::{load_store, LoadError, MonsterStore, SourceManifest, DEFAULT_SOURCE_FILES};
pub use monster::{AbilityScores, ActionItem, ArmorClass, HitPoints, MonsterRecord, Scalar};
