//! BarVault Runner — backfill orchestration.
//!
//! This crate builds on `barvault-core` to provide:
//! - Explicit backfill configuration (TOML file or caller-built)
//! - Checkpoint and hard-stop file handling
//! - The run driver: checkpoint → hard stop → fetch → bucket → upload →
//!   advance

pub mod backfill;
pub mod checkpoint;
pub mod config;

pub use backfill::{run_backfill, BackfillError, BackfillOutcome};
pub use checkpoint::{read_checkpoint, read_hard_stop_year, write_checkpoint};
pub use config::{BackfillConfig, ConfigError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_is_send_sync() {
        assert_send::<BackfillConfig>();
        assert_sync::<BackfillConfig>();
    }

    #[test]
    fn outcome_is_send_sync() {
        assert_send::<BackfillOutcome>();
        assert_sync::<BackfillOutcome>();
    }
}
