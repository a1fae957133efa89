#![doc(test(attr(deny(warnings))))]

//! Move Intake hosts the moving-order intake form behind an interactive shell.
//! The form logic itself lives in the `intake-*` crates; this crate wires
//! configuration, storage, auth and tracing together.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(intake_config::DEFAULT_LOG_FILTER);
}

/// Initializes global tracing once. `RUST_LOG` wins over `filter`.
pub fn init_with_filter(filter: &str) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::debug!("Move Intake tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init_with_filter("move_intake=debug");
    }
}
