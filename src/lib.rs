#![doc(test(attr(deny(warnings))))]

//! Savings Calc records fixed monthly costs against an income, computes the
//! money left over for saving, and keeps named calculations as JSON files
//! that can be mirrored to a remote drive.

pub mod calculation;
pub mod cli;
pub mod config;
pub mod errors;
pub mod session;
pub mod storage;
pub mod sync;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Savings Calc tracing initialized.");
    });
}
