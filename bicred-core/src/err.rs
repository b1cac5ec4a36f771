//! Error types used across the crates.
//! Currently we alias the anyhow error handling crate.

pub use anyhow::{anyhow, bail, ensure, format_err, Context, Error, Result};
