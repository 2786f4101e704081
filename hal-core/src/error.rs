//! Error types re-exported from hal-error

pub use hal_error::{HalError, Result};
