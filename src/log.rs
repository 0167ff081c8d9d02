//! `debug!` / `warn!` for the renderer.
//!
//! Scene assembly reports registered templates, resolved `use` references and
//! skipped elements; rendering reports canvas allocation, each root drawn and
//! PNG writes.
//! These go to `tracing` when the `tracing` feature is on and vanish otherwise.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
