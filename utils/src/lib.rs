//! Ambient utilities shared across the quorus workspace.

pub mod id;
pub mod logging;
pub mod time;

pub use id::unique_id;
pub use logging::init_tracing;
pub use time::{Clock, SystemClock};
