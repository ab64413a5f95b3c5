//! Standard hook providers and composites.

pub mod logging;
pub mod multi;

pub use logging::LoggingHooks;
pub use multi::{MultiStakingHooks, NamedHooks};
