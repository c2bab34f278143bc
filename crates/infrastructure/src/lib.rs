//! zonealias infrastructure layer
pub mod dns;
pub mod system;
