//! Type definitions

pub mod import;
pub mod messages;
pub mod reservation;

pub use import::*;
pub use messages::*;
pub use reservation::*;
