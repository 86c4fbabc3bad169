//! Domain models for the vet-clinic system.

mod appointment;
mod patch;
mod pet;
mod record;
mod task;
mod time;

pub use appointment::*;
pub use patch::*;
pub use pet::*;
pub use record::*;
pub use task::*;
pub use time::*;
