//! Domain definitions.

pub mod booking;
#[cfg(test)]
pub(crate) mod fixture;
pub mod guest;
pub mod room;

pub use self::{booking::Booking, room::Room};
