//! Background [`Task`]s definitions.

mod background;
pub mod mark_no_shows;

pub use common::Handler as Task;

pub use self::{background::Background, mark_no_shows::MarkNoShows};
