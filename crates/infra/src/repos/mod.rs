pub mod courts;
pub mod players;
pub mod queue_entries;
pub mod teams;

pub use courts::{CreateCourt, UpdateCourt};
pub use players::{CreatePlayer, PlayerFilter, UpdatePlayer};
