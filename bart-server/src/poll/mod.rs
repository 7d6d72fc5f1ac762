//! Periodic refresh of the board for the current selection.

mod config;
mod scheduler;
mod state;


pub use config::PollConfig;
pub use scheduler::{PollerHandle, spawn_poller};
pub use state::{
    BoardSnapshot, CycleReport, CycleToken, DepartureFeed, FeedFailure, FeedKind, Outcome, Phase,
    PollState, SameStation, Selection, StaleCycle,
};
