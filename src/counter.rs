pub mod action;
pub mod state;
pub mod update;

pub use action::Action;
pub use state::{AppState, User};
pub use update::{Counter, FetchSettings};
