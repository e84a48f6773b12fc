//! Klondike solitaire: the table, the player's actions with undo, and the
//! terminal front end that drives them.

pub mod action;
pub mod app;
pub mod card;
pub mod command;
pub mod config;
pub mod cursor;
pub mod game;
pub mod persist;
pub mod renderer;
pub mod state;

pub use action::{Action, MovePayload, MoveSource, ResolvePayload, ResolveSource};
pub use card::{Card, Suit};
pub use state::GameState;
