//! Core logic of a scripted two-model conversation: turn orchestration,
//! context injections, run configuration and turn records.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod conversation;
mod duet;
pub mod injection;
mod model_client;
pub mod turn;

pub use config::{ConfigError, RunConfig, RunConfigBuilder};
pub use duet::{Duet, DuetBuilder, RunError};
pub use turn::{Side, Speaker, TurnRecord};
