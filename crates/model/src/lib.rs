//! An abstraction layer for chat-completion backends.
//!
//! This crate establishes an unified protocol for the conversation
//! runner to talk to a model, so that the runner can switch between a
//! real HTTP endpoint, an offline placeholder and a scripted fake
//! without modifying the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
