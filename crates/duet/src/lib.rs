//! Lets two language models hold a scripted conversation and records it.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to load settings and drive a [`core::Duet`] yourself.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod settings;

pub use settings::{OllamaSettings, Settings};

/// Re-exports of [`duet_core`] crate.
pub mod core {
    pub use duet_core::*;
}

/// Re-exports of [`duet_model`] crate.
pub mod model {
    pub use duet_model::*;
}

/// Re-exports of [`duet_transcript`] crate.
pub mod transcript {
    pub use duet_transcript::*;
}
