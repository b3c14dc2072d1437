//! Renders turn records into a Markdown transcript and stores it on disk.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod extract;
mod render;
mod store;

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::io;

pub use extract::extract_content;
pub use render::{render, render_turns};
pub use store::{TranscriptStore, filename_label, sanitize_label};

/// Error type for this crate.
#[derive(Debug)]
pub enum Error {
    /// Reading or writing a transcript failed.
    Io(io::Error),
    /// The run configuration could not be serialized.
    Serialize(serde_yaml::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "transcript I/O failed: {err}"),
            Error::Serialize(err) => {
                write!(f, "cannot serialize the run configuration: {err}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Serialize(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Serialize(err)
    }
}
