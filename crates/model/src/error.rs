use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The endpoint could not be reached at all.
    ConnectionRefused,
    /// The request did not complete in time.
    Timeout,
    /// The endpoint answered with a non-2xx status code.
    HttpStatus(u16),
    /// The response body could not be decoded.
    MalformedResponse,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConnectionRefused => write!(f, "Connection refused"),
            ErrorKind::Timeout => write!(f, "Timed out"),
            ErrorKind::HttpStatus(status) => write!(f, "HTTP status {status}"),
            ErrorKind::MalformedResponse => write!(f, "Malformed response"),
            ErrorKind::Other => write!(f, "Other error"),
        }
    }
}
