// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for inspector operations.

/// Result type alias for inspector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the viewer or exporting properties.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A call into the external viewer failed (load, pick, property fetch).
    #[error("viewer call `{call}` failed: {message}")]
    Viewer { call: &'static str, message: String },

    /// A viewer result did not have the expected shape.
    #[error("unexpected viewer result for `{call}`: {message}")]
    Decode { call: &'static str, message: String },

    /// The configuration could not be read.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The export document could not be handed to the host.
    #[error("download failed: {0}")]
    Delivery(String),

    /// A required page element is missing or a DOM call failed.
    #[error("DOM error: {0}")]
    Dom(String),
}

impl Error {
    /// Shorthand for a failed viewer call.
    pub fn viewer(call: &'static str, message: impl Into<String>) -> Self {
        Error::Viewer {
            call,
            message: message.into(),
        }
    }

    /// Shorthand for an undecodable viewer result.
    pub fn decode(call: &'static str, message: impl Into<String>) -> Self {
        Error::Decode {
            call,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
