// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error and result implementations.

use std::error;
use std::fmt;

use http::StatusCode;

/// Kind of an error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The used configuration is incomplete or invalid.
    ///
    /// Returned before any network I/O, e.g. when neither a known region
    /// shorthand nor an auth URL is provided.
    InvalidConfig,

    /// User input was invalid.
    InvalidInput,

    /// An operation requires an authenticated session but none is established.
    NotAuthenticated,

    /// Requested service endpoint was not found in the service catalog.
    EndpointNotFound,

    /// Response received from the server is malformed or does not match
    /// the expected identity schema.
    InvalidResponse,

    /// A problem at the HTTP transport level.
    ProtocolError,
}

impl ErrorKind {
    /// Short description of the error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::InvalidConfig => "Session configuration is invalid",
            ErrorKind::InvalidInput => "Input value(s) are invalid",
            ErrorKind::NotAuthenticated => "Session is not authenticated",
            ErrorKind::EndpointNotFound => "Requested endpoint was not found",
            ErrorKind::InvalidResponse => "Response was invalid",
            ErrorKind::ProtocolError => "Error in HTTP protocol",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Error from an OpenStack call.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<StatusCode>,
}

impl Error {
    /// Create a new error of the provided kind.
    #[inline]
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Error {
        Error {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status code, if any.
    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Add an HTTP status code to the error.
    #[inline]
    pub fn with_status(mut self, status: StatusCode) -> Error {
        self.status = Some(status);
        self
    }

    pub(crate) fn new_endpoint_not_found<S: AsRef<str>>(
        region: S,
        available: &[String],
    ) -> Error {
        Error::new(
            ErrorKind::EndpointNotFound,
            format!(
                "No compute endpoint found for region {}, available services: {}",
                region.as_ref(),
                available.join(", ")
            ),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Error {
        let mut result = Error::new(ErrorKind::ProtocolError, value.to_string());
        if let Some(status) = value.status() {
            result = result.with_status(status);
        }
        result
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Error {
        Error::new(
            ErrorKind::InvalidResponse,
            format!("Malformed JSON received: {}", value),
        )
    }
}
