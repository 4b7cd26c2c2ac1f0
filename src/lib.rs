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

//! Synchronous OpenStack/Rackspace Compute session and authentication.
//!
//! The crate establishes a session against an Identity V2 endpoint, extracts
//! the bearer token and the compute endpoint from the returned service
//! catalog, and issues blocking REST calls on behalf of the session:
//!
//! ```rust,no_run
//! let config = osnova::SessionConfig::new("demo")
//!     .with_api_key("deadbeef")
//!     .with_rax_region("DFW");
//! let mut session = osnova::Session::new(config).expect("Cannot create an HTTP client");
//! if session.authenticate().expect("Authentication errored").is_authenticated() {
//!     let servers = session.server_list().expect("Listing failed");
//!     println!("{:?}", servers.data);
//! }
//! ```
//!
//! HTTP failures are never raised as errors: the status, reason and a
//! diagnostic header mapping are stored on the session for the caller to
//! inspect. Nothing is retried automatically; a 401 in particular means the
//! caller should re-authenticate explicitly.

#![crate_name = "osnova"]
#![crate_type = "lib"]
// NOTE: we do not use generic deny(warnings) to avoid breakages with new
// versions of the compiler. Add more warnings here as you discover them.
#![deny(
    improper_ctypes,
    missing_debug_implementations,
    missing_docs,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused_allocation,
    unused_comparisons,
    unused_doc_comments,
    unused_import_braces,
    unused_parens,
    while_true
)]

mod catalog;
mod compute;
mod config;
mod error;
mod identity;
pub mod protocol;
mod request;
mod session;
mod url;

pub use crate::catalog::find_compute_endpoint;
pub use crate::compute::{ServerBuilder, RAX_PUBLIC_NET_ID, RAX_SERVICE_NET_ID};
pub use crate::config::{from_env, SessionConfig};
pub use crate::error::{Error, ErrorKind};
pub use crate::identity::{resolve, ResolvedIdentity};
pub use crate::request::{classify, headers_to_map};
pub use crate::session::{AuthOutcome, LastResponse, ResponseData, Session};
