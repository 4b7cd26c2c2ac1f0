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

//! Classification of non-success API responses.

use std::collections::HashMap;

use http::{HeaderMap, StatusCode};
use log::{error, warn};

/// Convert response headers into the caller-visible diagnostic mapping.
pub fn headers_to_map(headers: &HeaderMap) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (name, value) in headers {
        let _ = map.insert(
            name.as_str().to_string(),
            value.to_str().unwrap_or_default().to_string(),
        );
    }
    map
}

/// Classify a non-success response and build its diagnostic payload.
///
/// Every status yields the same payload, the response header mapping; the
/// status only selects the log level and message. Nothing is retried here:
/// the caller inspects the stored status and decides what to do.
pub fn classify(
    status: StatusCode,
    reason: &str,
    headers: &HeaderMap,
    context: &str,
) -> HashMap<String, String> {
    let diagnostic = headers_to_map(headers);
    match status.as_u16() {
        400 | 503 => {
            error!(
                "Malformed request or service unavailable: {} {} from {}",
                status.as_u16(),
                reason,
                context
            );
        }
        401 => {
            warn!(
                "Authentication failure: {} {} from {}, re-authenticate and retry",
                status.as_u16(),
                reason,
                context
            );
        }
        404 | 409 => {
            warn!(
                "Resource not found or gone: {} {} from {}",
                status.as_u16(),
                reason,
                context
            );
        }
        413 => {
            error!(
                "API limit encountered: {} from {}, limits: {:?}",
                status.as_u16(),
                context,
                diagnostic
            );
        }
        302 | 500 => {
            error!(
                "Redirect or internal error: {} {} from {}, \
                 make the request using the other protocol (HTTP/HTTPS)",
                status.as_u16(),
                reason,
                context
            );
        }
        _ => {
            error!(
                "API failure: {} {} from {}",
                status.as_u16(),
                reason,
                context
            );
        }
    }
    diagnostic
}
