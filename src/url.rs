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

//! Handy primitives for normalizing endpoint URLs.

/// Strip a leading `http://` or `https://` scheme, if any.
#[inline]
pub fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Split a scheme-less URL into the bare host and the retained path suffix.
///
/// The path suffix comes back without a leading slash and may be empty.
#[inline]
pub fn split_host(url: &str) -> (&str, &str) {
    match url.split_once('/') {
        Some((host, path)) => (host, path),
        None => (url, ""),
    }
}

/// Join a path prefix retained from an endpoint URL with a request path.
#[inline]
pub fn join_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("/{}{}", prefix, path)
    }
}

#[cfg(test)]
pub mod test {
    use super::{join_path, split_host, strip_scheme};

    #[test]
    fn test_strip_scheme() {
        assert_eq!(strip_scheme("https://example.com/v2"), "example.com/v2");
        assert_eq!(strip_scheme("http://example.com"), "example.com");
        assert_eq!(strip_scheme("example.com/v2"), "example.com/v2");
    }

    #[test]
    fn test_split_host() {
        assert_eq!(
            split_host("example.com/v2/123456"),
            ("example.com", "v2/123456")
        );
        assert_eq!(split_host("example.com"), ("example.com", ""));
        assert_eq!(split_host("example.com/"), ("example.com", ""));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("v2/123456", "/servers"), "/v2/123456/servers");
        assert_eq!(join_path("", "/servers"), "/servers");
        assert_eq!(join_path("v2/123456/", "/servers"), "/v2/123456/servers");
    }
}
