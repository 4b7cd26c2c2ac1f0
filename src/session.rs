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

//! Session structure definition.

use std::collections::HashMap;

use http::header::CONTENT_TYPE;
use http::StatusCode;
use log::{debug, error, trace};
use reqwest::blocking::Client;
use reqwest::Method;
use serde_json::Value;
use static_assertions::assert_impl_all;

use crate::identity::{self, ResolvedIdentity};
use crate::protocol::AccessRoot;
use crate::{catalog, request, url, Error, ErrorKind, SessionConfig};

/// Field-name prefix marking provider-specific extensions in the user object.
const PROVIDER_PREFIX: &str = "RAX-AUTH";

/// Outcome of an authentication attempt.
///
/// Only genuinely unexpected conditions (bad configuration, malformed
/// responses, no usable endpoint) surface as errors; a rejected or
/// unreachable identity service is an outcome the caller is expected to
/// handle by inspecting the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The session is established: token, tenant and endpoint are set.
    Authenticated,
    /// The identity service returned a non-success status; the diagnostic is
    /// stored as the last response.
    Rejected,
    /// The identity service could not be reached at the transport level.
    Unreachable,
}

impl AuthOutcome {
    /// Whether the session is usable for compute calls.
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthOutcome::Authenticated)
    }
}

/// Body of the last response received on this session.
#[derive(Debug, Clone)]
pub enum ResponseData {
    /// Parsed JSON body of a successful call.
    Json(Value),
    /// Raw body of a successful call that was not JSON (usually empty).
    Raw(String),
    /// Header mapping of a classified non-success response.
    Diagnostic(HashMap<String, String>),
}

impl ResponseData {
    /// The parsed JSON body, if this was a successful JSON response.
    #[inline]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseData::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The diagnostic header mapping, if this was a classified failure.
    #[inline]
    pub fn as_diagnostic(&self) -> Option<&HashMap<String, String>> {
        match self {
            ResponseData::Diagnostic(map) => Some(map),
            _ => None,
        }
    }
}

/// Status, reason and body of the last request/response exchange.
///
/// Overwritten on every call; this is not an accumulated history.
#[derive(Debug, Clone)]
pub struct LastResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Reason phrase.
    pub reason: String,
    /// Response payload or diagnostic.
    pub data: ResponseData,
}

impl LastResponse {
    /// Whether the exchange was successful (status below 300).
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.as_u16() < 300
    }
}

/// State derived from a successful authentication.
#[derive(Debug, Clone)]
struct SessionState {
    token: String,
    tenant_id: String,
    endpoint: String,
    secure: bool,
    rackspace: bool,
}

/// An OpenStack Compute API session.
///
/// A session is created from a [SessionConfig](struct.SessionConfig.html) and
/// must be authenticated before any compute call:
///
/// ```rust,no_run
/// let config = osnova::SessionConfig::new("demo")
///     .with_api_key("deadbeef")
///     .with_rax_region("DFW");
/// let mut session = osnova::Session::new(config).expect("Cannot create an HTTP client");
/// let outcome = session.authenticate().expect("Authentication errored");
/// assert!(outcome.is_authenticated());
/// ```
///
/// All I/O is synchronous and blocking: each call performs exactly one
/// request/response exchange. Every operation takes `&mut self`, so a session
/// shared between threads has to be serialized externally.
#[derive(Debug)]
pub struct Session {
    client: Client,
    config: SessionConfig,
    state: Option<SessionState>,
    last: Option<LastResponse>,
}

assert_impl_all!(Session: Send, Sync);

impl Session {
    /// Create a new session from the given configuration.
    ///
    /// Connection pooling is disabled: the session model is one connection
    /// per request/response exchange.
    pub fn new(config: SessionConfig) -> Result<Session, Error> {
        let client = Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(Error::from)?;
        Ok(Session::new_with_client(client, config))
    }

    /// Create a new session with the provided HTTP client.
    pub fn new_with_client(client: Client, config: SessionConfig) -> Session {
        Session {
            client,
            config,
            state: None,
            last: None,
        }
    }

    /// The configuration this session was created from.
    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Bearer token, if authenticated.
    #[inline]
    pub fn token(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.token.as_str())
    }

    /// Tenant ID, if authenticated.
    #[inline]
    pub fn tenant_id(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.tenant_id.as_str())
    }

    /// Compute endpoint URL discovered via the service catalog.
    #[inline]
    pub fn endpoint(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.endpoint.as_str())
    }

    /// Whether this session authenticated against a known hosted provider.
    #[inline]
    pub fn is_rackspace(&self) -> Option<bool> {
        self.state.as_ref().map(|s| s.rackspace)
    }

    /// Status, reason and body of the most recent exchange.
    #[inline]
    pub fn last_response(&self) -> Option<&LastResponse> {
        self.last.as_ref()
    }

    /// Authenticate against the resolved identity endpoint.
    ///
    /// All session state is re-derived from the fresh response: calling this
    /// again never merges with the previous state. A non-success status or an
    /// unreachable identity service is reported through the returned
    /// [AuthOutcome](enum.AuthOutcome.html), not as an error.
    pub fn authenticate(&mut self) -> Result<AuthOutcome, Error> {
        let resolved = identity::resolve(&self.config)?;
        let token_url = resolved.token_url(&self.config.api_version);
        debug!("Authenticating against {}", token_url);

        let result = self
            .client
            .post(&token_url)
            .header(CONTENT_TYPE, "application/json")
            .json(&resolved.body)
            .send();
        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                error!("Identity service at {} could not be reached: {}", token_url, e);
                return Ok(AuthOutcome::Unreachable);
            }
        };

        let status = resp.status();
        let reason = reason_phrase(status);
        if status.as_u16() >= 300 {
            let diagnostic = request::classify(status, &reason, resp.headers(), &token_url);
            self.last = Some(LastResponse {
                status,
                reason,
                data: ResponseData::Diagnostic(diagnostic),
            });
            return Ok(AuthOutcome::Rejected);
        }

        let text = match resp.text() {
            Ok(text) => text,
            Err(e) => {
                error!("Malformed response from {}: {}", token_url, e);
                return Ok(AuthOutcome::Unreachable);
            }
        };
        let root: AccessRoot = serde_json::from_str(&text)?;
        trace!("Received catalog: {:?}", root.access.service_catalog);

        let state = state_from_access(&resolved, &root)?;
        debug!(
            "Authenticated as tenant {} with compute endpoint {}",
            state.tenant_id, state.endpoint
        );
        self.state = Some(state);
        self.last = Some(LastResponse {
            status,
            reason,
            data: ResponseData::Json(serde_json::from_str(&text)?),
        });
        Ok(AuthOutcome::Authenticated)
    }

    /// Issue a GET against a compute API path.
    #[inline]
    pub fn get(&mut self, path: &str) -> Result<&LastResponse, Error> {
        self.dispatch(Method::GET, path, None)
    }

    /// Issue a POST with a JSON body against a compute API path.
    #[inline]
    pub fn post(&mut self, path: &str, body: &Value) -> Result<&LastResponse, Error> {
        self.dispatch(Method::POST, path, Some(body))
    }

    /// Issue a DELETE against a compute API path.
    #[inline]
    pub fn delete(&mut self, path: &str) -> Result<&LastResponse, Error> {
        self.dispatch(Method::DELETE, path, None)
    }

    fn dispatch(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<&LastResponse, Error> {
        let (token, endpoint, secure) = match self.state {
            Some(ref state) => (state.token.clone(), state.endpoint.clone(), state.secure),
            None => {
                return Err(Error::new(
                    ErrorKind::NotAuthenticated,
                    "Authenticate before issuing compute API calls",
                ));
            }
        };

        let (host, prefix) = url::split_host(url::strip_scheme(&endpoint));
        let scheme = if secure { "https" } else { "http" };
        let target = format!("{}://{}{}", scheme, host, url::join_path(prefix, path));
        trace!("{} {}", method, target);

        let mut builder = self
            .client
            .request(method, &target)
            .header("x-auth-token", token)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send()?;

        let status = resp.status();
        let reason = reason_phrase(status);
        let last = if status.as_u16() >= 300 {
            let diagnostic = request::classify(status, &reason, resp.headers(), &target);
            LastResponse {
                status,
                reason,
                data: ResponseData::Diagnostic(diagnostic),
            }
        } else {
            let data = success_data(resp.text()?)?;
            LastResponse {
                status,
                reason,
                data,
            }
        };

        Ok(self.last.insert(last))
    }
}

/// Interpret the body of a successful response.
///
/// A GET against an empty collection can legitimately return an empty body;
/// that is not a parse error.
fn success_data(text: String) -> Result<ResponseData, Error> {
    if text.is_empty() {
        Ok(ResponseData::Raw(text))
    } else {
        Ok(ResponseData::Json(serde_json::from_str(&text)?))
    }
}

#[inline]
fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

/// Derive fresh session state from an identity response.
fn state_from_access(
    resolved: &ResolvedIdentity,
    root: &AccessRoot,
) -> Result<SessionState, Error> {
    let endpoint =
        catalog::find_compute_endpoint(&root.access.service_catalog, &resolved.region)?.to_string();

    let token = root.access.token.id.clone();
    let tenant_id = root.access.token.tenant.id.clone();
    if token.is_empty() || tenant_id.is_empty() || endpoint.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidResponse,
            "Identity response contains an empty token, tenant ID or endpoint",
        ));
    }

    let rackspace = resolved.rackspace
        || root
            .access
            .user
            .keys()
            .any(|name| name.starts_with(PROVIDER_PREFIX));

    Ok(SessionState {
        token,
        tenant_id,
        endpoint,
        secure: resolved.secure,
        rackspace,
    })
}

#[cfg(test)]
pub mod test {
    use http::StatusCode;
    use maplit::hashmap;
    use reqwest::blocking::Client;

    use super::{state_from_access, success_data, ResponseData, Session, SessionState};
    use crate::protocol::test::ACCESS_SAMPLE;
    use crate::protocol::AccessRoot;
    use crate::{identity, ErrorKind, LastResponse, SessionConfig};

    fn rax_config() -> SessionConfig {
        SessionConfig::new("a").with_api_key("k").with_rax_region("DFW")
    }

    fn demo_session() -> Session {
        Session::new_with_client(Client::new(), rax_config())
    }

    #[test]
    fn test_new_session_has_no_state() {
        let session = demo_session();
        assert!(session.token().is_none());
        assert!(session.endpoint().is_none());
        assert!(session.tenant_id().is_none());
        assert!(session.last_response().is_none());
    }

    #[test]
    fn test_dispatch_requires_authentication() {
        let mut session = demo_session();
        let err = session.get("/servers").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotAuthenticated);
        let err = session
            .post("/servers", &serde_json::json!({}))
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::NotAuthenticated);
        let err = session.delete("/servers/1").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotAuthenticated);
    }

    #[test]
    fn test_state_from_access() {
        let resolved = identity::resolve(&rax_config()).unwrap();
        let root: AccessRoot = serde_json::from_str(ACCESS_SAMPLE).unwrap();
        let state = state_from_access(&resolved, &root).unwrap();
        assert_eq!(state.token, "aaaaa-bbbbb-ccccc-dddd");
        assert_eq!(state.tenant_id, "123456");
        assert_eq!(
            state.endpoint,
            "https://dfw.servers.api.rackspacecloud.com/v2/123456"
        );
        assert!(state.secure);
        assert!(state.rackspace);
    }

    #[test]
    fn test_state_from_access_provider_prefix() {
        let config = SessionConfig::new("a")
            .with_password("p")
            .with_region("DFW")
            .with_auth_url("https://cloud.local:5000");
        let resolved = identity::resolve(&config).unwrap();
        assert!(!resolved.rackspace);
        let root: AccessRoot = serde_json::from_str(ACCESS_SAMPLE).unwrap();
        // The sample user object carries a RAX-AUTH prefixed field.
        let state = state_from_access(&resolved, &root).unwrap();
        assert!(state.rackspace);
    }

    #[test]
    fn test_state_from_access_no_endpoint() {
        let config = SessionConfig::new("a")
            .with_api_key("k")
            .with_rax_region("LON");
        let resolved = identity::resolve(&config).unwrap();
        let root: AccessRoot = serde_json::from_str(ACCESS_SAMPLE).unwrap();
        // The sample catalog has DFW and ORD endpoints only.
        let err = state_from_access(&resolved, &root).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::EndpointNotFound);
        assert!(err.to_string().contains("cloudFiles"));
    }

    #[test]
    fn test_state_from_access_empty_token() {
        let resolved = identity::resolve(&rax_config()).unwrap();
        let mut root: AccessRoot = serde_json::from_str(ACCESS_SAMPLE).unwrap();
        root.access.token.id = String::new();
        let err = state_from_access(&resolved, &root).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }

    #[test]
    fn test_state_from_access_empty_endpoint() {
        let resolved = identity::resolve(&rax_config()).unwrap();
        let mut root: AccessRoot = serde_json::from_str(ACCESS_SAMPLE).unwrap();
        for record in &mut root.access.service_catalog {
            for endpoint in &mut record.endpoints {
                endpoint.public_url = String::new();
            }
        }
        let err = state_from_access(&resolved, &root).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }

    #[test]
    fn test_classified_failure_leaves_state_untouched() {
        let mut session = demo_session();
        session.state = Some(SessionState {
            token: "token".to_string(),
            tenant_id: "tenant".to_string(),
            endpoint: "https://example.com/v2/tenant".to_string(),
            secure: true,
            rackspace: true,
        });

        // A classified failure only refreshes the last-response record.
        session.last = Some(LastResponse {
            status: StatusCode::UNAUTHORIZED,
            reason: "Unauthorized".to_string(),
            data: ResponseData::Diagnostic(hashmap! {
                "x-compute-request-id".to_string() => "req-1".to_string(),
            }),
        });

        assert_eq!(session.token(), Some("token"));
        assert_eq!(session.endpoint(), Some("https://example.com/v2/tenant"));
        let last = session.last_response().unwrap();
        assert!(!last.is_success());
        assert_eq!(
            last.data.as_diagnostic().unwrap(),
            &hashmap! {
                "x-compute-request-id".to_string() => "req-1".to_string(),
            }
        );
    }

    #[test]
    fn test_dispatch_classifies_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buffer = [0; 4096];
            let _ = std::io::Read::read(&mut stream, &mut buffer).unwrap();
            std::io::Write::write_all(
                &mut stream,
                b"HTTP/1.1 401 Unauthorized\r\n\
                  x-compute-request-id: req-401\r\n\
                  content-length: 0\r\n\
                  connection: close\r\n\r\n",
            )
            .unwrap();
        });

        let endpoint = format!("http://{}/v2/tenant", addr);
        let mut session = demo_session();
        session.state = Some(SessionState {
            token: "token".to_string(),
            tenant_id: "tenant".to_string(),
            endpoint: endpoint.clone(),
            secure: false,
            rackspace: true,
        });

        let last = session.get("/servers").unwrap().clone();
        server.join().unwrap();

        assert_eq!(last.status, StatusCode::UNAUTHORIZED);
        assert!(!last.is_success());
        assert_eq!(
            last.data.as_diagnostic().unwrap().get("x-compute-request-id"),
            Some(&"req-401".to_string())
        );
        // A classified failure leaves the session state intact.
        assert_eq!(session.token(), Some("token"));
        assert_eq!(session.endpoint(), Some(endpoint.as_str()));
    }

    #[test]
    fn test_success_data_empty_body() {
        let data = success_data(String::new()).unwrap();
        match data {
            ResponseData::Raw(text) => assert!(text.is_empty()),
            other => panic!("Unexpected data {:?}", other),
        }
    }

    #[test]
    fn test_success_data_json_body() {
        let data = success_data(r#"{"servers": []}"#.to_string()).unwrap();
        assert_eq!(data.as_json().unwrap()["servers"], serde_json::json!([]));
    }

    #[test]
    fn test_success_data_malformed_body() {
        let err = success_data("not json".to_string()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }

    #[test]
    fn test_response_data_accessors() {
        let json = ResponseData::Json(serde_json::json!({"servers": []}));
        assert!(json.as_json().is_some());
        assert!(json.as_diagnostic().is_none());

        let raw = ResponseData::Raw(String::new());
        assert!(raw.as_json().is_none());
        assert!(raw.as_diagnostic().is_none());
    }
}
