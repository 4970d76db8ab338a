//! Fluent request builder.
//!
//! # Design
//! `Request` collects the target, headers, cookies, credentials and JSON
//! fields through by-value setters, then `build` turns it into a plain-data
//! `HttpRequest`. `send` (and the per-method shorthands) hand that to a
//! `Transport`. Building never touches the network, so everything up to the
//! transport call is deterministic.
//!
//! Setters never fail. Problems that can only be detected late, such as a
//! payload that does not serialize or an unparsable URL, are reported by
//! `build`.

use std::collections::BTreeMap;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use url::Url;

use crate::cookie::{self, Cookie};
use crate::debug::DebugFlags;
use crate::error::RequestError;
use crate::http::{find_header, HttpMethod, HttpRequest, HttpResponse};
use crate::token::{self, JsonBody};
use crate::transport::Transport;
use crate::value::JsonValue;

const CONTENT_TYPE: &str = "Content-Type";
const USER_AGENT: &str = "User-Agent";
const AUTHORIZATION: &str = "Authorization";
const COOKIE: &str = "Cookie";
const APPLICATION_JSON: &str = "application/json";

/// A request under construction.
///
/// ```
/// use restreq_core::{HttpMethod, Request};
///
/// let req = Request::new("http://example.com/users")
///     .content_type_json()
///     .user_agent("Client 1.0")
///     .json_token("name=alice")
///     .json_token("admin:=true")
///     .json_key_value("age", 42)
///     .build(HttpMethod::Post)
///     .unwrap();
///
/// assert_eq!(req.header("content-type"), Some("application/json"));
/// assert_eq!(
///     req.body.as_deref(),
///     Some(br#"{"admin":true,"age":42,"name":"alice"}"#.as_slice())
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    url: String,
    headers: Vec<(String, String)>,
    cookies: BTreeMap<String, Cookie>,
    json: JsonBody,
    json_payload: Option<Result<Vec<u8>, String>>,
    basic_auth: Option<(String, String)>,
    timeout: Option<Duration>,
    debug: DebugFlags,
}

impl Request {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            cookies: BTreeMap::new(),
            json: JsonBody::new(),
            json_payload: None,
            basic_auth: None,
            timeout: None,
            debug: DebugFlags::empty(),
        }
    }

    /// Set a header, replacing any header with the same name (ignoring case).
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name.into(), value.into());
        self
    }

    /// Add a cookie. A later cookie with the same name replaces the earlier one.
    ///
    /// Cookies are rendered after any `Cookie` header set with `header`, in
    /// the same header line.
    pub fn cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.insert(cookie.name.clone(), cookie);
        self
    }

    /// Add an already typed JSON field. Empty keys and empty strings are
    /// skipped.
    pub fn json_key_value(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        token::insert_value(&mut self.json, key, value);
        self
    }

    /// Add a JSON field from a `key=value` or `key:=value` token. Tokens that
    /// do not parse are ignored.
    pub fn json_token(mut self, token: &str) -> Self {
        token::apply_token(token, &mut self.json);
        self
    }

    /// Apply several tokens in order.
    pub fn json_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for t in tokens {
            token::apply_token(t.as_ref(), &mut self.json);
        }
        self
    }

    /// Use `payload` as the body instead of the accumulated JSON fields.
    pub fn json_payload<T: Serialize + ?Sized>(mut self, payload: &T) -> Self {
        self.json_payload = Some(serde_json::to_vec(payload).map_err(|e| e.to_string()));
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some((username.into(), password.into()));
        self
    }

    /// Total time allowed for the exchange. A zero duration means no limit.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout).filter(|t| !t.is_zero());
        self
    }

    pub fn timeout_secs(self, secs: u64) -> Self {
        self.timeout(Duration::from_secs(secs))
    }

    pub fn user_agent(self, agent: impl Into<String>) -> Self {
        self.header(USER_AGENT, agent)
    }

    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.header(CONTENT_TYPE, content_type)
    }

    pub fn content_type_json(self) -> Self {
        self.content_type(APPLICATION_JSON)
    }

    /// Log the selected request/response categories through `tracing`.
    pub fn debug(mut self, flags: DebugFlags) -> Self {
        self.debug = flags;
        self
    }

    /// The JSON fields accumulated so far.
    pub fn json(&self) -> &JsonBody {
        &self.json
    }

    /// Assemble the plain-data request for `method`.
    pub fn build(&self, method: HttpMethod) -> Result<HttpRequest, RequestError> {
        Url::parse(&self.url).map_err(|e| RequestError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        let body = self.encode_body()?;
        if let Some(b) = &body {
            self.debug.log(DebugFlags::REQ_BODY, || {
                format!("Body: {}", String::from_utf8_lossy(b))
            });
        }

        let mut headers = self.headers.clone();
        if let Some(value) = self.authorization() {
            set_header(&mut headers, AUTHORIZATION.to_string(), value);
        }
        for (k, v) in &headers {
            self.debug
                .log(DebugFlags::REQ_HEADERS, || format!("Header: {k}: {v}"));
        }

        if !self.cookies.is_empty() {
            for c in self.cookies.values() {
                self.debug
                    .log(DebugFlags::REQ_COOKIES, || format!("Cookie: {}: {}", c.name, c.value));
            }
            let rendered = cookie::header_value(self.cookies.values());
            let value = match find_header(&headers, COOKIE) {
                Some(manual) if !manual.trim().is_empty() => format!("{}; {rendered}", manual.trim()),
                _ => rendered,
            };
            set_header(&mut headers, COOKIE.to_string(), value);
        }

        Ok(HttpRequest {
            method,
            url: self.url.clone(),
            headers,
            body,
            timeout: self.timeout,
        })
    }

    /// Build the request for `method` and execute it with `transport`.
    pub fn send<T>(&self, method: HttpMethod, transport: &T) -> Result<HttpResponse, RequestError>
    where
        T: Transport + ?Sized,
    {
        let request = self.build(method)?;
        let response = transport.execute(&request)?;
        self.log_response(&response);
        Ok(response)
    }

    pub fn get<T: Transport + ?Sized>(&self, transport: &T) -> Result<HttpResponse, RequestError> {
        self.send(HttpMethod::Get, transport)
    }

    pub fn post<T: Transport + ?Sized>(&self, transport: &T) -> Result<HttpResponse, RequestError> {
        self.send(HttpMethod::Post, transport)
    }

    pub fn put<T: Transport + ?Sized>(&self, transport: &T) -> Result<HttpResponse, RequestError> {
        self.send(HttpMethod::Put, transport)
    }

    pub fn patch<T: Transport + ?Sized>(&self, transport: &T) -> Result<HttpResponse, RequestError> {
        self.send(HttpMethod::Patch, transport)
    }

    pub fn delete<T: Transport + ?Sized>(&self, transport: &T) -> Result<HttpResponse, RequestError> {
        self.send(HttpMethod::Delete, transport)
    }

    fn encode_body(&self) -> Result<Option<Vec<u8>>, RequestError> {
        match &self.json_payload {
            Some(Ok(bytes)) => Ok(Some(bytes.clone())),
            Some(Err(msg)) => Err(RequestError::Serialization(msg.clone())),
            None if self.json.is_empty() => Ok(None),
            None => serde_json::to_vec(&self.json)
                .map(Some)
                .map_err(|e| RequestError::Serialization(e.to_string())),
        }
    }

    /// Credentials are only sent when both parts are non-empty.
    fn authorization(&self) -> Option<String> {
        let (user, pass) = self.basic_auth.as_ref()?;
        if user.is_empty() || pass.is_empty() {
            return None;
        }
        Some(format!("Basic {}", STANDARD.encode(format!("{user}:{pass}"))))
    }

    fn log_response(&self, response: &HttpResponse) {
        for (k, v) in &response.headers {
            self.debug
                .log(DebugFlags::RESP_HEADERS, || format!("Header: {k}: {v}"));
        }
        if self.debug.contains(DebugFlags::RESP_COOKIES) {
            for c in response.cookies() {
                self.debug
                    .log(DebugFlags::RESP_COOKIES, || format!("Cookie: {}: {}", c.name, c.value));
            }
        }
        self.debug
            .log(DebugFlags::RESP_BODY, || format!("Body: {}", response.text()));
    }
}

fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
        Some(existing) => *existing = (name, value),
        None => headers.push((name, value)),
    }
}
