//! Fluent HTTP request builder with typed JSON fields.
//!
//! # Overview
//! `Request` collects headers, cookies, credentials, a timeout and JSON body
//! fields, then builds a plain-data `HttpRequest`. A `Transport` executes it
//! and returns a fully buffered `HttpResponse` with helpers for headers,
//! cookies and JSON decoding.
//!
//! # Design
//! - JSON fields come from typed values (`json_key_value`) or from compact
//!   tokens (`json_token`): `key=value` is a string, `key:=value` is a
//!   boolean, integer or float. Tokens that do not parse are dropped.
//! - Request building never touches the network (host-does-IO pattern).
//!   The bundled `UreqTransport` (default `ureq` feature) is one transport;
//!   any `Fn(&HttpRequest) -> Result<HttpResponse, RequestError>` is another.
//! - Debug output goes through `tracing`, selected per category with
//!   `DebugFlags`.

pub mod cookie;
pub mod debug;
pub mod error;
pub mod http;
pub mod request;
pub mod token;
pub mod transport;
pub mod value;

pub use cookie::Cookie;
pub use debug::DebugFlags;
pub use error::RequestError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::Request;
pub use token::{apply_token, insert_value, JsonBody};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use value::JsonValue;
