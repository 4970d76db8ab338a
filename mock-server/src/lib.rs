//! Echo server for exercising HTTP clients.
//!
//! Every route reflects something about the incoming request so a client
//! can assert on exactly what it sent:
//!
//! - `ANY /echo` returns method, path, headers, cookies and body as JSON
//! - `ANY /status/{code}` answers with that status
//! - `GET /set-cookie/{name}/{value}` sets a cookie
//! - `GET /basic-auth/{user}/{pass}` checks an `Authorization: Basic` header
//! - `GET /delay/{ms}` sleeps before answering
//! - `GET /bytes/{n}` answers with `n` bytes of `x`

use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// What `/echo` saw.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
    /// The body parsed as JSON, or `None` if empty or not JSON.
    pub json: Option<serde_json::Value>,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthResult {
    pub authenticated: bool,
    pub user: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/set-cookie/{name}/{value}", get(set_cookie))
        .route("/basic-auth/{user}/{pass}", get(basic_auth))
        .route("/delay/{ms}", get(delay))
        .route("/bytes/{n}", get(bytes))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let mut header_map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in &headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        header_map
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    let cookies = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: header_map,
        cookies,
        json: serde_json::from_slice(&body).ok(),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")).into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, "invalid status code").into_response(),
    }
}

async fn set_cookie(Path((name, value)): Path<(String, String)>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, format!("{name}={value}; Path=/"))],
        format!("{name}={value}"),
    )
}

async fn basic_auth(
    Path((user, pass)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<AuthResult>, StatusCode> {
    let expected = format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")));
    let given = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if given != Some(expected.as_str()) {
        tracing::info!(%user, "basic auth rejected");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(AuthResult {
        authenticated: true,
        user,
    }))
}

async fn delay(Path(ms): Path<u64>) -> String {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    format!("slept {ms}ms")
}

async fn bytes(Path(n): Path<usize>) -> Vec<u8> {
    vec![b'x'; n]
}
