//! The seam between request building and network I/O.
//!
//! # Design
//! `Transport` is the only place a request touches the network. Anything
//! that can turn an `HttpRequest` into an `HttpResponse` qualifies: the
//! bundled `UreqTransport`, a host-provided client, or a plain closure in
//! tests. Non-2xx statuses must come back as `Ok` responses; only failures to
//! complete the exchange are `RequestError::Transport`.

use crate::error::RequestError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes a single HTTP exchange.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, RequestError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError> {
        self(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq")]
mod ureq_transport {
    use ureq::typestate::WithoutBody;
    use ureq::{Agent, RequestBuilder};

    use super::Transport;
    use crate::error::RequestError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by `ureq`.
    ///
    /// An agent is configured per request so that `HttpRequest::timeout`
    /// applies to that exchange only; a zero timeout means no limit. Status
    /// codes are never turned into errors here, and response bodies are read
    /// in full regardless of size.
    #[derive(Debug, Clone, Default)]
    pub struct UreqTransport {
        _private: (),
    }

    impl UreqTransport {
        pub fn new() -> Self {
            Self::default()
        }

        fn agent(request: &HttpRequest) -> Agent {
            Agent::config_builder()
                .http_status_as_error(false)
                .timeout_global(request.timeout.filter(|t| !t.is_zero()))
                .build()
                .new_agent()
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError> {
            let agent = Self::agent(request);
            let url = request.url.as_str();
            let headers = request.headers.as_slice();
            let body = request.body.as_deref();

            let result = match request.method {
                HttpMethod::Get => send_without_body(with_headers(agent.get(url), headers), body),
                HttpMethod::Delete => {
                    send_without_body(with_headers(agent.delete(url), headers), body)
                }
                HttpMethod::Post => {
                    let builder = with_headers(agent.post(url), headers);
                    match body {
                        Some(b) => builder.send(b),
                        None => builder.send_empty(),
                    }
                }
                HttpMethod::Put => {
                    let builder = with_headers(agent.put(url), headers);
                    match body {
                        Some(b) => builder.send(b),
                        None => builder.send_empty(),
                    }
                }
                HttpMethod::Patch => {
                    let builder = with_headers(agent.patch(url), headers);
                    match body {
                        Some(b) => builder.send(b),
                        None => builder.send_empty(),
                    }
                }
            };

            let mut response = result.map_err(|e| RequestError::Transport(e.to_string()))?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(k, v)| {
                    (
                        k.as_str().to_string(),
                        String::from_utf8_lossy(v.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = response
                .body_mut()
                .with_config()
                .limit(u64::MAX)
                .read_to_vec()
                .map_err(|e| RequestError::Transport(e.to_string()))?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    fn with_headers<B>(builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
        headers
            .iter()
            .fold(builder, |b, (k, v)| b.header(k.as_str(), v.as_str()))
    }

    fn send_without_body(
        builder: RequestBuilder<WithoutBody>,
        body: Option<&[u8]>,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        match body {
            Some(b) => builder.force_send_body().send(b),
            None => builder.call(),
        }
    }
}
