//! The component that performs one HTTP exchange.
//!
//! # Design
//! `Transport::send` takes `&self` and a complete descriptor, so a transport
//! holds no per-call state and one client can be shared between threads.
//! `UreqTransport` is the blocking production implementation; tests plug in
//! their own.

use std::sync::Arc;

use tracing::trace;

use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport: Send + Sync {
    /// Execute `request` and return whatever status the server answered.
    ///
    /// Only failures of the exchange itself are errors; 4xx/5xx come back as
    /// an `HttpResponse`.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// Status codes are returned as data rather than `Err`, leaving status
/// interpretation to `Response`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    verify_tls: bool,
}

impl UreqTransport {
    pub fn new(verify_tls: bool) -> Self {
        let tls = ureq::tls::TlsConfig::builder()
            .disable_verification(!verify_tls)
            .build();
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .tls_config(tls)
            .build()
            .new_agent();

        Self { agent, verify_tls }
    }

    pub fn verifies_tls(&self) -> bool {
        self.verify_tls
    }
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("verify_tls", &self.verify_tls)
            .finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(true)
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut response = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(&request.url), &request.headers).call()?,
            HttpMethod::Delete => with_headers(self.agent.delete(&request.url), &request.headers).call()?,
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(&request.url), &request.headers);
                match &request.body {
                    Some(body) => builder.send(body.as_slice())?,
                    None => builder.send_empty()?,
                }
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        // ureq caps bodies at 10 MiB unless told otherwise.
        let body = response.body_mut().with_config().limit(u64::MAX).read_to_vec()?;

        trace!("{} {} -> {}", request.method, request.url, status);
        Ok(HttpResponse { status, headers, body })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Records every request and answers with queued responses, or an empty
    /// 200 once the queue runs dry.
    #[derive(Default)]
    pub(crate) struct RecordingTransport {
        pub(crate) requests: Mutex<Vec<HttpRequest>>,
        responses: Mutex<VecDeque<HttpResponse>>,
    }

    impl RecordingTransport {
        pub(crate) fn respond_with(&self, status: u16, body: &str) {
            self.responses.lock().unwrap().push_back(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.as_bytes().to_vec(),
            });
        }

        pub(crate) fn last(&self) -> HttpRequest {
            self.requests.lock().unwrap().last().cloned().expect("no request sent")
        }
    }

    impl Transport for RecordingTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.responses.lock().unwrap().pop_front().unwrap_or(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: Vec::new(),
            }))
        }
    }
}
