//! The HTTP layer beneath [GoveeApiClient](crate::GoveeApiClient).
//!
//! Requests are described by plain values so that an alternative
//! [HttpTransport] can be injected, eg: to use a pre-configured
//! reqwest client or to replay canned responses in tests.
use crate::config::ClientConfig;
use crate::error::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Method, StatusCode};

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform a single round trip. Non-2xx statuses are not errors
    /// at this layer; only failure to exchange a request is.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Release any idle pooled connections.
    fn close(&self) {}
}

/// The default transport, backed by a pooled `reqwest::Client`.
pub struct ReqwestTransport {
    config: ClientConfig,
    client: Mutex<Option<reqwest::Client>>,
}

impl ReqwestTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Self::build_client(&config)?;
        Ok(Self {
            config,
            client: Mutex::new(Some(client)),
        })
    }

    fn build_client(config: &ClientConfig) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()?)
    }

    /// reqwest::Client is a handle around a shared pool, so this
    /// is cheap. A client dropped by close() is rebuilt on demand.
    fn client(&self) -> Result<reqwest::Client> {
        let mut client = self.client.lock();
        match &*client {
            Some(c) => Ok(c.clone()),
            None => {
                let c = Self::build_client(&self.config)?;
                client.replace(c.clone());
                Ok(c)
            }
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client()?.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse { status, body })
    }

    fn close(&self) {
        // Dropping our handle releases the pool once any in-flight
        // requests holding a clone have completed.
        self.client.lock().take();
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a queue of canned responses and records every request.
    /// When only one response remains it is repeated indefinitely.
    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<HttpResponse>>,
        pub requests: Mutex<Vec<HttpRequest>>,
        pub closed: Mutex<u32>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: &str) -> Self {
            self.responses.lock().push_back(HttpResponse {
                status: StatusCode::from_u16(status).expect("valid status"),
                body: body.as_bytes().to_vec(),
            });
            self
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.requests.lock().push(request);
            let mut responses = self.responses.lock();
            let response = if responses.len() > 1 {
                responses.pop_front()
            } else {
                responses.front().cloned()
            };
            Ok(response.expect("MockTransport has no responses queued"))
        }

        fn close(&self) {
            *self.closed.lock() += 1;
        }
    }
}
