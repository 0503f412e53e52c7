//! Authenticated handle on one Egnyte domain.
//!
//! # Design
//! `Client` is immutable after construction. It keeps the base URL and the
//! preformatted `Authorization` value and owns exactly one `Transport`.
//! Request wrappers and the file façade borrow it, so they cost nothing to
//! create. Since no call mutates the client, it is `Send + Sync` and can be
//! shared across threads as-is.

use tracing::warn;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::file::File;
use crate::request::Request;
use crate::transport::{Transport, UreqTransport};

pub struct Client {
    domain: String,
    base_url: String,
    authorization: String,
    user_agent: String,
    verify_tls: bool,
    transport: Box<dyn Transport>,
}

impl Client {
    /// Client for `https://{domain}.egnyte.com/pubapi/v1`.
    ///
    /// Passing `verify_tls = false` disables certificate checks and is
    /// logged as a warning.
    pub fn new(domain: &str, token: &str, verify_tls: bool) -> Result<Self> {
        Self::with_config(Config::new(domain, token).with_tls_verification(verify_tls))
    }

    /// Client using the blocking `ureq` transport.
    pub fn with_config(config: Config) -> Result<Self> {
        let transport = UreqTransport::new(config.verify_tls);
        Self::with_transport(config, transport)
    }

    /// Client sending every request through `transport`.
    pub fn with_transport(config: Config, transport: impl Transport + 'static) -> Result<Self> {
        validate(&config)?;

        let base_url = config.base_url();
        let parsed = Url::parse(&base_url)?;
        if !matches!(parsed.scheme(), "https" | "http") {
            return Err(Error::Config(format!(
                "Unsupported URL scheme '{}' in {base_url}",
                parsed.scheme()
            )));
        }

        if !config.verify_tls {
            warn!(domain = %config.domain, "TLS certificate verification is disabled");
        }

        Ok(Self {
            domain: config.domain,
            base_url,
            authorization: format!("Bearer {}", config.token),
            user_agent: config.user_agent,
            verify_tls: config.verify_tls,
            transport: Box::new(transport),
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn verifies_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn request(&self) -> Request<'_> {
        Request::new(self)
    }

    pub fn file(&self) -> File<'_> {
        File::new(self)
    }

    pub(crate) fn authorization(&self) -> &str {
        &self.authorization
    }

    pub(crate) fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("domain", &self.domain)
            .field("base_url", &self.base_url)
            .field("authorization", &"Bearer <redacted>")
            .field("verify_tls", &self.verify_tls)
            .finish_non_exhaustive()
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.domain.is_empty() {
        return Err(Error::Config("Domain cannot be empty".to_string()));
    }

    // Only the computed URL embeds the domain as a host label.
    if config.base_url.is_none()
        && !config
            .domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(Error::Config(format!(
            "Invalid domain '{}': expected the bare subdomain, e.g. 'acme' for acme.egnyte.com",
            config.domain
        )));
    }

    if config.token.is_empty() {
        return Err(Error::Config("Bearer token cannot be empty".to_string()));
    }

    if !config.token.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(Error::Config(
            "Bearer token contains characters that cannot be sent in an HTTP header".to_string(),
        ));
    }

    Ok(())
}
