//! Client configuration

/// Provider domain the customer subdomain is prefixed to.
pub const PROVIDER_DOMAIN: &str = "egnyte.com";

/// Path of the public API on the customer domain.
pub const API_ENDPOINT: &str = "/pubapi/v1";

/// Client configuration
#[derive(Clone)]
pub struct Config {
    /// Customer subdomain, e.g. `acme` for `acme.egnyte.com`
    pub domain: String,
    /// OAuth bearer token
    pub token: String,
    /// Verify the server's TLS certificate
    pub verify_tls: bool,
    /// Replaces the computed `https://{domain}.egnyte.com/pubapi/v1`
    pub base_url: Option<String>,
    /// User agent string
    pub user_agent: String,
}

impl Config {
    /// Configuration for `domain` with TLS verification enabled.
    pub fn new(domain: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            token: token.into(),
            verify_tls: true,
            base_url: None,
            user_agent: format!("egnyte-core/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Enable or disable certificate verification
    pub fn with_tls_verification(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Send requests to `base_url` instead of the provider domain
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The URL every request path is appended to, without a trailing slash.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.{}{}", self.domain, PROVIDER_DOMAIN, API_ENDPOINT),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("domain", &self.domain)
            .field("token", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
