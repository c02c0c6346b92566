//! Passkey capability detection

use reqwest::Url;
use std::net::IpAddr;

/// Reports whether passkey operations can run in the current context.
/// Implementations must be side-effect free.
pub trait CapabilityChecker: Send + Sync {
    fn is_supported(&self) -> bool;
}

/// Description of the host the client runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionContext {
    /// A document/window is available (false for servers and CLIs)
    pub has_window: bool,
    pub is_secure_context: bool,
    /// The platform exposes a credential management API
    pub has_credentials_api: bool,
}

impl ExecutionContext {
    /// A context with no window; never supports passkeys
    pub fn headless() -> Self {
        Self::default()
    }

    /// A windowed context whose security is derived from its origin
    pub fn for_origin(origin: &str, has_credentials_api: bool) -> Self {
        Self {
            has_window: true,
            is_secure_context: is_potentially_trustworthy(origin),
            has_credentials_api,
        }
    }
}

impl CapabilityChecker for ExecutionContext {
    fn is_supported(&self) -> bool {
        self.has_window && self.is_secure_context && self.has_credentials_api
    }
}

/// Secure-context rules: TLS schemes, or plain http on a loopback host
fn is_potentially_trustworthy(origin: &str) -> bool {
    let Ok(url) = Url::parse(origin) else {
        return false;
    };

    match url.scheme() {
        "https" | "wss" => true,
        "http" | "ws" => match url.host_str() {
            Some(host) => is_loopback_host(host),
            None => false,
        },
        _ => false,
    }
}

fn is_loopback_host(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host == "localhost" || host.ends_with(".localhost") {
        return true;
    }
    host.parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}
