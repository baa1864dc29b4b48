use std::{borrow::Cow, net::SocketAddr};

use http::{HeaderMap, HeaderValue, Method, Uri, Version, header::AsHeaderName};
use percent_encoding::percent_decode_str;

/// An incoming request as seen by the resolver, response hooks and renderers.
///
/// The body is dropped on construction, serving assets never reads it.
#[derive(Debug)]
pub struct Request {
    pub(crate) parts: http::request::Parts,
    /// Path handed to the static file server. Starts out as the decoded URL
    /// path and is rewritten by the resolver.
    pub(crate) path: String,
    pub(crate) ip: Option<String>,
}

impl Request {
    pub fn new<B>(request: http::Request<B>) -> Self {
        let (parts, _) = request.into_parts();
        let path = decode_path(parts.uri.path());
        Request {
            parts,
            path,
            ip: None,
        }
    }

    /// Records the client address, or the value of `proxy_header` when one is
    /// configured and present.
    pub(crate) fn with_peer(mut self, peer_addr: SocketAddr, proxy_header: Option<&str>) -> Self {
        let from_header = proxy_header
            .and_then(|name| self.header(name))
            .map(str::to_string);
        self.ip = Some(from_header.unwrap_or_else(|| peer_addr.to_string()));
        self
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    #[inline]
    pub fn version(&self) -> Version {
        self.parts.version
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap<HeaderValue> {
        &self.parts.headers
    }

    /// Returns the specified Header value as a &str.
    #[inline]
    pub fn header<K>(&self, key: K) -> Option<&str>
    where
        K: AsHeaderName,
    {
        self.headers().get(key).and_then(|v| v.to_str().ok())
    }

    /// The path the file server will look up.
    ///
    /// Equal to the percent-decoded URL path until the resolver rewrites it
    /// to a catalog entry or to the entry document.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub(crate) fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Client address, `"-"` when the request did not come through [`App`](crate::App).
    #[inline]
    pub fn ip(&self) -> &str {
        self.ip.as_deref().unwrap_or("-")
    }
}

// Paths that do not decode to UTF-8 are kept as sent.
fn decode_path(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}
