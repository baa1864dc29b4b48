use bytes::Bytes;
use http::{self, HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use http_body_util::Full;
use std::fmt;

use crate::error::Error;

pub type HttpBody = Full<Bytes>;
pub type HttpResponse<T = HttpBody> = http::Response<T>;

/// Response sink handed to the resolver, response hooks and renderers.
///
/// Starts out as an empty `200 OK`.
pub struct Response {
    pub(crate) inner: http::Response<Bytes>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Response {
            inner: http::Response::new(Bytes::new()),
        }
    }

    /// Sets the HTTP status for the response.
    #[inline]
    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        *self.inner.status_mut() = status;
        self
    }

    #[inline]
    pub fn status_code(&self) -> StatusCode {
        self.inner.status()
    }

    /// Sets the status code and the correct status message in the body if the response body is **empty**.
    pub fn send_status(&mut self, status: StatusCode) -> &mut Self {
        self.status(status);

        if self.inner.body().is_empty() {
            *self.inner.body_mut() = Bytes::from_static(
                status.canonical_reason().unwrap_or("").as_bytes(),
            );
        }

        self
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap<HeaderValue> {
        self.inner.headers()
    }

    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap<HeaderValue> {
        self.inner.headers_mut()
    }

    /// Returns the specified Header value as a &str.
    #[inline]
    pub fn header<K: header::AsHeaderName>(&self, key: K) -> Option<&str> {
        self.inner.headers().get(key).and_then(|v| v.to_str().ok())
    }

    /// Sets multiple headers at once. Accepts:
    /// - A single tuple: `res.set(("Content-Type", "text/plain"))?`
    /// - An array of tuples: `res.set([("Content-Type", "text/plain"), ("Cache-Control", "no-cache")])?`
    /// - A Vec of tuples: `res.set(vec![...])?`
    #[inline]
    pub fn set<H>(&mut self, headers: H) -> Result<&mut Self, Error>
    where
        H: SetIntoHeaders,
    {
        headers.into_headers(self.inner.headers_mut())?;
        Ok(self)
    }

    #[inline]
    pub fn send(&mut self, body: impl Into<Bytes>) -> &mut Self {
        *self.inner.body_mut() = body.into();
        self
    }

    #[inline]
    pub fn content_type<V>(&mut self, value: V) -> Result<&mut Self, Error>
    where
        V: TryInto<HeaderValue>,
        Error: From<V::Error>,
    {
        self.set((header::CONTENT_TYPE, value))
    }

    /// Sends `body` as `200 OK` HTML.
    #[inline]
    pub fn html(&mut self, body: impl Into<Bytes>) -> &mut Self {
        self.status(StatusCode::OK).send(body);
        self.inner.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
        self
    }

    #[inline]
    pub fn body(&self) -> &Bytes {
        self.inner.body()
    }

    pub fn into_inner(self) -> HttpResponse {
        self.inner.map(Full::new)
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status_code", &self.inner.status())
            .field("body", &self.inner.body())
            .finish()
    }
}

pub trait SetIntoHeaders {
    fn into_headers(self, map: &mut HeaderMap) -> Result<(), Error>;
}

impl<K, V> SetIntoHeaders for (K, V)
where
    K: TryInto<HeaderName>,
    V: TryInto<HeaderValue>,
    Error: From<K::Error> + From<V::Error>,
{
    fn into_headers(self, map: &mut HeaderMap) -> Result<(), Error> {
        let k = self.0.try_into()?;
        let v = self.1.try_into()?;
        map.insert(k, v);
        Ok(())
    }
}

impl<K, V, const N: usize> SetIntoHeaders for [(K, V); N]
where
    K: TryInto<HeaderName>,
    V: TryInto<HeaderValue>,
    Error: From<K::Error> + From<V::Error>,
{
    fn into_headers(self, map: &mut HeaderMap) -> Result<(), Error> {
        for (key, value) in self {
            let k = key.try_into()?;
            let v = value.try_into()?;
            map.insert(k, v);
        }
        Ok(())
    }
}

impl<K, V> SetIntoHeaders for Vec<(K, V)>
where
    K: TryInto<HeaderName>,
    V: TryInto<HeaderValue>,
    Error: From<K::Error> + From<V::Error>,
{
    fn into_headers(self, map: &mut HeaderMap) -> Result<(), Error> {
        for (key, value) in self {
            let k = key.try_into()?;
            let v = value.try_into()?;
            map.insert(k, v);
        }
        Ok(())
    }
}
