use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    /// How long the server waits for open connections to finish after the
    /// shutdown signal before giving up on them.
    ///
    /// Default: 10s
    pub(crate) shutdown_timeout: Duration,

    /// Maximum time a client gets to send the request headers.
    ///
    /// Default: 5s
    pub(crate) header_read_timeout: Duration,

    /// Logs one line per request at info level.
    ///
    /// Default: true
    pub(crate) log_requests: bool,

    /// Header `Request::ip` is read from instead of the TCP peer address,
    /// e.g. `X-Forwarded-For` behind a load balancer.
    ///
    /// Default: None
    pub(crate) proxy_header: Option<String>,
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the graceful shutdown timeout duration.
    ///
    /// Default: 10s
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Sets how long a client may take to send its request headers.
    ///
    /// Default: 5s
    pub fn header_read_timeout(mut self, timeout: Duration) -> Self {
        self.header_read_timeout = timeout;
        self
    }

    pub fn log_requests(mut self, enable: bool) -> Self {
        self.log_requests = enable;
        self
    }

    /// Reads the client address from `header` instead of the TCP peer, for
    /// deployments behind a load balancer.
    /// NOTE: headers are easily spoofed and the detected IP addresses are unreliable.
    pub fn proxy_header(mut self, header: impl Into<String>) -> Self {
        self.proxy_header = Some(header.into());
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(10),
            header_read_timeout: Duration::from_secs(5),
            log_requests: true,
            proxy_header: None,
        }
    }
}
