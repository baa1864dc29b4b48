use std::time::Duration;

use http::{Method, StatusCode};

pub(crate) struct FormattedDuration(pub(crate) Duration);

impl std::fmt::Display for FormattedDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nanos = self.0.as_nanos() as u64;
        if nanos >= 1_000_000_000 {
            let ms = nanos / 1_000_000;
            write!(f, "{}.{:03}s", ms / 1000, ms % 1000)
        } else if nanos >= 1_000_000 {
            let us = nanos / 1_000;
            write!(f, "{}.{:03}ms", us / 1000, us % 1000)
        } else {
            write!(f, "{}.{:03}µs", nanos / 1000, nanos % 1000)
        }
    }
}

pub(crate) fn log_request(
    status: StatusCode,
    elapsed: Duration,
    ip: &str,
    method: &Method,
    path: &str,
) {
    tracing::info!(
        "{} | {:^10} | {} | {:^7} | {}",
        status.as_u16(),
        FormattedDuration(elapsed),
        ip,
        method.as_str(),
        path,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_a_readable_unit() {
        assert_eq!(FormattedDuration(Duration::from_nanos(1_500)).to_string(), "1.500µs");
        assert_eq!(FormattedDuration(Duration::from_micros(2_250)).to_string(), "2.250ms");
        assert_eq!(FormattedDuration(Duration::from_millis(3_007)).to_string(), "3.007s");
    }
}
