use std::{convert::Infallible, io};

use crate::fs::FsError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid source prefix: {0}")]
    InvalidPrefix(String),

    #[error("placeholder must not be empty")]
    EmptyPlaceholder,

    #[error("fs: {0}")]
    Fs(#[from] FsError),

    #[error("Utf8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("http: {0}")]
    Http(#[from] http::Error),

    #[error("failed to parse address")]
    FailedToParseAddr,

    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("minijinja error: {0}")]
    MiniJinja(#[from] minijinja::Error),

    #[error("{0}")]
    Custom(String),
}

impl From<Infallible> for Error {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}
