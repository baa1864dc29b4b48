//! Serve a single-page application bundle.
//!
//! Every file of the bundle is catalogued once at startup. Requests for a
//! catalogued path get that file, everything else gets the entry document
//! (`index.html`) so the client side router can take over. A bundle built
//! with a placeholder base path can be retargeted at load time with
//! [`with_prefix`].
//!
//! ```no_run
//! # async fn run() -> Result<(), spa::Error> {
//! use spa::{App, Assets, fs::DirFs, with_prefix};
//!
//! let assets = Assets::new(
//!     DirFs::new("client"),
//!     "dist",
//!     None,
//!     vec![with_prefix("%DEPLOYMENT_PATH%", "console")],
//! )?;
//! App::new(assets).listen("127.0.0.1:3000").await
//! # }
//! ```

pub use http_body_util;
pub use hyper;
pub use minijinja;
#[cfg(feature = "embed")]
pub use rust_embed;

mod app;
mod assets;
mod error;
mod file_server;
pub mod fs;
mod request;
mod response;

pub use crate::app::App;
pub use crate::app::config::Config;
pub use crate::assets::{
    AssetInfo, Assets, AssetsOption, CACHE_CONTROL, Catalog, INDEX, IndexMetadata, IndexRenderer,
    IndexTemplate, ResponseHook, render_index, with_cache_control, with_index_metadata,
    with_index_renderer, with_index_template, with_prefix, with_response_hook,
};
pub use crate::error::Error;
pub use crate::request::Request;
pub use crate::response::{HttpBody, HttpResponse, Response, SetIntoHeaders};
pub use tokio_util::sync::CancellationToken;
