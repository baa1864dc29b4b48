//! The asset engine: builds a catalog of a bundle once, then resolves every
//! request to a catalogued asset or to the entry document.

use std::fmt;

use crate::{
    error::Error,
    file_server,
    fs::{self, ReadFs, ReadOnly, Sub, WriteFs, path, walk_dir},
    request::Request,
    response::{HttpResponse, Response},
};

mod catalog;
mod index;
mod options;

pub use catalog::{AssetInfo, Catalog, INDEX, IndexMetadata};
pub use index::{IndexRenderer, IndexTemplate, ResponseHook, render_index};
pub use options::{
    AssetsOption, CACHE_CONTROL, with_cache_control, with_index_metadata, with_index_renderer,
    with_index_template, with_prefix, with_response_hook,
};

/// A bundle ready to be served.
///
/// Build it with [`Assets::new`] before serving starts; afterwards it is only
/// read, so a single instance can be shared across connections.
pub struct Assets {
    pub(crate) files: Box<dyn WriteFs>,
    pub(crate) statics: Catalog,
    pub(crate) hooks: Vec<ResponseHook>,
    pub(crate) index: Option<IndexTemplate>,
    pub(crate) index_renderer: Option<IndexRenderer>,
}

impl Assets {
    /// Loads the bundle under `source_prefix` in `source`.
    ///
    /// Without options and without a backend the source is served as is and
    /// nothing is copied. Otherwise every file is copied into `assets`
    /// (a [`MemMapFs`](crate::fs::MemMapFs) when `None`), catalogued, and the
    /// options are applied in order. Files that fail to copy are logged and
    /// left out; an invalid prefix or a failing option aborts construction.
    pub fn new<S>(
        source: S,
        source_prefix: &str,
        assets: Option<Box<dyn WriteFs>>,
        opts: Vec<AssetsOption>,
    ) -> Result<Self, Error>
    where
        S: ReadFs + 'static,
    {
        let subtree = Sub::new(source, source_prefix)
            .map_err(|_| Error::InvalidPrefix(source_prefix.to_string()))?;

        if opts.is_empty() && assets.is_none() {
            tracing::debug!("serving {source_prefix} without copying");
            return Ok(Self::with_files(Box::new(ReadOnly::new(subtree))));
        }

        let mut a = Self::with_files(assets.unwrap_or_else(fs::new_in_mem_map));

        walk_dir(&subtree, ".", |entry, d| {
            if d.is_dir {
                if entry != "." {
                    a.files.mkdir_all(entry)?;
                }
                return Ok(());
            }
            let data = subtree.read_file(entry)?;
            a.files.write_file(entry, &data)?;
            a.statics.record("", entry);
            Ok(())
        });

        tracing::debug!("loaded {} assets from {source_prefix}", a.statics.len());

        for opt in opts {
            opt.apply(&mut a)?;
        }

        Ok(a)
    }

    fn with_files(files: Box<dyn WriteFs>) -> Self {
        Self {
            files,
            statics: Catalog::new(),
            hooks: Vec::new(),
            index: None,
            index_renderer: None,
        }
    }

    /// The tree responses are served from.
    pub fn files(&self) -> &dyn WriteFs {
        &*self.files
    }

    pub fn statics(&self) -> &Catalog {
        &self.statics
    }

    pub fn index_template(&self) -> Option<&IndexTemplate> {
        self.index.as_ref()
    }

    /// Resolves `req` and writes the response into `res`.
    ///
    /// A catalog hit runs the response hooks and serves the asset. Anything
    /// else is a client side route and gets the entry document, rendered when
    /// an index template and a renderer are configured. Unmatched paths never
    /// produce a `404`.
    pub fn serve(&self, req: &mut Request, res: &mut Response) {
        if !self.statics.is_empty() {
            match self.statics.get(req.path()) {
                Some(entry) => {
                    for hook in &self.hooks {
                        hook(entry, req, res);
                    }
                    req.set_path(path::join_url(&["/", &entry.path]));
                }
                None => {
                    if let (Some(index), Some(renderer)) = (&self.index, &self.index_renderer) {
                        renderer(index, self.statics.index_metadata(), req, res);
                        return;
                    }
                    req.set_path("/");
                }
            }
        } else if !self.servable(req.path()) {
            req.set_path("/");
        }

        file_server::serve_file(&*self.files, req, res);
    }

    // A file, or a directory the file server can answer with its index.
    fn servable(&self, url_path: &str) -> bool {
        match self.files.stat(url_path) {
            Ok(meta) if meta.is_dir => {
                let index = path::join_rel(&path::clean(url_path), INDEX);
                self.files.stat(&index).is_ok_and(|m| m.is_file())
            }
            Ok(_) => true,
            Err(_) => false,
        }
    }

    /// [`serve`](Self::serve) for a plain `http` request.
    pub fn handle<B>(&self, request: http::Request<B>) -> HttpResponse {
        let mut req = Request::new(request);
        let mut res = Response::new();
        self.serve(&mut req, &mut res);
        res.into_inner()
    }
}

impl fmt::Debug for Assets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assets")
            .field("files", &self.files)
            .field("statics", &self.statics.len())
            .field("hooks", &self.hooks.len())
            .field("index", &self.index.is_some())
            .field("index_renderer", &self.index_renderer.is_some())
            .finish()
    }
}
