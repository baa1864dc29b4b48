use std::sync::Arc;

use http::{HeaderValue, header};
use memchr::memmem::Finder;

use super::{AssetInfo, Assets, Catalog, IndexMetadata, IndexTemplate, INDEX};
use crate::{error::Error, fs::walk_dir, request::Request, response::Response};

/// Metadata key [`with_cache_control`] stores its header value under.
pub const CACHE_CONTROL: &str = "cache-control";

/// A construction step run on the freshly loaded bundle.
///
/// Options run in the order they are passed to [`Assets::new`], after every
/// file has been copied and catalogued. The first one to fail aborts
/// construction.
pub struct AssetsOption(Box<dyn FnOnce(&mut Assets) -> Result<(), Error> + Send>);

impl AssetsOption {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut Assets) -> Result<(), Error> + Send + 'static,
    {
        Self(Box::new(f))
    }

    pub(crate) fn apply(self, assets: &mut Assets) -> Result<(), Error> {
        (self.0)(assets)
    }
}

/// Replaces `placeholder` with `deployment_path` in every file and re-keys the
/// catalog under `/<deployment_path>/`.
///
/// With an empty `deployment_path` the placeholder is removed together with
/// the `/` that follows it, so `/%DEPLOYMENT_PATH%/app.js` becomes `/app.js`
/// rather than `//app.js`. Matching is plain byte substitution and works on
/// any file type.
///
/// The catalog is rebuilt from scratch, so metadata set by earlier options is
/// dropped. Applying this twice templates already templated content.
pub fn with_prefix(
    placeholder: impl Into<String>,
    deployment_path: impl Into<String>,
) -> AssetsOption {
    let prefix = deployment_path.into();
    let mut pattern = placeholder.into();
    let empty_placeholder = pattern.is_empty();
    if prefix.is_empty() {
        pattern.push('/');
    }

    AssetsOption::new(move |a| {
        if empty_placeholder {
            return Err(Error::EmptyPlaceholder);
        }

        let mut files = Vec::new();
        walk_dir(&*a.files, ".", |entry, d| {
            if !d.is_dir {
                files.push(entry.to_string());
            }
            Ok(())
        });

        let finder = Finder::new(pattern.as_bytes());
        let mut statics = Catalog::new();
        for entry in files {
            let data = match a.files.read_file(&entry) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!("prefix: skipping {entry}: {e}");
                    continue;
                }
            };
            let content = replace_all(&data, &finder, prefix.as_bytes());
            if let Err(e) = a.files.write_file(&entry, &content) {
                tracing::warn!("prefix: skipping {entry}: {e}");
                continue;
            }
            statics.record(&prefix, &entry);
        }

        tracing::debug!(
            "templated {} assets under /{}",
            statics.len(),
            prefix.trim_matches('/')
        );
        a.statics = statics;
        Ok(())
    })
}

/// Runs `hook` on every catalog hit before the asset is served, after the
/// hooks registered before it.
pub fn with_response_hook<F>(hook: F) -> AssetsOption
where
    F: Fn(&AssetInfo, &Request, &mut Response) + Send + Sync + 'static,
{
    AssetsOption::new(move |a| {
        a.hooks.push(Arc::new(hook));
        Ok(())
    })
}

/// Compiles the entry document, as it stands at this point, into the index template.
pub fn with_index_template() -> AssetsOption {
    AssetsOption::new(|a| {
        let data = a.files.read_file(INDEX)?;
        let source = std::str::from_utf8(&data)?;
        a.index = Some(IndexTemplate::from_source(source)?);
        Ok(())
    })
}

/// Renders the fallback response instead of serving the entry document.
///
/// Only takes effect together with [`with_index_template`].
pub fn with_index_renderer<F>(renderer: F) -> AssetsOption
where
    F: Fn(&IndexTemplate, IndexMetadata, &Request, &mut Response) + Send + Sync + 'static,
{
    AssetsOption::new(move |a| {
        a.index_renderer = Some(Arc::new(renderer));
        Ok(())
    })
}

/// Attaches a markup snippet to the entry document, handed to the renderer
/// under `key`.
pub fn with_index_metadata(key: impl Into<String>, markup: impl Into<String>) -> AssetsOption {
    let key = key.into();
    let markup = markup.into();
    AssetsOption::new(move |a| {
        a.statics.index_mut().metadata.insert(key, markup);
        Ok(())
    })
}

/// Sends `Cache-Control: <value>` with every catalogued asset.
///
/// The value is stored in each entry's metadata, so pass this after
/// [`with_prefix`].
pub fn with_cache_control(value: impl Into<String>) -> AssetsOption {
    let value = value.into();
    AssetsOption::new(move |a| {
        HeaderValue::from_str(&value)?;
        for info in a.statics.iter_mut() {
            info.metadata.insert(CACHE_CONTROL.to_string(), value.clone());
        }
        a.hooks.push(Arc::new(
            |entry: &AssetInfo, _req: &Request, res: &mut Response| {
                let Some(value) = entry.metadata.get(CACHE_CONTROL) else {
                    return;
                };
                match HeaderValue::from_str(value) {
                    Ok(value) => {
                        res.headers_mut().insert(header::CACHE_CONTROL, value);
                    }
                    Err(e) => tracing::warn!("bad cache-control for {}: {e}", entry.path),
                }
            },
        ));
        Ok(())
    })
}

fn replace_all(haystack: &[u8], finder: &Finder<'_>, to: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(haystack.len());
    let mut last = 0;
    for i in finder.find_iter(haystack) {
        out.extend_from_slice(&haystack[last..i]);
        out.extend_from_slice(to);
        last = i + finder.needle().len();
    }
    out.extend_from_slice(&haystack[last..]);
    out
}
