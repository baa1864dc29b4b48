use std::sync::Arc;

use minijinja::Environment;
use serde::Serialize;

use super::catalog::{INDEX, IndexMetadata};
use crate::{error::Error, request::Request, response::Response};

/// The entry document compiled as a minijinja template.
///
/// Autoescaping follows the `.html` name, values from [`IndexMetadata`] are
/// already marked safe and go in verbatim.
#[derive(Clone, Debug)]
pub struct IndexTemplate {
    env: Environment<'static>,
}

impl IndexTemplate {
    pub fn from_source(source: impl Into<String>) -> Result<Self, Error> {
        let mut env = Environment::new();
        env.add_template_owned(INDEX, source.into())?;
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, ctx: S) -> Result<String, Error> {
        Ok(self.env.get_template(INDEX)?.render(ctx)?)
    }

    /// Renders with `meta` as context into `res` as `200 OK` HTML.
    ///
    /// A failing render is logged and answered with `500`.
    pub fn render_to(&self, meta: &IndexMetadata, res: &mut Response) {
        match self.render(meta) {
            Ok(html) => {
                res.html(html);
            }
            Err(e) => {
                tracing::warn!("failed to render {INDEX}: {e}");
                res.send_status(http::StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }
}

/// Writes the fallback response for paths that miss the catalog.
pub type IndexRenderer =
    Arc<dyn Fn(&IndexTemplate, IndexMetadata, &Request, &mut Response) + Send + Sync>;

/// Runs before a catalog hit is handed to the file server.
pub type ResponseHook = Arc<dyn Fn(&super::AssetInfo, &Request, &mut Response) + Send + Sync>;

/// Renderer that fills the index template with the entry document's metadata.
///
/// Pass it to [`with_index_renderer`](crate::with_index_renderer) when the
/// template needs nothing beyond the metadata.
pub fn render_index(template: &IndexTemplate, meta: IndexMetadata, _req: &Request, res: &mut Response) {
    template.render_to(&meta, res);
}
