use std::collections::{BTreeMap, HashMap};

use minijinja::Value;

use crate::fs::path;

/// Name of the entry document inside the bundle.
pub const INDEX: &str = "index.html";

/// One servable file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetInfo {
    /// Path relative to the root of the served tree.
    pub path: String,
    /// Free-form values attached to the asset, e.g. by
    /// [`with_cache_control`](crate::with_cache_control).
    pub metadata: BTreeMap<String, String>,
}

impl AssetInfo {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            metadata: BTreeMap::new(),
        }
    }
}

/// Metadata of the entry document, as markup the index template will not escape.
pub type IndexMetadata = BTreeMap<String, Value>;

/// Maps absolute URL paths to the assets served for them.
///
/// The entry document is never a key: any path that misses the catalog gets
/// it through the fallback. Its record is kept on the side so renderers can
/// still read its metadata.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: HashMap<String, AssetInfo>,
    index: Option<AssetInfo>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the file at `rel` (relative to the served tree) under `url_prefix`.
    ///
    /// The entry document goes to the index slot instead of the lookup table.
    pub(crate) fn record(&mut self, url_prefix: &str, rel: &str) {
        if rel == INDEX {
            self.index = Some(AssetInfo::new(rel));
            return;
        }
        let key = path::join_url(&["/", url_prefix, rel]);
        self.entries.insert(key, AssetInfo::new(rel));
    }

    #[inline]
    pub fn get(&self, url_path: &str) -> Option<&AssetInfo> {
        self.entries.get(url_path)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetInfo)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut AssetInfo> {
        self.entries.values_mut()
    }

    pub fn index(&self) -> Option<&AssetInfo> {
        self.index.as_ref()
    }

    pub(crate) fn index_mut(&mut self) -> &mut AssetInfo {
        self.index.get_or_insert_with(|| AssetInfo::new(INDEX))
    }

    /// The entry document's metadata wrapped as safe markup, empty when it has none.
    pub fn index_metadata(&self) -> IndexMetadata {
        self.index
            .iter()
            .flat_map(|info| info.metadata.iter())
            .map(|(k, v)| (k.clone(), Value::from_safe_string(v.clone())))
            .collect()
    }
}
