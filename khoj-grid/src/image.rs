//! Image path normalization.
//!
//! The map feed reports where an image was stored (`uploads/pos_1_0_ab12.jpg`).
//! Renderers need the reference the image server understands
//! (`pos_1_0_ab12.jpg`), which they resolve against their own base URL.

/// Storage root used by the exploration server.
pub const DEFAULT_STORAGE_ROOT: &str = "uploads";

/// Strips storage-root segments from image paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePathNormalizer {
    roots: Vec<String>,
}

impl Default for ImagePathNormalizer {
    fn default() -> Self {
        Self::new([DEFAULT_STORAGE_ROOT])
    }
}

impl ImagePathNormalizer {
    /// Create a normalizer for the given storage roots (`"uploads"`, `"data/img"`).
    ///
    /// Leading and trailing slashes on roots are ignored; empty roots are dropped.
    pub fn new<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let roots = roots
            .into_iter()
            .map(|r| r.as_ref().trim_matches('/').to_string())
            .filter(|r| !r.is_empty())
            .collect();
        Self { roots }
    }

    /// Map a storage path to a servable reference.
    ///
    /// Root segments are stripped from the front until none is left, so
    /// `normalize(normalize(p)) == normalize(p)`. Paths without a known root,
    /// and paths that would be left empty, are returned unchanged.
    pub fn normalize(&self, path: &str) -> String {
        let mut rest = path;
        let mut stripped = false;

        while let Some(next) = self.strip_root(rest) {
            rest = next;
            stripped = true;
        }

        if !stripped || rest.is_empty() {
            return path.to_string();
        }
        rest.to_string()
    }

    fn strip_root<'a>(&self, path: &'a str) -> Option<&'a str> {
        let mut trimmed = path;
        loop {
            let next = trimmed.trim_start_matches('/');
            let next = next.strip_prefix("./").unwrap_or(next);
            if next.len() == trimmed.len() {
                break;
            }
            trimmed = next;
        }

        self.roots.iter().find_map(|root| {
            trimmed
                .strip_prefix(root.as_str())
                .and_then(|r| r.strip_prefix('/'))
                .map(|r| r.trim_start_matches('/'))
        })
    }
}

/// Normalize with the default `uploads` root.
pub fn normalize_image_path(path: &str) -> String {
    ImagePathNormalizer::default().normalize(path)
}
