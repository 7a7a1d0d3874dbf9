use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::foundation::error::{MapExportError, MapExportResult};

/// Transport for tile and icon bytes.
///
/// Network access is the host's concern; the exporter only awaits the returned future. Futures
/// are not required to be `Send` because resolution runs on a single cooperative thread.
pub trait ImageFetcher {
    /// Fetch the encoded bytes behind `url`.
    fn fetch<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, MapExportResult<Vec<u8>>>;
}

/// URL-keyed in-memory store. Unknown URLs fail with [`MapExportError::Fetch`].
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes for `url`, replacing any previous entry.
    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(url.into(), bytes);
    }

    /// Builder form of [`MemoryFetcher::insert`].
    pub fn with(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(url, bytes);
        self
    }
}

impl ImageFetcher for MemoryFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, MapExportResult<Vec<u8>>> {
        let out = self
            .entries
            .get(url)
            .cloned()
            .ok_or_else(|| MapExportError::fetch(format!("no entry for '{url}'")));
        futures::future::ready(out).boxed_local()
    }
}

/// Reads `file://` URLs and relative paths from below a root directory.
///
/// Absolute paths (`file:///abs/path`) are accepted only when they lie inside the root; they are
/// read relative to it.
#[derive(Clone, Debug)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Fetcher rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve_path(&self, url: &str) -> MapExportResult<PathBuf> {
        let rel = url.strip_prefix("file://").unwrap_or(url);
        let rel = rel.split(['?', '#']).next().unwrap_or(rel);
        let rel = match Path::new(rel).strip_prefix(&self.root) {
            Ok(inside) if Path::new(rel).is_absolute() => inside.to_str().unwrap_or(rel),
            _ => rel,
        };
        let norm = normalize_rel_path(rel)?;
        Ok(self.root.join(Path::new(&norm)))
    }
}

impl ImageFetcher for FsFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, MapExportResult<Vec<u8>>> {
        async move {
            let path = self.resolve_path(url)?;
            tokio::fs::read(&path).await.map_err(|e| {
                MapExportError::fetch(format!("failed to read '{}': {e}", path.display()))
            })
        }
        .boxed_local()
    }
}

/// Normalize a relative path to forward slashes, rejecting absolute paths and `..` segments.
pub fn normalize_rel_path(rel: &str) -> MapExportResult<String> {
    let rel = rel.replace('\\', "/");
    if rel.starts_with('/') {
        return Err(MapExportError::validation(format!(
            "path '{rel}' must be relative to the fetcher root"
        )));
    }
    let mut parts = Vec::new();
    for part in rel.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                return Err(MapExportError::validation(format!(
                    "path '{rel}' escapes the fetcher root"
                )));
            }
            p => parts.push(p),
        }
    }
    if parts.is_empty() {
        return Err(MapExportError::validation("empty path"));
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/host/fetch.rs"]
mod tests;
