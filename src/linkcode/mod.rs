//! Links from documented Python objects to their source lines on GitHub.

pub mod outline;

use crate::config::GithubConfig;
use crate::error::{Error, Result};
pub use outline::{NodeKind, Outline, OutlineNode};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// Parsed outlines kept per linker.
pub const OUTLINE_CACHE_CAPACITY: usize = 5;

/// Small most-recently-used cache of module outlines, keyed by path.
#[derive(Debug)]
pub struct OutlineCache {
    entries: VecDeque<(PathBuf, Outline)>,
    capacity: usize,
}

impl Default for OutlineCache {
    fn default() -> Self {
        Self::with_capacity(OUTLINE_CACHE_CAPACITY)
    }
}

impl OutlineCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Outline for `path`, reading and parsing it on a miss.
    pub fn load(&mut self, path: &Path) -> Result<&Outline> {
        if let Some(idx) = self.entries.iter().position(|(p, _)| p == path) {
            if let Some(entry) = self.entries.remove(idx) {
                self.entries.push_front(entry);
            }
        } else {
            let source = fs::read_to_string(path).map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "parsed module outline");
            self.entries.truncate(self.capacity - 1);
            self.entries
                .push_front((path.to_path_buf(), Outline::parse(&source)));
        }
        Ok(&self.entries[0].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Resolves `(domain, module, fullname)` triples to GitHub blob URLs.
#[derive(Debug)]
pub struct GithubLinker {
    config: GithubConfig,
    root: PathBuf,
    cache: OutlineCache,
}

impl GithubLinker {
    /// `root` is the directory containing the top-level packages.
    pub fn new(config: GithubConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
            cache: OutlineCache::default(),
        }
    }

    /// URL of the line defining `fullname` in `module`, if it can be found.
    pub fn resolve(&mut self, domain: &str, module: &str, fullname: &str) -> Option<String> {
        if domain != "py" || module.is_empty() || !self.is_allowed(module) {
            return None;
        }

        let (path, relpath) = module_file(&self.root, module)?;
        let outline = match self.cache.load(&path) {
            Ok(outline) => outline,
            Err(err) => {
                tracing::warn!(module, "{err}");
                return None;
            }
        };

        let segments: Vec<&str> = fullname.split('.').collect();
        let Some(node) = outline.find(&segments) else {
            tracing::debug!(module, fullname, "no definition found");
            return None;
        };

        let GithubConfig {
            org,
            repo,
            branch,
            source_prefix,
            ..
        } = &self.config;
        Some(format!(
            "https://github.com/{org}/{repo}/blob/{branch}/{source_prefix}{relpath}#L{}",
            node.line
        ))
    }

    /// Forget parsed outlines, e.g. after sources change on disk.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn is_allowed(&self, module: &str) -> bool {
        let allowed = &self.config.allowed_modules;
        let top = module.split('.').next().unwrap_or(module);
        allowed.is_empty() || allowed.iter().any(|m| m == top)
    }
}

/// `(filesystem path, URL path)` of a module's source file under `root`.
pub fn module_file(root: &Path, module: &str) -> Option<(PathBuf, String)> {
    let base = module.replace('.', "/");
    [format!("{base}.py"), format!("{base}/__init__.py")]
        .into_iter()
        .map(|rel| (root.join(&rel), rel))
        .find(|(path, _)| path.is_file())
}
