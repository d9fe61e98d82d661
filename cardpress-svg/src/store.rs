//! Template store: lazy, cached loading of SVG templates by name.
//!
//! A template named `minion` lives at `<root>/minion.svg`. The first lookup
//! reads the file; later lookups for the same name return the cached text, so
//! a deck with two hundred minions parses the minion template exactly once.
//!
//! The store is filled during the single-threaded instantiation phase and
//! read-only afterwards.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cardpress_core::TemplateName;

use crate::error::SvgError;

/// File extension every template resource carries.
pub const TEMPLATE_EXT: &str = "svg";

#[derive(Debug)]
pub struct TemplateStore {
    root: PathBuf,
    cache: HashMap<TemplateName, String>,
}

impl TemplateStore {
    /// A store rooted at the directory holding `<name>.svg` files.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        TemplateStore {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    /// `<root>/<name>.svg` — pure, no I/O.
    pub fn template_path(&self, name: &TemplateName) -> PathBuf {
        self.root.join(format!("{}.{}", name.as_str(), TEMPLATE_EXT))
    }

    /// Template text for `name`, reading the file on first use.
    ///
    /// A missing template is [`SvgError::TemplateNotFound`] and fatal: the
    /// deck list promised a layout that does not exist, so there is nothing
    /// sensible to render for any row using it.
    pub fn load(&mut self, name: &TemplateName) -> Result<&str, SvgError> {
        let path = self.template_path(name);
        match self.cache.entry(name.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut().as_str()),
            Entry::Vacant(entry) => {
                if !path.exists() {
                    return Err(SvgError::TemplateNotFound {
                        name: name.clone(),
                        path,
                    });
                }
                log::info!("loading template: {}", path.display());
                let text = read_template(&path)?;
                Ok(entry.insert(text).as_str())
            }
        }
    }

    /// Number of distinct templates loaded so far.
    pub fn loaded(&self) -> usize {
        self.cache.len()
    }
}

fn read_template(path: &Path) -> Result<String, SvgError> {
    std::fs::read_to_string(path).map_err(|e| SvgError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
