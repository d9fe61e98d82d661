//! Error types for template loading, binding and layer toggling.
//!
//! Everything here is fatal to the run: a template that cannot be found, a
//! placeholder that cannot be resolved or a malformed layer directive all
//! point at broken input files, and continuing would only smear the damage
//! across more cards.

use std::path::PathBuf;

use cardpress_core::TemplateName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SvgError {
    /// The deck list references a template with no file behind it.
    #[error("no template '{name}' found at path: {path}")]
    TemplateNotFound { name: TemplateName, path: PathBuf },

    /// A template file exists but could not be read.
    #[error("failed to read template {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template is not parseable XML.
    #[error("malformed template markup: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A `{...}` token names a column the row does not have.
    #[error("template references unknown variable '{name}'")]
    UnboundVariable { name: String },

    /// A lone `{` or `}` outside any placeholder. Literal braces must be
    /// doubled (`{{` / `}}`).
    #[error("unbalanced brace in template near '{snippet}'")]
    UnbalancedBrace { snippet: String },

    /// A layer-directive entry with a prefix other than `+` or `-`.
    #[error("layer directive entry '{entry}' must start with '+' or '-'")]
    BadLayerPrefix { entry: String },
}
