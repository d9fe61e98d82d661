//! Cardpress SVG engine — template store, variable binding, layer toggling.
//!
//! The pipeline for one card is: load the template text ([`store`]), bind
//! row values into it ([`binder`]), then force layer visibility per the
//! row's directive ([`layers`]). Binding and toggling are pure string→string
//! functions; the same inputs always produce byte-identical output.
//!
//! Public API surface:
//! - [`store`] — [`TemplateStore`]
//! - [`binder`] — [`BindingContext`], [`bind_document`]
//! - [`layers`] — [`LayerDirective`], [`toggle_layers`]
//! - [`error`] — [`SvgError`]

pub mod binder;
pub mod error;
pub mod layers;
mod splice;
pub mod store;

pub use binder::{bind_document, bind_elements, escape_value, format_text, BindingContext};
pub use error::SvgError;
pub use layers::{toggle_layers, LayerDirective, ToggleOutcome};
pub use store::{TemplateStore, TEMPLATE_EXT};
