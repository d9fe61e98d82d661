//! Deck manifest: the cross-reference artifact for tabletop-simulation use.
//!
//! After all rows are registered, every eligible card (not itself named
//! `Back` or `Halo`, not flagged `Skip`) gets one entry linking its face
//! image to the back and halo images named by its row. Entries appear in
//! registry order and receive a monotonically increasing placement along the
//! X axis, which downstream tools interpret as stacking order.
//!
//! `Back`/`Halo` cells name *identities*: a two-copy card never has an entry
//! under its bare name, so pointing at it resolves to nothing. Missing
//! references become empty URLs, the expected case for decks without shared
//! back art.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cardpress_core::CardId;

use crate::error::BuildError;
use crate::registry::CardRegistry;

/// Manifest file name inside the output directory.
pub const MANIFEST_FILE: &str = "deck.json";

/// Identity a card's back reference falls back to.
pub const DEFAULT_BACK: &str = "Back";
/// Identity a card's halo reference falls back to.
pub const DEFAULT_HALO: &str = "Halo";

/// Horizontal spacing between consecutive cards.
const PLACEMENT_STEP: f64 = 2.0;

// ---------------------------------------------------------------------------
// 1. Manifest schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DeckManifest {
    pub save_name: String,
    pub date: DateTime<Utc>,
    pub object_states: Vec<CardObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CardObject {
    /// Object kind tag; always `CardCustom`.
    pub name: String,
    /// Card identity.
    pub nickname: String,
    pub transform: Transform,
    #[serde(rename = "FaceURL")]
    pub face_url: String,
    /// Empty when the back reference resolved to nothing.
    #[serde(rename = "BackURL")]
    pub back_url: String,
    /// Empty when the halo reference resolved to nothing.
    #[serde(rename = "HaloURL")]
    pub halo_url: String,
    pub face_up: bool,
    /// Extensibility hooks, empty for now.
    pub lua_script: String,
    #[serde(rename = "XmlUI")]
    pub xml_ui: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    #[serde(rename = "posX")]
    pub pos_x: f64,
    #[serde(rename = "posY")]
    pub pos_y: f64,
    #[serde(rename = "posZ")]
    pub pos_z: f64,
    #[serde(rename = "rotX")]
    pub rot_x: f64,
    #[serde(rename = "rotY")]
    pub rot_y: f64,
    #[serde(rename = "rotZ")]
    pub rot_z: f64,
    #[serde(rename = "scaleX")]
    pub scale_x: f64,
    #[serde(rename = "scaleY")]
    pub scale_y: f64,
    #[serde(rename = "scaleZ")]
    pub scale_z: f64,
}

impl Transform {
    /// Default orientation: flat on the table, face up, unit scale, placed
    /// `index` steps along X.
    fn at(index: usize) -> Transform {
        Transform {
            pos_x: index as f64 * PLACEMENT_STEP,
            pos_y: 1.0,
            pos_z: 0.0,
            rot_x: 0.0,
            rot_y: 180.0,
            rot_z: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            scale_z: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Cross-reference resolution
// ---------------------------------------------------------------------------

/// Build the manifest from a fully populated registry.
pub fn resolve_manifest(
    registry: &CardRegistry,
    save_name: &str,
    date: DateTime<Utc>,
) -> DeckManifest {
    let mut object_states = Vec::new();

    for card in registry.iter() {
        if card.name.as_str() == DEFAULT_BACK || card.name.as_str() == DEFAULT_HALO {
            continue;
        }
        if card.row.skip() {
            continue;
        }

        let back_url = resolve_image(registry, card.row.back().unwrap_or(DEFAULT_BACK));
        let halo_url = resolve_image(registry, card.row.halo().unwrap_or(DEFAULT_HALO));

        object_states.push(CardObject {
            name: "CardCustom".to_string(),
            nickname: card.id.as_str().to_string(),
            transform: Transform::at(object_states.len()),
            face_url: file_url(&card.png_path()),
            back_url,
            halo_url,
            face_up: true,
            lua_script: String::new(),
            xml_ui: String::new(),
        });
    }

    DeckManifest {
        save_name: save_name.to_string(),
        date,
        object_states,
    }
}

/// Rendered-image URL for the instance with identity `id`, or empty.
fn resolve_image(registry: &CardRegistry, id: &str) -> String {
    registry
        .get(&CardId::from(id))
        .map(|card| file_url(&card.png_path()))
        .unwrap_or_default()
}

/// `file:///` URL for a local path, with forward slashes throughout.
pub fn file_url(path: &Path) -> String {
    let slashed = path.to_string_lossy().replace('\\', "/");
    format!("file:///{}", slashed.trim_start_matches('/'))
}

/// Serialize a manifest the way it is written to disk.
pub fn manifest_json(manifest: &DeckManifest) -> Result<String, BuildError> {
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    Ok(json)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
