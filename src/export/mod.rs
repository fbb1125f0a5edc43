//! Export surfaces: the brand-guide PDF and the asset ZIP.

pub mod archive;
pub mod merge;
pub mod pdf;

use base64::Engine as _;

use crate::storage::ProjectStore;

/// Raw bytes behind a branding image reference. Handles both embedded
/// base64 data URLs and serving URLs pointing into the store. Inline SVG
/// markup yields `None` since the exporters cannot rasterize it.
pub(crate) fn read_image_bytes(
    store: &ProjectStore,
    project_id: &str,
    source: &str,
) -> Option<Vec<u8>> {
    if let Some(encoded) = source.strip_prefix("data:image").and_then(|rest| {
        // data:image/png;base64,xxxx
        rest.split_once(',').map(|(_, data)| data)
    }) {
        return base64::engine::general_purpose::STANDARD.decode(encoded).ok();
    }
    let path = store.resolve_image(project_id, source)?;
    std::fs::read(path).ok()
}

/// `Branding_Mi_Marca.pdf` style attachment names.
pub fn attachment_name(prefix: &str, brand_name: &str, extension: &str) -> String {
    let safe: String = brand_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{prefix}_{safe}.{extension}")
}
