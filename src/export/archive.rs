//! Asset ZIP: the effective logo plus every icon as loose PNG files,
//! ready to hand to a web developer.

use std::io::{Cursor, Write as _};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::AppError;
use crate::export::merge::merge_selection;
use crate::export::read_image_bytes;
use crate::models::BrandBranding;
use crate::storage::ProjectStore;

/// Build the asset archive. Slots that cannot be materialized (inline SVG,
/// missing files) are skipped so the ZIP always contains what exists.
pub fn build_contents_zip(
    store: &ProjectStore,
    project_id: &str,
    branding: &BrandBranding,
) -> Result<Vec<u8>, AppError> {
    let kit = merge_selection(branding);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    if let Some(bytes) = read_image_bytes(store, project_id, &kit.logo) {
        add_entry(&mut writer, "Logotipo_Principal.png", &bytes, options)?;
    }

    for icon in &branding.icons {
        if let Some(bytes) = read_image_bytes(store, project_id, &icon.svg) {
            let name = format!("Iconos/{}.png", icon.name.replace(char::is_whitespace, "_"));
            add_entry(&mut writer, &name, &bytes, options)?;
        }
    }

    let cursor = writer
        .finish()
        .map_err(|e| AppError::Export(format!("ZIP serialization failed: {e}")))?;
    Ok(cursor.into_inner())
}

fn add_entry(
    writer: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    bytes: &[u8],
    options: SimpleFileOptions,
) -> Result<(), AppError> {
    writer
        .start_file(name, options)
        .map_err(|e| AppError::Export(format!("ZIP entry {name} failed: {e}")))?;
    writer.write_all(bytes)?;
    Ok(())
}
