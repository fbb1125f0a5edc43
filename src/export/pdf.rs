//! Brand-guide PDF rendering.
//!
//! Produces an A4 guide with a cover band in the primary color, the logo,
//! the named palette, typography specimens and the icon grid. Raster assets
//! are embedded; inline SVG markup has no rasterizer here, so those slots
//! render as outlined placeholders.

use chrono::Utc;
use printpdf::image_crate::load_from_memory;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};

use crate::error::AppError;
use crate::export::merge::{merge_selection, MergedKit};
use crate::export::read_image_bytes;
use crate::models::{BrandBranding, BrandIcon};
use crate::storage::ProjectStore;

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;

// At the embedding dpi, one pixel is 25.4/300 mm.
const EMBED_DPI: f32 = 300.0;

/// Render the brand guide for a project with generated branding.
pub fn render_brand_guide(
    store: &ProjectStore,
    project_id: &str,
    branding: &BrandBranding,
) -> Result<Vec<u8>, AppError> {
    let kit = merge_selection(branding);

    let (doc, page, layer) = printpdf::PdfDocument::new(
        format!("Brand Guide - {}", branding.brand_name),
        Mm(PAGE_W),
        Mm(PAGE_H),
        "Portada",
    );
    let regular = builtin_font(&doc, BuiltinFont::Helvetica)?;
    let bold = builtin_font(&doc, BuiltinFont::HelveticaBold)?;

    let cover = doc.get_page(page).get_layer(layer);
    render_cover(&cover, branding, &kit, &bold, &regular);
    render_logo_section(&cover, store, project_id, &kit, &bold, &regular);

    let (page2, layer2) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Paleta y Tipografía");
    let palette = doc.get_page(page2).get_layer(layer2);
    let cursor = render_palette_section(&palette, &kit, &bold, &regular);
    render_typography_section(&palette, &kit, &bold, &regular, cursor);

    let (page3, layer3) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Iconografía");
    let icons = doc.get_page(page3).get_layer(layer3);
    render_icon_section(&icons, store, project_id, &branding.icons, &bold, &regular);

    doc.save_to_bytes()
        .map_err(|e| AppError::Export(format!("PDF serialization failed: {e}")))
}

fn builtin_font(
    doc: &PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, AppError> {
    doc.add_builtin_font(font)
        .map_err(|e| AppError::Export(format!("PDF font setup failed: {e}")))
}

// ----------------------------------------------------------------------
// Sections
// ----------------------------------------------------------------------

fn render_cover(
    layer: &PdfLayerReference,
    branding: &BrandBranding,
    kit: &MergedKit,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
) {
    let primary = kit
        .colors
        .first()
        .map(|c| c.hex.as_str())
        .unwrap_or("#6366f1");

    // Color band across the top third of the page
    layer.set_fill_color(hex_color(primary));
    layer.add_rect(
        Rect::new(Mm(0.0), Mm(PAGE_H - 106.0), Mm(PAGE_W), Mm(PAGE_H)).with_mode(PaintMode::Fill),
    );

    layer.set_fill_color(Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None)));
    layer.use_text(&branding.brand_name, 40.0, Mm(MARGIN), Mm(PAGE_H - 50.0), bold);
    layer.use_text(&branding.tagline, 18.0, Mm(MARGIN), Mm(PAGE_H - 68.0), regular);
    layer.use_text(
        format!(
            "Guía de Identidad Visual • {}",
            Utc::now().format("%d/%m/%Y")
        ),
        10.0,
        Mm(MARGIN),
        Mm(PAGE_H - 98.0),
        regular,
    );
}

fn render_logo_section(
    layer: &PdfLayerReference,
    store: &ProjectStore,
    project_id: &str,
    kit: &MergedKit,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
) {
    section_heading(layer, "1. Logotipo Principal", Mm(170.0), bold);

    match read_image_bytes(store, project_id, &kit.logo) {
        Some(bytes) if embed_image(layer, &bytes, Mm(MARGIN), Mm(85.0), 70.0) => {}
        _ => {
            layer.set_fill_color(gray(0.6));
            layer.use_text(
                "[Imagen del logotipo no disponible]",
                10.0,
                Mm(MARGIN),
                Mm(150.0),
                regular,
            );
        }
    }
}

/// Returns the y coordinate below the last swatch, for the next section.
fn render_palette_section(
    layer: &PdfLayerReference,
    kit: &MergedKit,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
) -> f32 {
    section_heading(layer, "2. Paleta de Colores", Mm(PAGE_H - 22.0), bold);

    let mut y = PAGE_H - 40.0;
    for color in &kit.colors {
        layer.set_fill_color(hex_color(&color.hex));
        layer.add_rect(
            Rect::new(Mm(MARGIN), Mm(y - 14.0), Mm(MARGIN + 14.0), Mm(y)).with_mode(PaintMode::Fill),
        );

        let text_x = Mm(MARGIN + 20.0);
        layer.set_fill_color(gray(0.0));
        layer.use_text(&color.name, 12.0, text_x, Mm(y - 5.0), bold);
        layer.set_fill_color(gray(0.4));
        layer.use_text(
            format!("HEX: {}", color.hex.to_uppercase()),
            10.0,
            text_x,
            Mm(y - 10.0),
            regular,
        );
        layer.use_text(&color.usage, 9.0, text_x, Mm(y - 14.0), regular);

        y -= 20.0;
    }
    y
}

fn render_typography_section(
    layer: &PdfLayerReference,
    kit: &MergedKit,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
    start_y: f32,
) {
    let top = start_y - 10.0;
    section_heading(layer, "3. Tipografía", Mm(top), bold);

    let heading = &kit.typography.heading;
    let body = &kit.typography.body;

    layer.set_fill_color(gray(0.0));
    layer.use_text(
        format!("Títulos: {}", heading.name),
        14.0,
        Mm(MARGIN),
        Mm(top - 14.0),
        bold,
    );
    layer.set_fill_color(gray(0.4));
    layer.use_text(
        format!("Uso: {}", heading.usage),
        10.0,
        Mm(MARGIN),
        Mm(top - 20.0),
        regular,
    );
    layer.set_fill_color(gray(0.0));
    layer.use_text(
        "ABCDEFGHIJKLMNÑOPQRSTUVWXYZ",
        22.0,
        Mm(MARGIN),
        Mm(top - 30.0),
        bold,
    );

    layer.use_text(
        format!("Cuerpo: {}", body.name),
        14.0,
        Mm(MARGIN),
        Mm(top - 45.0),
        bold,
    );
    layer.set_fill_color(gray(0.4));
    layer.use_text(
        format!("Uso: {}", body.usage),
        10.0,
        Mm(MARGIN),
        Mm(top - 51.0),
        regular,
    );
    layer.set_fill_color(gray(0.2));
    layer.use_text(
        "El veloz murciélago hindú comía feliz cardillo y kiwi.",
        12.0,
        Mm(MARGIN),
        Mm(top - 60.0),
        regular,
    );
    layer.use_text(
        "La cigüeña tocaba el saxofón detrás del palenque de paja.",
        12.0,
        Mm(MARGIN),
        Mm(top - 66.0),
        regular,
    );
}

fn render_icon_section(
    layer: &PdfLayerReference,
    store: &ProjectStore,
    project_id: &str,
    icons: &[BrandIcon],
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
) {
    section_heading(layer, "4. Iconografía y Elementos", Mm(PAGE_H - 22.0), bold);

    const CELL: f32 = 28.0;
    const GAP: f32 = 10.0;
    const PER_ROW: usize = 4;

    for (i, icon) in icons.iter().enumerate() {
        let col = (i % PER_ROW) as f32;
        let row = (i / PER_ROW) as f32;
        let x = MARGIN + col * (CELL + GAP);
        let y = PAGE_H - 40.0 - CELL - row * (CELL + 14.0);

        let embedded = read_image_bytes(store, project_id, &icon.svg)
            .map(|bytes| embed_image(layer, &bytes, Mm(x), Mm(y), CELL))
            .unwrap_or(false);
        if !embedded {
            // Inline SVG or missing asset: outlined placeholder cell
            layer.set_outline_color(gray(0.8));
            layer.set_outline_thickness(0.5);
            layer.add_rect(
                Rect::new(Mm(x), Mm(y), Mm(x + CELL), Mm(y + CELL)).with_mode(PaintMode::Stroke),
            );
        }

        layer.set_fill_color(gray(0.4));
        layer.use_text(&icon.name, 8.0, Mm(x), Mm(y - 5.0), regular);
    }
}

// ----------------------------------------------------------------------
// Drawing helpers
// ----------------------------------------------------------------------

fn section_heading(layer: &PdfLayerReference, title: &str, y: Mm, bold: &IndirectFontRef) {
    layer.set_fill_color(gray(0.0));
    layer.use_text(title, 20.0, Mm(MARGIN), y, bold);

    layer.set_outline_color(gray(0.93));
    layer.set_outline_thickness(0.8);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(y.0 - 3.0)), false),
            (Point::new(Mm(PAGE_W - MARGIN), Mm(y.0 - 3.0)), false),
        ],
        is_closed: false,
    });
}

/// Decode and place a raster image scaled to fit a square box. Returns
/// false when the bytes are not a decodable image.
fn embed_image(layer: &PdfLayerReference, bytes: &[u8], x: Mm, y: Mm, box_mm: f32) -> bool {
    let dynamic = match load_from_memory(bytes) {
        Ok(img) => img,
        Err(e) => {
            tracing::warn!("Could not decode export image: {e}");
            return false;
        }
    };

    let natural_w = dynamic.width() as f32 * 25.4 / EMBED_DPI;
    let natural_h = dynamic.height() as f32 * 25.4 / EMBED_DPI;
    if natural_w <= 0.0 || natural_h <= 0.0 {
        return false;
    }
    let scale = (box_mm / natural_w).min(box_mm / natural_h);

    Image::from_dynamic_image(&dynamic).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(x),
            translate_y: Some(y),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(EMBED_DPI),
            ..Default::default()
        },
    );
    true
}

fn hex_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    let parse = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0)
    };
    Color::Rgb(Rgb::new(
        parse(0..2) as f32 / 255.0,
        parse(2..4) as f32 / 255.0,
        parse(4..6) as f32 / 255.0,
        None,
    ))
}

fn gray(level: f32) -> Color {
    Color::Rgb(Rgb::new(level, level, level, None))
}
