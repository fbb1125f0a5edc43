//! Normalization of model output into the brand-kit data model.
//!
//! The creative-director step asks for strict JSON but the model routinely
//! wraps it in markdown fences, renames fields (often into Spanish), nests
//! the proposals array under arbitrary keys, or returns objects where
//! strings were requested. Everything here is written to coerce rather
//! than reject.

use serde_json::Value;

use crate::error::AppError;
use crate::models::{BrandColor, FontChoice, TypographySet};

pub const DEFAULT_HEX: &str = "#6366f1";
const DEFAULT_HEADING_FONT: &str = "Inter";
const DEFAULT_BODY_FONT: &str = "DM Sans";

/// A creative direction after coercion, ready for proposal assembly.
#[derive(Debug, Clone)]
pub struct NormalizedDirection {
    pub name: Option<String>,
    pub description: Option<String>,
    pub mood: Option<String>,
    pub colors: Option<Vec<BrandColor>>,
    pub typography: Option<TypographySet>,
    pub visual_description: String,
    pub icon_style: String,
}

impl NormalizedDirection {
    pub fn primary_hex(&self) -> &str {
        self.colors
            .as_ref()
            .and_then(|c| c.first())
            .map(|c| c.hex.as_str())
            .unwrap_or(DEFAULT_HEX)
    }

    pub fn palette_hexes(&self) -> Vec<String> {
        self.colors
            .as_ref()
            .map(|colors| colors.iter().map(|c| c.hex.clone()).collect())
            .unwrap_or_default()
    }
}

/// A discovered service to design an icon for.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition {
    pub name: String,
    pub description: String,
}

// ============================================================================
// JSON cleanup
// ============================================================================

/// Strip markdown code fences the model adds despite instructions.
pub fn clean_model_json(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Locate the proposals array wherever the model put it: under
/// `proposals`, as a bare top-level array, or under any other object key.
fn locate_directions(value: &Value) -> Vec<Value> {
    if let Some(arr) = value.get("proposals").and_then(|p| p.as_array()) {
        return arr.clone();
    }
    if let Some(arr) = value.as_array() {
        return arr.clone();
    }
    if let Some(obj) = value.as_object() {
        for v in obj.values() {
            if let Some(arr) = v.as_array() {
                return arr.clone();
            }
        }
    }
    Vec::new()
}

// ============================================================================
// Field helpers
// ============================================================================

/// First present string among alias keys.
fn str_alias(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| v.get(*k))
        .and_then(|f| f.as_str())
        .map(String::from)
}

/// First present value among alias keys, whatever its type.
fn value_alias<'a>(v: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| v.get(*k))
}

/// Like `str_alias`, but coerces non-string values through `safe_str`
/// instead of discarding them. Absent or empty fields stay `None`.
fn flat_alias(v: &Value, keys: &[&str]) -> Option<String> {
    let value = value_alias(v, keys)?;
    let flat = safe_str(Some(value), "");
    (!flat.is_empty()).then_some(flat)
}

/// Flatten any JSON value to a display string. Objects commonly come back
/// as `{nombre, estilo}` or `{texto, valor}` wrappers; pull a plausible
/// string out before giving up and stringifying.
pub fn safe_str(value: Option<&Value>, fallback: &str) -> String {
    let Some(value) = value else {
        return fallback.to_string();
    };
    match value {
        Value::String(s) if !s.trim().is_empty() => s.clone(),
        Value::String(_) | Value::Null => fallback.to_string(),
        Value::Object(obj) => ["nombre", "texto", "name", "text", "valor", "value"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(|v| v.as_str()))
            .map(String::from)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

// ============================================================================
// Direction normalization
// ============================================================================

fn normalize_colors(direction: &Value) -> Option<Vec<BrandColor>> {
    let raw = value_alias(direction, &["colors", "paleta_colores"])?.as_array()?;
    let colors = raw
        .iter()
        .map(|c| match c {
            // A bare hex string instead of an object
            Value::String(hex) => BrandColor {
                name: "Color".into(),
                hex: hex.clone(),
                usage: "Uso general".into(),
            },
            _ => BrandColor {
                name: str_alias(c, &["name", "nombre"]).unwrap_or_else(|| "Color".into()),
                hex: str_alias(c, &["hex", "hexadecimal"]).unwrap_or_else(|| DEFAULT_HEX.into()),
                usage: str_alias(c, &["usage", "uso"]).unwrap_or_else(|| "Uso general".into()),
            },
        })
        .collect();
    Some(colors)
}

fn normalize_typography(direction: &Value) -> Option<TypographySet> {
    let raw = value_alias(direction, &["typography", "tipografias"])?;
    if !raw.is_object() {
        return None;
    }
    let heading = str_alias(raw, &["titulo", "titulos"])
        .unwrap_or_else(|| DEFAULT_HEADING_FONT.to_string());
    let body = str_alias(raw, &["cuerpo"]).unwrap_or_else(|| DEFAULT_BODY_FONT.to_string());
    Some(TypographySet {
        heading: FontChoice::from_family(&heading, "Títulos"),
        body: FontChoice::from_family(&body, "Cuerpo"),
    })
}

fn normalize_direction(direction: &Value) -> NormalizedDirection {
    NormalizedDirection {
        name: flat_alias(direction, &["name", "nombre"]),
        description: flat_alias(direction, &["description", "descripcion", "concepto"]),
        mood: flat_alias(direction, &["mood", "estilo"]),
        colors: normalize_colors(direction),
        typography: normalize_typography(direction),
        visual_description: safe_str(
            value_alias(direction, &["logoDescription", "descripcion_logo", "logo"]),
            "Modern and professional design",
        ),
        icon_style: safe_str(
            value_alias(direction, &["iconStyle", "sistema_iconos"]),
            "Flat design",
        ),
    }
}

/// Parse the creative-director response into at most 5 directions.
/// An unlocatable or empty proposals array is an error; the pipeline
/// decides whether to fall back.
pub fn parse_directions(raw: &str) -> Result<Vec<NormalizedDirection>, AppError> {
    let cleaned = clean_model_json(raw);
    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| AppError::Provider(format!("Creative response is not JSON: {e}")))?;

    let directions = locate_directions(&value);
    if directions.is_empty() {
        return Err(AppError::Provider(
            "No proposals in creative response".into(),
        ));
    }

    Ok(directions.iter().take(5).map(normalize_direction).collect())
}

/// Parse the service-discovery response. Failures yield an empty list;
/// the caller substitutes generic services.
pub fn parse_services(raw: &str) -> Vec<ServiceDefinition> {
    let cleaned = clean_model_json(raw);
    let Ok(value) = serde_json::from_str::<Value>(&cleaned) else {
        return Vec::new();
    };
    let Some(services) = value.get("services").and_then(|s| s.as_array()) else {
        return Vec::new();
    };

    services
        .iter()
        .take(6)
        .map(|s| {
            let name = safe_str(s.get("name"), "Servicio");
            let description = safe_str(s.get("description"), &name);
            ServiceDefinition { name, description }
        })
        .collect()
}
