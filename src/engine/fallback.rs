//! Deterministic fallbacks used when the model misbehaves or the provider
//! is unreachable. Generation never fails outright: the worst case is a
//! stock kit built from these pieces.

use base64::Engine as _;

use crate::models::{
    BrandBranding, BrandColor, BrandIcon, BrandProposal, ProposalTypography, TypographySet,
};

/// Applications attached to every generated proposal.
pub const APPLICATIONS: &[&str] = &[
    "Website",
    "Redes sociales",
    "Tarjetas de presentación",
    "Email firma",
    "Empaque",
];

const TAGLINES: &[&str] = &[
    "Innovación que transforma",
    "Tu socio de confianza",
    "Excelencia en cada detalle",
    "Creatividad sin límites",
    "Diseñado para ti",
    "Calidad garantizada",
    "El futuro de tu marca",
];

const STOCK_ICON_NAMES: &[&str] = &["home", "search", "user", "settings", "heart", "star"];

/// Deterministic tagline keyed off the brand name.
pub fn tagline(brand_name: &str) -> String {
    let sum: u32 = brand_name.chars().map(|c| c as u32).sum();
    TAGLINES[(sum as usize) % TAGLINES.len()].to_string()
}

/// Placeholder logo: the brand initial on a rounded square, as a base64
/// SVG data URL.
pub fn placeholder_logo(brand_name: &str, color: &str) -> String {
    let initial = brand_name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "B".to_string());
    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 200">
    <rect width="200" height="200" rx="40" fill="{color}"/>
    <text x="100" y="140" font-family="Arial" font-size="80" font-weight="bold" fill="white" text-anchor="middle">{initial}</text>
  </svg>"##
    );
    format!(
        "data:image/svg+xml;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(svg)
    )
}

pub fn fallback_colors() -> Vec<BrandColor> {
    let color = |name: &str, hex: &str, usage: &str| BrandColor {
        name: name.into(),
        hex: hex.into(),
        usage: usage.into(),
    };
    vec![
        color("Primario", "#6366f1", "Color principal de marca"),
        color("Secundario", "#8b5cf6", "Elementos de apoyo"),
        color("Acento", "#ec4899", "Llamadas a la acción"),
        color("Fondo Claro", "#f9fafb", "Fondos y backgrounds"),
        color("Fondo Oscuro", "#111827", "Texto sobre fondos oscuros"),
        color("Soporte", "#ffffff", "Tarjetas y contenedores"),
    ]
}

fn icon_path(name: &str) -> &'static str {
    match name {
        "home" => r#"<path d="M3 9l9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z"/>"#,
        "search" => r#"<circle cx="11" cy="11" r="8"/><path d="m21 21-4.35-4.35"/>"#,
        "user" => {
            r#"<path d="M20 21v-2a4 4 0 0 0-4-4H8a4 4 0 0 0-4 4v2"/><circle cx="12" cy="7" r="4"/>"#
        }
        "settings" => {
            r#"<circle cx="12" cy="12" r="3"/><path d="M12 1v6m0 6v6M5.64 5.64l4.24 4.24m4.24 4.24l4.24 4.24M1 12h6m6 0h6M5.64 18.36l4.24-4.24m4.24-4.24l4.24-4.24"/>"#
        }
        "heart" => {
            r#"<path d="M20.84 4.61a5.5 5.5 0 0 0-7.78 0L12 5.67l-1.06-1.06a5.5 5.5 0 0 0-7.78 7.78l1.06 1.06L12 21.23l7.78-7.78 1.06-1.06a5.5 5.5 0 0 0 0-7.78z"/>"#
        }
        _ => {
            r#"<polygon points="12 2 15.09 8.26 22 9.27 17 14.14 18.18 21.02 12 17.77 5.82 21.02 7 14.14 2 9.27 8.91 8.26 12 2"/>"#
        }
    }
}

/// A line-art stock icon. Unknown names get the star glyph.
pub fn fallback_icon(name: &str) -> BrandIcon {
    BrandIcon {
        name: name.to_string(),
        svg: format!(
            r#"<svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">{}</svg>"#,
            icon_path(name)
        ),
        description: format!("Icono de {name}"),
    }
}

pub fn fallback_icons() -> Vec<BrandIcon> {
    STOCK_ICON_NAMES.iter().map(|n| fallback_icon(n)).collect()
}

/// Generic services used when discovery fails, so icon slots stay filled.
pub fn fallback_services() -> Vec<(String, String)> {
    (1..=6)
        .map(|i| (format!("Servicio {i}"), format!("Descripción {i}")))
        .collect()
}

/// The complete stock kit: 5 mood variants over the default palette.
pub fn fallback_branding(brand_name: &str, description: &str) -> BrandBranding {
    let colors = fallback_colors();
    let typography = TypographySet::default();
    let icons = fallback_icons();

    let initial = brand_name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "B".to_string());
    let logo = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 200">
    <defs>
      <linearGradient id="grad" x1="0%" y1="0%" x2="100%" y2="100%">
        <stop offset="0%" style="stop-color:#6366f1"/>
        <stop offset="100%" style="stop-color:#8b5cf6"/>
      </linearGradient>
    </defs>
    <rect width="200" height="200" rx="40" fill="url(#grad)"/>
    <text x="100" y="140" font-family="Arial, sans-serif" font-size="100" font-weight="bold" fill="white" text-anchor="middle">{initial}</text>
  </svg>"##
    );

    let moods = ["modern", "classic", "minimalist", "bold", "elegant"];
    let proposal_names = ["Innovador", "Tradicional", "Puro", "Audaz", "Sofisticado"];

    let proposals = moods
        .iter()
        .zip(proposal_names.iter())
        .enumerate()
        .map(|(i, (mood, label))| BrandProposal {
            id: (i + 1) as u32,
            name: format!("{label} {brand_name}"),
            description: format!(
                "Una propuesta {mood} que captura la esencia de {brand_name}. {description}"
            ),
            color_scheme: colors.iter().map(|c| c.hex.clone()).collect(),
            typography: ProposalTypography {
                titulo: typography.heading.name.clone(),
                cuerpo: typography.body.name.clone(),
            },
            mood: mood.to_string(),
            applications: vec![
                "Website".into(),
                "Business cards".into(),
                "Social media".into(),
                "Email signature".into(),
            ],
            logo: None,
            icons: None,
        })
        .collect();

    BrandBranding {
        brand_name: brand_name.to_string(),
        tagline: tagline(brand_name),
        logo,
        colors,
        typography,
        icons,
        proposals,
        selected_proposal_id: None,
        selected_components: None,
    }
}
