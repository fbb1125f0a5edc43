//! Component-selection fusion: a user can mix the palette of one proposal
//! with the typography of another and the logo of a third. Exports always
//! operate on the fused kit, never on the raw top-level fields.

use crate::models::{BrandBranding, BrandColor, FontChoice, TypographySet};

/// The effective kit after applying `selectedComponents` overrides.
#[derive(Debug, Clone)]
pub struct MergedKit {
    pub colors: Vec<BrandColor>,
    pub typography: TypographySet,
    pub logo: String,
}

/// Resolve the kit a user actually picked. Fields without an override keep
/// the top-level branding values.
pub fn merge_selection(branding: &BrandBranding) -> MergedKit {
    let mut kit = MergedKit {
        colors: branding.colors.clone(),
        typography: branding.typography.clone(),
        logo: branding.logo.clone(),
    };

    let Some(selection) = branding.selected_components.as_ref() else {
        return kit;
    };

    if let Some(proposal) = selection
        .color_proposal_id
        .and_then(|id| branding.proposal(id))
    {
        kit.colors = scheme_to_colors(&proposal.color_scheme);
    }

    if let Some(proposal) = selection
        .typography_proposal_id
        .and_then(|id| branding.proposal(id))
    {
        kit.typography = TypographySet {
            heading: FontChoice::from_family(&proposal.typography.titulo, "Títulos"),
            body: FontChoice::from_family(&proposal.typography.cuerpo, "Cuerpo"),
        };
    }

    if let Some(logo) = selection
        .logo_proposal_id
        .and_then(|id| branding.proposal(id))
        .and_then(|p| p.logo.as_ref())
    {
        kit.logo = logo.clone();
    }

    kit
}

/// Proposals carry bare hex schemes; name them for the export surfaces.
fn scheme_to_colors(scheme: &[String]) -> Vec<BrandColor> {
    scheme
        .iter()
        .enumerate()
        .map(|(i, hex)| BrandColor {
            name: match i {
                0 => "Primario".to_string(),
                1 => "Secundario".to_string(),
                2 => "Acento".to_string(),
                _ => format!("Color {}", i + 1),
            },
            hex: hex.clone(),
            usage: if i == 0 {
                "Color principal".to_string()
            } else {
                "Color de apoyo".to_string()
            },
        })
        .collect()
}
