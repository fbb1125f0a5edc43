use serde::{Deserialize, Serialize};

// ============================================================================
// Brand kit
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandColor {
    pub name: String,
    pub hex: String,
    #[serde(default)]
    pub usage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontChoice {
    pub name: String,
    pub font_family: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub google_font: String,
}

impl FontChoice {
    /// Build a font choice from a bare Google Fonts family name.
    pub fn from_family(name: &str, usage: &str) -> Self {
        Self {
            name: name.to_string(),
            font_family: format!("{name}, sans-serif"),
            usage: usage.to_string(),
            google_font: name.replace(' ', "+"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographySet {
    pub heading: FontChoice,
    pub body: FontChoice,
}

impl Default for TypographySet {
    fn default() -> Self {
        Self {
            heading: FontChoice::from_family("Inter", "Títulos"),
            body: FontChoice::from_family("DM Sans", "Cuerpo"),
        }
    }
}

/// An icon asset. `svg` historically carried inline SVG markup; after a
/// generation run it can also be a `data:image/...` URL or a stored-image URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandIcon {
    pub name: String,
    pub svg: String,
    #[serde(default)]
    pub description: String,
}

/// Proposal typography uses the Spanish wire names (`titulo`/`cuerpo`)
/// found in existing project documents; renaming them would orphan
/// stored data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalTypography {
    pub titulo: String,
    pub cuerpo: String,
}

/// One self-contained stylistic variant of the brand kit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProposal {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color_scheme: Vec<String>,
    pub typography: ProposalTypography,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub applications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<Vec<BrandIcon>>,
}

/// Per-component proposal overrides picked by the user after generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_proposal_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography_proposal_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_proposal_id: Option<u32>,
}

/// The generated brand kit.
///
/// Invariant: the first proposal mirrors the top-level fields (logo, colors,
/// typography, icons). `crate::engine::pipeline` is the only producer and
/// upholds it at assembly time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandBranding {
    pub brand_name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub colors: Vec<BrandColor>,
    #[serde(default)]
    pub typography: TypographySet,
    #[serde(default)]
    pub icons: Vec<BrandIcon>,
    #[serde(default)]
    pub proposals: Vec<BrandProposal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_proposal_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_components: Option<SelectedComponents>,
}

impl BrandBranding {
    pub fn proposal(&self, id: u32) -> Option<&BrandProposal> {
        self.proposals.iter().find(|p| p.id == id)
    }
}
