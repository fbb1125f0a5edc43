//! The branding-generation pipeline: creative directions → logo → service
//! discovery → icons → proposal assembly.
//!
//! The pipeline degrades instead of failing: a dead provider yields the
//! stock kit, a failed image yields a placeholder, a failed discovery
//! yields generic services. The caller always gets a complete
//! `BrandBranding`.

use std::time::Duration;

use crate::engine::fallback;
use crate::engine::gemini::{ChatTurn, GenerativeBackend};
use crate::engine::normalize::{self, NormalizedDirection, ServiceDefinition};
use crate::engine::prompt;
use crate::error::AppError;
use crate::models::{
    BrandBranding, BrandColor, BrandIcon, BrandProposal, ProposalTypography, TypographySet,
};

/// Delay between consecutive icon image calls. Imagen quota is per-minute
/// and six icons back-to-back will trip it.
const ICON_PACING: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub brand_name: String,
    pub description: String,
    pub industry: Option<String>,
    pub target_audience: Option<String>,
    pub chat_context: Option<String>,
}

/// Generate a full brand kit. Never fails: pipeline-level errors fall back
/// to the deterministic stock kit.
pub async fn generate_branding(
    backend: &dyn GenerativeBackend,
    request: &GenerationRequest,
) -> BrandBranding {
    tracing::info!(brand = %request.brand_name, "Starting branding generation");
    match run_pipeline(backend, request).await {
        Ok(branding) => branding,
        Err(e) => {
            tracing::error!("Branding pipeline failed, using fallback kit: {e}");
            fallback::fallback_branding(&request.brand_name, &request.description)
        }
    }
}

/// One assembled variant plus the rich color/typography data the top-level
/// branding mirrors for the primary proposal.
struct AssembledProposal {
    proposal: BrandProposal,
    colors: Vec<BrandColor>,
    typography: TypographySet,
}

async fn run_pipeline(
    backend: &dyn GenerativeBackend,
    request: &GenerationRequest,
) -> Result<BrandBranding, AppError> {
    // Step 1: creative director, 5 distinct directions.
    let director_prompt = prompt::creative_director(
        &request.brand_name,
        &request.description,
        request.industry.as_deref(),
        request.target_audience.as_deref(),
        request.chat_context.as_deref(),
    );
    let raw = backend.generate_text(&director_prompt).await?;
    let directions = normalize::parse_directions(&raw)?;
    tracing::info!("Parsed {} creative directions", directions.len());

    // Steps 2-4: per-direction logo, icons, assembly. Only the primary
    // direction gets real image generation; the rest get placeholders.
    let mut assembled = Vec::with_capacity(directions.len());
    for (i, direction) in directions.iter().enumerate() {
        let logo = if i == 0 {
            primary_logo(backend, request, direction).await
        } else {
            fallback::placeholder_logo(&request.brand_name, direction.primary_hex())
        };

        let icons = if i == 0 {
            primary_icons(backend, request, direction).await
        } else {
            fallback::fallback_icons()
        };

        assembled.push(assemble(request, i, direction, logo, icons));
    }

    Ok(assemble_branding(request, assembled))
}

/// Generate the real logo for the primary direction, with a placeholder on
/// failure.
async fn primary_logo(
    backend: &dyn GenerativeBackend,
    request: &GenerationRequest,
    direction: &NormalizedDirection,
) -> String {
    let logo_prompt = prompt::logo_image(
        &request.brand_name,
        &direction.visual_description,
        direction.mood.as_deref().unwrap_or("modern"),
        &direction.palette_hexes(),
        request.industry.as_deref(),
    );
    match backend.generate_image(&logo_prompt).await {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Logo generation failed, using placeholder: {e}");
            fallback::placeholder_logo(&request.brand_name, direction.primary_hex())
        }
    }
}

/// Discover the business's services and render one icon per service.
async fn primary_icons(
    backend: &dyn GenerativeBackend,
    request: &GenerationRequest,
    direction: &NormalizedDirection,
) -> Vec<BrandIcon> {
    let services = discover_services(backend, request).await;
    let primary_hex = direction.primary_hex();

    let mut icons = Vec::with_capacity(services.len());
    for (i, service) in services.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(ICON_PACING).await;
        }
        let icon_prompt = prompt::icon_image(
            &service.name,
            &service.description,
            request.industry.as_deref(),
            primary_hex,
        );
        match backend.generate_image(&icon_prompt).await {
            Ok(url) => {
                tracing::debug!(icon = %service.name, "Icon generated ({}/{})", i + 1, services.len());
                icons.push(BrandIcon {
                    name: service.name.clone(),
                    svg: url,
                    description: service.description.clone(),
                });
            }
            Err(e) => {
                tracing::warn!(icon = %service.name, "Icon generation failed, using stock glyph: {e}");
                let mut stock = fallback::fallback_icon(&service.name.to_lowercase());
                stock.name = service.name.clone();
                stock.description = service.description.clone();
                icons.push(stock);
            }
        }
    }
    icons
}

async fn discover_services(
    backend: &dyn GenerativeBackend,
    request: &GenerationRequest,
) -> Vec<ServiceDefinition> {
    let discovery_prompt = prompt::service_discovery(
        &request.brand_name,
        &request.description,
        request.chat_context.as_deref(),
    );
    let history = [ChatTurn {
        role: "user".into(),
        text: discovery_prompt,
    }];

    let services = match backend
        .generate_chat(&history, prompt::DEFAULT_CHAT_INSTRUCTION)
        .await
    {
        Ok(raw) => normalize::parse_services(&raw),
        Err(e) => {
            tracing::warn!("Service discovery failed: {e}");
            Vec::new()
        }
    };

    if services.is_empty() {
        fallback::fallback_services()
            .into_iter()
            .map(|(name, description)| ServiceDefinition { name, description })
            .collect()
    } else {
        services
    }
}

fn assemble(
    request: &GenerationRequest,
    index: usize,
    direction: &NormalizedDirection,
    logo: String,
    icons: Vec<BrandIcon>,
) -> AssembledProposal {
    let colors = direction
        .colors
        .clone()
        .unwrap_or_else(fallback::fallback_colors);
    let typography = direction.typography.clone().unwrap_or_default();

    let proposal = BrandProposal {
        id: (index + 1) as u32,
        name: direction
            .name
            .clone()
            .unwrap_or_else(|| format!("Propuesta {}", index + 1)),
        description: direction
            .description
            .clone()
            .unwrap_or_else(|| format!("Diseño para {}", request.brand_name)),
        color_scheme: colors.iter().map(|c| c.hex.clone()).collect(),
        typography: ProposalTypography {
            titulo: typography.heading.name.clone(),
            cuerpo: typography.body.name.clone(),
        },
        mood: direction.mood.clone().unwrap_or_else(|| "moderno".into()),
        applications: fallback::APPLICATIONS.iter().map(|s| s.to_string()).collect(),
        logo: Some(logo),
        icons: Some(icons),
    };

    AssembledProposal {
        proposal,
        colors,
        typography,
    }
}

/// Top-level branding fields mirror the first proposal.
fn assemble_branding(
    request: &GenerationRequest,
    assembled: Vec<AssembledProposal>,
) -> BrandBranding {
    let main = &assembled[0];

    BrandBranding {
        brand_name: request.brand_name.clone(),
        tagline: fallback::tagline(&request.brand_name),
        logo: main.proposal.logo.clone().unwrap_or_default(),
        colors: main.colors.clone(),
        typography: main.typography.clone(),
        icons: main.proposal.icons.clone().unwrap_or_default(),
        proposals: assembled.into_iter().map(|a| a.proposal).collect(),
        selected_proposal_id: None,
        selected_components: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    /// Scripted backend: fixed responses per call kind, optional failures.
    struct StubBackend {
        director: Result<String, String>,
        services: Result<String, String>,
        image: Result<String, String>,
    }

    impl StubBackend {
        fn ok() -> Self {
            let director = json!({
                "proposals": [
                    {
                        "name": "Neon",
                        "mood": "Moderno/Tech",
                        "description": "Brutal y directo.",
                        "colors": [
                            {"name": "Primario", "hex": "#101820", "usage": "principal"},
                            {"name": "Acento", "hex": "#fee715", "usage": "acciones"}
                        ],
                        "typography": {"titulo": "Sora", "cuerpo": "Outfit"},
                        "logoDescription": "monograma angular",
                        "iconStyle": "Geométrico sólido"
                    },
                    {
                        "name": "Clásico",
                        "mood": "Clásico/Elegante"
                    }
                ]
            });
            let services = json!({
                "services": [
                    {"name": "Soporte Técnico", "description": "ayuda 24/7"},
                    {"name": "SEO", "description": "posicionamiento"}
                ]
            });
            Self {
                director: Ok(director.to_string()),
                services: Ok(services.to_string()),
                image: Ok("data:image/png;base64,QUJD".into()),
            }
        }
    }

    #[async_trait]
    impl GenerativeBackend for StubBackend {
        async fn generate_text(&self, _prompt: &str) -> Result<String, AppError> {
            self.director.clone().map_err(AppError::Provider)
        }

        async fn generate_chat(
            &self,
            _history: &[ChatTurn],
            _system_instruction: &str,
        ) -> Result<String, AppError> {
            self.services.clone().map_err(AppError::Provider)
        }

        async fn generate_image(&self, _prompt: &str) -> Result<String, AppError> {
            self.image.clone().map_err(AppError::Provider)
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            brand_name: "Acme".into(),
            description: "vende cohetes".into(),
            industry: Some("Aeroespacial".into()),
            target_audience: None,
            chat_context: Some("entrevista".into()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_happy_path_assembles_both_proposals() {
        let backend = StubBackend::ok();
        let branding = generate_branding(&backend, &request()).await;

        assert_eq!(branding.brand_name, "Acme");
        assert_eq!(branding.proposals.len(), 2);

        // Primary proposal got the real image and discovered icons
        let main = &branding.proposals[0];
        assert_eq!(main.logo.as_deref(), Some("data:image/png;base64,QUJD"));
        let icons = main.icons.as_ref().unwrap();
        assert_eq!(icons.len(), 2);
        assert_eq!(icons[0].name, "Soporte Técnico");

        // Secondary proposal got placeholders and stock icons
        let second = &branding.proposals[1];
        assert!(second.logo.as_deref().unwrap().starts_with("data:image/svg+xml"));
        assert_eq!(second.icons.as_ref().unwrap().len(), 6);

        assert_eq!(main.color_scheme, vec!["#101820", "#fee715"]);
        assert_eq!(main.typography.titulo, "Sora");
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_proposal_mirrors_top_level() {
        let backend = StubBackend::ok();
        let branding = generate_branding(&backend, &request()).await;
        let main = &branding.proposals[0];

        assert_eq!(Some(branding.logo.clone()), main.logo);
        assert_eq!(branding.icons, main.icons.clone().unwrap());
        assert_eq!(
            branding.colors.iter().map(|c| c.hex.clone()).collect::<Vec<_>>(),
            main.color_scheme
        );
        assert_eq!(branding.typography.heading.name, main.typography.titulo);
        assert_eq!(branding.typography.body.name, main.typography.cuerpo);
    }

    #[tokio::test(start_paused = true)]
    async fn test_director_failure_falls_back_to_stock_kit() {
        let mut backend = StubBackend::ok();
        backend.director = Err("quota exceeded".into());

        let branding = generate_branding(&backend, &request()).await;
        assert_eq!(branding.brand_name, "Acme");
        assert_eq!(branding.proposals.len(), 5);
        assert!(branding.logo.contains("<svg"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unparseable_director_output_falls_back() {
        let mut backend = StubBackend::ok();
        backend.director = Ok("lo siento, no puedo".into());

        let branding = generate_branding(&backend, &request()).await;
        assert_eq!(branding.proposals.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_image_failures_yield_placeholders() {
        let mut backend = StubBackend::ok();
        backend.image = Err("429".into());

        let branding = generate_branding(&backend, &request()).await;
        let main = &branding.proposals[0];

        assert!(main.logo.as_deref().unwrap().starts_with("data:image/svg+xml"));
        // Icons fall back per-service to stock glyphs
        let icons = main.icons.as_ref().unwrap();
        assert_eq!(icons.len(), 2);
        assert!(icons.iter().all(|i| i.svg.starts_with("<svg")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_discovery_failure_uses_generic_services() {
        let mut backend = StubBackend::ok();
        backend.services = Err("down".into());

        let branding = generate_branding(&backend, &request()).await;
        let icons = branding.proposals[0].icons.as_ref().unwrap();
        assert_eq!(icons.len(), 6);
        assert_eq!(icons[0].name, "Servicio 1");
    }
}
