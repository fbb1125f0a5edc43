//! Prompt construction for the branding pipeline.
//!
//! The prompt text is in Spanish, matching the product's user base.
//! Rewording any of it changes model behavior, so treat edits as tuning.

use crate::models::{Message, MessageRole};

/// System instruction for the one-question-at-a-time branding interview.
pub const INTERVIEW_SYSTEM_INSTRUCTION: &str = "\
Eres BrandGen AI, un Consultor de Branding de Élite de la agencia 'Brand Genius'.
Tu misión es guiar al usuario en una entrevista de branding 1-a-1 fluida para descubrir su esencia.

REGLAS DE ORO (INCUMPLIMIENTO = DESPIDO INMEDIATO):
1. **PROHIBIDO EL BOMBARDEO**: NUNCA, bajo ningún concepto, hagas más de UNA (1) pregunta por mensaje.
2. **SIN LISTAS NI CUESTIONARIOS**: No uses viñetas, números, guiones ni párrafos con múltiples preguntas. Si detecto un signo de interrogación secundario, es un fallo crítico.
3. **DESCUBRIMIENTO DE SERVICIOS**: Es OBLIGATORIO preguntar específicamente: \"¿Qué servicios o productos ofreces exactamente?\" al inicio. Necesitamos esto para diseñar los iconos de la web.
4. **BREVEDAD ESTRATÉGICA**: Máximo 15 palabras por respuesta. Sé directo, profesional e incisivo.
5. **NO REPETIR**: Si el usuario ya dio un dato, no lo pidas otra vez.

FLUJO DE ENTREVISTA:
- Paso 1: Nombre y Servicios (Prioritario).
- Paso 2: Público objetivo.
- Paso 3: Valores o Mood (Moderno, Clásico, Innovador, etc.).

FINALIZACIÓN (Solo tras tener los servicios específicos):
Di EXACTAMENTE:
\"¡Excelente! Tengo una visión clara de lo que necesitamos. Tu identidad de marca está lista para nacer. Por favor, haz clic en el botón **'✨ Generar Branding'** que ha aparecido aquí abajo para ver las 5 propuestas exclusivas que he diseñado para ti.\"";

/// Default system instruction for the raw chat passthrough endpoint.
pub const DEFAULT_CHAT_INSTRUCTION: &str =
    "Eres un asistente experto en branding. Responde claro y directo.";

/// The creative-director prompt: asks for 5 radically distinct brand
/// directions in a strict JSON shape.
pub fn creative_director(
    brand_name: &str,
    description: &str,
    industry: Option<&str>,
    target_audience: Option<&str>,
    chat_context: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Actúa como un Director Creativo Senior de una agencia de branding de clase mundial.

ANÁLISIS DE MARCA:
- Nombre: {brand_name}
- Industria: {industry}
- Descripción: {description}
- Público objetivo: {audience}",
        industry = industry.unwrap_or("General"),
        audience = target_audience.unwrap_or("General"),
    );

    if let Some(context) = chat_context {
        if !context.trim().is_empty() {
            prompt.push_str(&format!(
                "\nContexto detallado de la entrevista: {context}"
            ));
        }
    }

    prompt.push_str(
        "

Tu tarea: Define 5 direcciones creativas RADICALMENTE DISTINTAS entre sí para esta marca.

REQUERIMIENTOS POR PROPUESTA:
1. **Nombre Creativo**: Título sugerente para la propuesta.
2. **Mood/Estilo**: Debe ser uno de estos 5 (sin repetir): [Moderno/Tech, Clásico/Elegante, Minimalista/Puro, Audaz/Rebelde, Innovador/Futurista].
3. **Concepto**: Explicación de 2 oraciones del porqué de este estilo para el negocio.
4. **Paleta de Colores**: 6 colores HEX con nombres y usos (ej: Primario, Secundario, Acento, Fondo 1, Fondo 2, Complemento). Las paletas deben variar en temperatura y contraste.
5. **Tipografías**: PAREJA ÚNICA de Google Fonts (título y cuerpo). Usa fuentes diversas como [Inter, Montserrat, Playfair Display, Roboto Mono, Sora, Outfit, Fraunces]. No repitas fuentes en las 5 propuestas.
6. **Descripción Visual del Logo**: Detalles para un diseñador sobre formas, símbolos y composición.
7. **Estilo de Iconografía**: Describe cómo deben ser los iconos (ej: \"Líneas finas minimalistas\", \"3D Glassmorphism colorido\", \"Geométrico sólido\").

Responde ESTRICTAMENTE en este formato JSON (sin markdown, sin texto extra):
{
  \"proposals\": [
    {
      \"name\": \"...\",
      \"mood\": \"...\",
      \"description\": \"...\",
      \"colors\": [ {\"name\": \"...\", \"hex\": \"#...\", \"usage\": \"...\"} ],
      \"typography\": { \"titulo\": \"Font Name\", \"cuerpo\": \"Font Name\" },
      \"logoDescription\": \"...\",
      \"iconStyle\": \"...\"
    }
  ]
}",
    );

    prompt
}

/// Identify the business's key services so icons can be designed for them.
pub fn service_discovery(brand_name: &str, description: &str, chat_context: Option<&str>) -> String {
    format!(
        "Marca: \"{brand_name}\". Descripción: \"{description}\".
Entrevista: \"{context}\".
Identifica los 6 servicios clave de este negocio para crear iconos para su web.
Usa nombres reales de servicios (ej: \"Soporte Técnico\", \"Diseño\", \"SEO\").
Responde en JSON: {{\"services\": [{{\"name\": \"...\", \"description\": \"...\"}}]}}",
        context = chat_context.unwrap_or(""),
    )
}

/// Imagen prompt for the primary logo.
pub fn logo_image(
    brand_name: &str,
    visual_description: &str,
    mood: &str,
    palette: &[String],
    industry: Option<&str>,
) -> String {
    let colors = if palette.is_empty() {
        "#6366f1, #8b5cf6".to_string()
    } else {
        palette.join(", ")
    };
    format!(
        "Professional logo design for \"{brand_name}\". {visual_description}. \n\
Style: {mood}. \n\
Colors: {colors}. \n\
Industry: {industry}. No text, vector style, white background.",
        industry = industry.unwrap_or("technology"),
    )
}

/// Imagen prompt for one service icon.
pub fn icon_image(
    service_name: &str,
    concept: &str,
    industry: Option<&str>,
    primary_hex: &str,
) -> String {
    format!(
        "Modern Web Service Icon for \"{service_name}\".
Visual concept: {concept}.
Industry Context: {industry}.
Design Style: High-quality modern glassmorphism or 3D render style but simplified, soft shadows, vibrant {primary_hex} gradients.
Shape: Perfectly centered inside a soft rounded square background.
Composition: Clean vector-like lines, minimalist but premium.
Output: High definition, professional web illustration, centered, NO text.
Background: Transparent background.",
        industry = industry.unwrap_or("General"),
    )
}

/// Flatten the interview into a labelled transcript for the creative
/// director.
pub fn context_summary(messages: &[Message]) -> String {
    let join = |role: MessageRole| {
        messages
            .iter()
            .filter(|m| m.role == role)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Conversación del usuario:\n{}\n\nRespuestas del asistente:\n{}",
        join(MessageRole::User),
        join(MessageRole::Assistant),
    )
    .trim()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creative_director_includes_brand_facts() {
        let prompt = creative_director("Acme", "vende cohetes", Some("Aeroespacial"), None, None);
        assert!(prompt.contains("Nombre: Acme"));
        assert!(prompt.contains("Industria: Aeroespacial"));
        assert!(prompt.contains("Público objetivo: General"));
        assert!(prompt.contains("\"proposals\""));
        assert!(!prompt.contains("Contexto detallado"));
    }

    #[test]
    fn test_creative_director_appends_chat_context() {
        let prompt = creative_director("Acme", "d", None, None, Some("cliente quiere lujo"));
        assert!(prompt.contains("Contexto detallado de la entrevista: cliente quiere lujo"));
    }

    #[test]
    fn test_logo_prompt_defaults() {
        let prompt = logo_image("Acme", "abstract mark", "modern", &[], None);
        assert!(prompt.contains("#6366f1, #8b5cf6"));
        assert!(prompt.contains("Industry: technology"));
        assert!(prompt.contains("No text, vector style"));
    }

    #[test]
    fn test_context_summary_splits_roles() {
        let messages = vec![
            Message::user("hola"),
            Message::assistant("¿qué vendes?"),
            Message::user("velas artesanales"),
        ];
        let summary = context_summary(&messages);
        assert!(summary.starts_with("Conversación del usuario:\nhola\nvelas artesanales"));
        assert!(summary.contains("Respuestas del asistente:\n¿qué vendes?"));
    }
}
