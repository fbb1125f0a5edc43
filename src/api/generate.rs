//! Low-level generation passthrough used by clients that drive the model
//! directly instead of going through the pipeline.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::engine::gemini::ChatTurn;
use crate::engine::prompt;
use crate::error::AppError;

/// Gemini-style history turn: `{role, parts: [{text}]}`.
#[derive(Debug, Deserialize)]
pub struct WireTurn {
    pub role: String,
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
pub struct WirePart {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub prompt: Option<String>,
    #[serde(default)]
    pub history: Vec<WireTurn>,
    pub system_instruction: Option<String>,
}

pub async fn handle(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let kind = request.kind.as_deref().unwrap_or("text");

    if request.prompt.is_none() && kind != "chat" {
        return Err(AppError::Validation("prompt is required".to_string()));
    }

    match kind {
        "image" => {
            let prompt = request.prompt.as_deref().unwrap_or_default();
            let logo = state.backend.generate_image(prompt).await?;
            Ok(Json(json!({ "logo": logo })))
        }
        "chat" => {
            let history: Vec<ChatTurn> = if request.history.is_empty() {
                let prompt = request
                    .prompt
                    .ok_or_else(|| AppError::Validation("prompt or history required".to_string()))?;
                vec![ChatTurn {
                    role: "user".to_string(),
                    text: prompt,
                }]
            } else {
                request
                    .history
                    .into_iter()
                    .map(|turn| ChatTurn {
                        role: turn.role,
                        text: turn
                            .parts
                            .into_iter()
                            .map(|p| p.text)
                            .collect::<Vec<_>>()
                            .join(""),
                    })
                    .collect()
            };
            let instruction = request
                .system_instruction
                .as_deref()
                .unwrap_or(prompt::DEFAULT_CHAT_INSTRUCTION);
            let result = state.backend.generate_chat(&history, instruction).await?;
            Ok(Json(json!({ "result": result })))
        }
        // "text" and anything unrecognized behave alike
        _ => {
            let prompt = request.prompt.as_deref().unwrap_or_default();
            let result = state.backend.generate_text(prompt).await?;
            Ok(Json(json!({ "result": result })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_gemini_wire_shape() {
        let request: GenerateRequest = serde_json::from_str(
            r#"{
                "type": "chat",
                "history": [
                    {"role": "user", "parts": [{"text": "hola"}]},
                    {"role": "model", "parts": [{"text": "¿nombre?"}]}
                ],
                "systemInstruction": "Eres un asistente."
            }"#,
        )
        .unwrap();

        assert_eq!(request.kind.as_deref(), Some("chat"));
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history[1].parts[0].text, "¿nombre?");
        assert!(request.prompt.is_none());
    }

    #[test]
    fn test_request_defaults() {
        let request: GenerateRequest =
            serde_json::from_str(r#"{"prompt": "di hola"}"#).unwrap();
        assert!(request.kind.is_none());
        assert!(request.history.is_empty());
    }
}
