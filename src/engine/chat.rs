//! The branding interview: one conversational turn against the model, with
//! a scripted fallback so the interview keeps moving when the provider is
//! unavailable.

use crate::engine::gemini::{ChatTurn, GenerativeBackend};
use crate::engine::prompt;
use crate::models::{Message, MessageRole};

const CLOSING_REPLIES: &[&str] = &[
    "Tengo toda la información que necesito. ¿Listo para generar tu branding? Haz clic en '✨ Generar Branding'",
    "Perfecto, tu marca suena muy interesante. ¿Quieres que genere las propuestas de branding ahora?",
    "¡Excelente! Con toda esta información podré crear un branding perfecto para ti. ¿Generamos las propuestas?",
];

/// Answer the latest interview message. Assistant turns are sent to the
/// model under the `model` role. Provider failures degrade to the scripted
/// interview flow instead of surfacing an error.
pub async fn interview_reply(backend: &dyn GenerativeBackend, messages: &[Message]) -> String {
    let history: Vec<ChatTurn> = messages
        .iter()
        .map(|m| ChatTurn {
            role: match m.role {
                MessageRole::Assistant => "model".to_string(),
                MessageRole::User => "user".to_string(),
            },
            text: m.content.clone(),
        })
        .collect();

    match backend
        .generate_chat(&history, prompt::INTERVIEW_SYSTEM_INSTRUCTION)
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Chat provider unavailable, using scripted reply: {e}");
            scripted_reply(messages)
        }
    }
}

/// Keyword-driven interview script used when no provider answers.
fn scripted_reply(messages: &[Message]) -> String {
    let last = messages
        .last()
        .map(|m| m.content.to_lowercase())
        .unwrap_or_default();
    let user_turns = messages
        .iter()
        .filter(|m| m.role == MessageRole::User)
        .count();

    if user_turns == 0 {
        return "¡Hola! Soy BrandGen AI, tu asistente de branding. Cuéntame sobre tu empresa o marca. ¿Qué nombre tiene y a qué se dedica?".to_string();
    }
    if last.contains("logo") || last.contains("diseño") {
        return "¿Te gustaría un diseño moderno y minimalista, o prefieres algo más tradicional y elegante?".to_string();
    }
    if last.contains("color") {
        return "Perfecto con los colores. ¿Tienes alguna preferencia de tipografía? ¿Prefieres fuentes modernas o clásicas?".to_string();
    }
    if user_turns < 3 {
        return "¿Hay algo más que deba saber sobre tu marca? Por ejemplo, ¿quién es tu público objetivo o qué valores quieres transmitir?".to_string();
    }

    // Deterministic pick so repeated calls on the same transcript agree.
    CLOSING_REPLIES[messages.len() % CLOSING_REPLIES.len()].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;

    struct DeadBackend;

    #[async_trait]
    impl GenerativeBackend for DeadBackend {
        async fn generate_text(&self, _prompt: &str) -> Result<String, AppError> {
            Err(AppError::Provider("offline".into()))
        }

        async fn generate_chat(
            &self,
            _history: &[ChatTurn],
            _system_instruction: &str,
        ) -> Result<String, AppError> {
            Err(AppError::Provider("offline".into()))
        }

        async fn generate_image(&self, _prompt: &str) -> Result<String, AppError> {
            Err(AppError::Provider("offline".into()))
        }
    }

    struct EchoBackend;

    #[async_trait]
    impl GenerativeBackend for EchoBackend {
        async fn generate_text(&self, _prompt: &str) -> Result<String, AppError> {
            Ok(String::new())
        }

        async fn generate_chat(
            &self,
            history: &[ChatTurn],
            _system_instruction: &str,
        ) -> Result<String, AppError> {
            Ok(history
                .iter()
                .map(|t| format!("{}:{}", t.role, t.text))
                .collect::<Vec<_>>()
                .join("|"))
        }

        async fn generate_image(&self, _prompt: &str) -> Result<String, AppError> {
            Err(AppError::Provider("no images".into()))
        }
    }

    #[tokio::test]
    async fn test_assistant_turns_map_to_model_role() {
        let messages = vec![
            Message::assistant("Hola"),
            Message::user("Mi marca se llama Acme"),
        ];
        let reply = interview_reply(&EchoBackend, &messages).await;
        assert_eq!(reply, "model:Hola|user:Mi marca se llama Acme");
    }

    #[tokio::test]
    async fn test_scripted_greeting_on_empty_interview() {
        let reply = interview_reply(&DeadBackend, &[]).await;
        assert!(reply.starts_with("¡Hola! Soy BrandGen AI"));
    }

    #[tokio::test]
    async fn test_scripted_logo_branch() {
        let messages = vec![Message::user("quiero un logo llamativo")];
        let reply = interview_reply(&DeadBackend, &messages).await;
        assert!(reply.contains("minimalista"));
    }

    #[tokio::test]
    async fn test_scripted_color_branch() {
        let messages = vec![Message::user("me gusta el color azul")];
        let reply = interview_reply(&DeadBackend, &messages).await;
        assert!(reply.contains("tipografía"));
    }

    #[tokio::test]
    async fn test_scripted_closing_after_three_user_turns() {
        let messages = vec![
            Message::user("Acme"),
            Message::user("vendemos cohetes"),
            Message::user("público joven"),
        ];
        let reply = interview_reply(&DeadBackend, &messages).await;
        assert!(CLOSING_REPLIES.contains(&reply.as_str()));
    }
}
