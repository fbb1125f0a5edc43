use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::branding::BrandBranding;

// ============================================================================
// Projects
// ============================================================================

/// Project lifecycle status. Wire values are lowercase, as stored in
/// existing project documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    Generating,
    Completed,
    Exported,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Draft
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One turn of the branding interview. The per-project message list is
/// append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A branding project: interview log plus (once generated) the brand kit.
///
/// Defaults are lenient so a client can POST a minimal document
/// (`{"name": "..."}`) and get a fully-formed project back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandProject {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<BrandBranding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_generate: Option<bool>,
}

impl BrandProject {
    /// Assign an id when the client did not supply one.
    pub fn ensure_id(&mut self) {
        if self.id.trim().is_empty() {
            self.id = uuid::Uuid::new_v4().to_string();
        }
    }

    /// Display name for export artifacts: the generated brand name when
    /// branding exists, the project name otherwise.
    pub fn branding_name(&self) -> &str {
        self.branding
            .as_ref()
            .map(|b| b.brand_name.as_str())
            .unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_document_deserializes() {
        let project: BrandProject = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        assert_eq!(project.name, "Acme");
        assert_eq!(project.status, ProjectStatus::Draft);
        assert!(project.messages.is_empty());
        assert!(project.branding.is_none());
        assert!(project.id.is_empty());
    }

    #[test]
    fn test_ensure_id_fills_blank_only() {
        let mut project: BrandProject = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        project.ensure_id();
        assert!(!project.id.is_empty());

        let kept = project.id.clone();
        project.ensure_id();
        assert_eq!(project.id, kept);
    }

    #[test]
    fn test_status_wire_values_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProjectStatus::Generating).unwrap(),
            "\"generating\""
        );
        let status: ProjectStatus = serde_json::from_str("\"exported\"").unwrap();
        assert_eq!(status, ProjectStatus::Exported);
    }

    #[test]
    fn test_message_roles_round_trip() {
        let msg = Message::user("hola");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back.content, "hola");
    }
}
