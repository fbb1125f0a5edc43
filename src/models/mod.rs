pub mod branding;
pub mod project;
pub mod settings;

pub use branding::{
    BrandBranding, BrandColor, BrandIcon, BrandProposal, FontChoice, ProposalTypography,
    SelectedComponents, TypographySet,
};
pub use project::{BrandProject, Message, MessageRole, ProjectStatus};
pub use settings::{AppSettings, WebhookConfig};
