//! Branding-generation service: a conversational branding interview, an
//! AI pipeline producing complete brand kits (logo, palette, typography,
//! icons, proposals), file-based project storage and PDF/ZIP exports,
//! all behind a REST API.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod storage;
pub mod validation;
