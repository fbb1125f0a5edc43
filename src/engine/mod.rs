pub mod chat;
pub mod fallback;
pub mod gemini;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
