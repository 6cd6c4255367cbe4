pub mod classifier;
pub mod prompt;
pub mod summarizer;
pub mod truncate;

pub use classifier::{classify, DocumentKind};
pub use prompt::{build_prompt, GenerationRequest, PreparedPrompt};
pub use summarizer::{GenerationClient, GenerationParams, Summarizer};
pub use truncate::{truncate, DEFAULT_MAX_CHARS, TRUNCATION_NOTICE};
