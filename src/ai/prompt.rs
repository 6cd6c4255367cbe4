use serde::Serialize;

use super::classifier::DocumentKind;

pub const SYSTEM_PROMPT: &str = "You are a professional summarizer. \
Provide clear, structured summaries based on the user's requirements.";

pub const RESUME_INSTRUCTIONS: &str = "Summarize this resume, highlighting the candidate's \
key skills, professional experience, education, and notable achievements.";

pub const MEETING_DEFAULT_INSTRUCTIONS: &str =
    "Summarize this meeting in clear, actionable bullet points";

pub const GENERAL_DEFAULT_INSTRUCTIONS: &str =
    "Provide a comprehensive summary of the main points in this text.";

/// A chat request ready for the generation service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPrompt {
    /// What gets persisted as the summary's custom prompt.
    pub instructions: String,
    pub request: GenerationRequest,
}

/// Pick the instructions to generate with.
///
/// Resumes always use the fixed resume template. For the other kinds the user's
/// instructions win unless they are blank.
pub fn effective_instructions(kind: DocumentKind, user_instructions: &str) -> String {
    let user = user_instructions.trim();
    match kind {
        DocumentKind::Resume => RESUME_INSTRUCTIONS.to_string(),
        DocumentKind::Meeting if user.is_empty() => MEETING_DEFAULT_INSTRUCTIONS.to_string(),
        DocumentKind::General if user.is_empty() => GENERAL_DEFAULT_INSTRUCTIONS.to_string(),
        DocumentKind::Meeting | DocumentKind::General => user.to_string(),
    }
}

pub fn build_prompt(kind: DocumentKind, text: &str, user_instructions: &str) -> PreparedPrompt {
    let instructions = effective_instructions(kind, user_instructions);

    let user = format!(
        "Please analyze the following text and provide a summary based on the user's \
specific requirements.\n\nTEXT:\n{}\n\nUSER REQUIREMENTS:\n{}\n\nPlease provide a \
well-structured, professional summary that addresses these requirements. Format the \
response to suit them (bullet points, executive summary, action items, etc.).",
        text, instructions
    );

    PreparedPrompt {
        request: GenerationRequest {
            system: SYSTEM_PROMPT.to_string(),
            user,
        },
        instructions,
    }
}
