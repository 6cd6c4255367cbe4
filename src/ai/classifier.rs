use std::fmt;

use serde::{Deserialize, Serialize};

/// Keywords that suggest a CV or resume.
pub const RESUME_KEYWORDS: &[&str] = &[
    "experience",
    "skills",
    "education",
    "certifications",
    "employment",
    "work history",
    "qualifications",
    "curriculum vitae",
    "resume",
    "objective",
    "proficient",
    "bachelor",
    "internship",
    "references available",
];

/// Keywords that suggest meeting notes or a meeting transcript.
pub const MEETING_KEYWORDS: &[&str] = &[
    "agenda",
    "participants",
    "minutes",
    "transcript",
    "attendees",
    "action items",
    "meeting",
    "discussed",
    "follow-up",
    "next steps",
    "decided",
    "adjourned",
];

/// Minimum number of distinct keyword hits before a specific label is chosen.
pub const MIN_KEYWORD_HITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Resume,
    Meeting,
    General,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::Meeting => "meeting",
            DocumentKind::General => "general",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn count_hits(haystack: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| haystack.contains(*k)).count()
}

/// Guess what kind of document `text` is.
///
/// Each vocabulary scores the number of its distinct keywords found anywhere in the
/// lowercased text. A label wins only with a strictly higher score that also reaches
/// [`MIN_KEYWORD_HITS`]; ties and weak signals fall back to `General`.
pub fn classify(text: &str) -> DocumentKind {
    let lowered = text.to_lowercase();
    let resume = count_hits(&lowered, RESUME_KEYWORDS);
    let meeting = count_hits(&lowered, MEETING_KEYWORDS);

    tracing::debug!(resume, meeting, "keyword hits");

    if resume > meeting && resume >= MIN_KEYWORD_HITS {
        DocumentKind::Resume
    } else if meeting > resume && meeting >= MIN_KEYWORD_HITS {
        DocumentKind::Meeting
    } else {
        DocumentKind::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabularies_are_disjoint() {
        for k in RESUME_KEYWORDS {
            assert!(!MEETING_KEYWORDS.contains(k), "{k} is in both lists");
        }
    }

    #[test]
    fn resume_with_four_hits() {
        let text = "Experience: five years at Acme. Skills: Rust, SQL. \
                    Education: BSc. Certifications: AWS.";
        assert_eq!(classify(text), DocumentKind::Resume);
    }

    #[test]
    fn meeting_transcript() {
        let text = "Agenda for today. Participants: Ana, Bo. Minutes taken by Cy.";
        assert_eq!(classify(text), DocumentKind::Meeting);
    }

    #[test]
    fn below_threshold_is_general() {
        assert_eq!(classify("My skills and experience."), DocumentKind::General);
        assert_eq!(classify("Short note."), DocumentKind::General);
        assert_eq!(classify(""), DocumentKind::General);
    }

    #[test]
    fn tie_is_general() {
        let text = "experience skills education agenda participants minutes";
        assert_eq!(classify(text), DocumentKind::General);
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let text = "agenda agenda agenda agenda";
        assert_eq!(classify(text), DocumentKind::General);
    }

    #[test]
    fn case_insensitive_and_deterministic() {
        let text = "AGENDA, PARTICIPANTS, MINUTES and a TRANSCRIPT";
        let first = classify(text);
        assert_eq!(first, DocumentKind::Meeting);
        assert_eq!(classify(text), first);
    }
}
