// Prompt constants for the screening classifiers.
// Each service that needs LLM calls defines its prompts alongside it.

/// System prompt shared by both classifier stages.
pub const LABEL_ONLY_SYSTEM: &str = "You are a precise resume screener. \
    You MUST answer with exactly one of the allowed labels and nothing else. \
    Do NOT explain your choice. Do NOT add punctuation or formatting.";

/// Retrieval query for the experience classifier.
pub const EXPERIENCE_QUERY: &str = "Categorize overall experience level";

/// Retrieval query for the skill classifier.
pub const SKILL_QUERY: &str = "Assess candidate against the JD";

pub const EXPERIENCE_PROMPT_TEMPLATE: &str = "Resume context:\n{context}\n\n\
    Question: Categorize this candidate's overall experience level.\n\
    Answer *only* with exactly one of: Entry-level, Mid-level, Senior-level.";

pub const SKILL_PROMPT_TEMPLATE: &str = "Job Description:\n{jd}\n\n\
    Resume Context:\n{context}\n\n\
    Question: Does this candidate match the above job description?\n\
    Answer *only* with exactly one of: Match or No Match.";
