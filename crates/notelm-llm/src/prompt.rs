//! Prompt assembly for source-grounded chat
//!
//! When a request carries retrieved source text, the question is wrapped in
//! a numbered-source prompt and paired with a research-assistant system
//! instruction that enforces `[1]`-style citations. Requests without context
//! pass through untouched.

/// System instruction applied to source-grounded requests
pub const RESEARCH_SYSTEM_INSTRUCTION: &str = "You are a helpful research assistant. Answer questions based on the provided sources.
Always cite your sources using [1], [2], etc. notation when referencing specific information.
If the information is not in the sources, say so clearly.
Be concise but thorough.";

/// Build the system instruction, prepending persona text when present
#[must_use]
pub fn system_instruction(persona: Option<&str>) -> String {
    match persona {
        Some(persona) if !persona.trim().is_empty() => {
            format!("{persona}\n\n{RESEARCH_SYSTEM_INSTRUCTION}")
        }
        _ => RESEARCH_SYSTEM_INSTRUCTION.to_string(),
    }
}

/// Wrap a user question with source material and citation scaffolding
///
/// `source_names` become numbered `[i] Source: name` lines so the model can
/// cite them; an empty slice leaves the numbering out but keeps the frame.
#[must_use]
pub fn with_sources(message: &str, context: &str, source_names: &[String]) -> String {
    let mut source_context = String::new();
    for (i, name) in source_names.iter().enumerate() {
        source_context.push_str(&format!("[{}] Source: {}\n", i + 1, name));
    }
    format!(
        "Sources:\n{context}\n\n{source_context}\n\nUser Question: {message}\n\nProvide a well-cited response:"
    )
}
