//! Prompt construction for commit message generation.

use crate::config::Style;
use crate::git::FileDiff;

/// Hard limit for the summary line, as requested from the model.
pub const SUMMARY_LINE_LIMIT: usize = 72;

/// Build the generation prompt from per-file staged diffs.
///
/// Pure and deterministic: the same diffs, language and style always give
/// byte-identical output. Segments are separated by a blank line; diff text
/// is included verbatim and untruncated.
pub fn build_prompt(diffs: &[FileDiff], language: &str, style: Style) -> String {
    let mut segments = Vec::with_capacity(diffs.len() + 2);

    segments.push(format!(
        r#"Write a concise Git commit message in {language} for the changes below.
- Start with a single summary line of at most {SUMMARY_LINE_LIMIT} characters.
- If the change needs more explanation, add a blank line followed by a short bullet-point list.
- Output only the commit message itself: no Markdown, no code fences, no headings, no surrounding quotes.
- Write the entire message in {language}."#
    ));

    if style.is_playful() {
        let tone = match style {
            Style::Sarcastic => "a dry, lightly sarcastic",
            _ => "a lightly humorous",
        };
        segments.push(format!(
            r#"Use {tone} tone, but keep it restrained: at most one playful remark.
The message must stay technically accurate and describe what actually changed.
Do not use meme language, emojis, slang or in-jokes."#
        ));
    }

    for diff in diffs {
        segments.push(format!("File: {}\nChanges:\n{}", diff.path, diff.text));
    }

    segments.join("\n\n")
}
