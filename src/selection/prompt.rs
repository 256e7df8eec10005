use std::fmt::Write;

use crate::cache::PrefilterResult;
use crate::similarity::ChapterCandidate;

/// Renders model prompts from a prefilter result.
///
/// Output depends only on the input, so equal results hash to the same prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Asks the model which candidates are worth citing.
    pub fn selection_prompt(&self, result: &PrefilterResult) -> String {
        let mut prompt = self.header(result);
        prompt.push_str(
            "Decide which of the candidate chapters below a reader of the source chapter \
             should consult.\n\n",
        );
        self.candidates(&mut prompt, &result.candidates);
        prompt.push_str(
            "Respond with JSON only: {\"selected\": [{\"candidate\": <number>, \"reason\": \"...\"}]}\n",
        );
        prompt
    }

    /// Asks the model for citations and annotations for the source chapter.
    pub fn annotation_prompt(&self, result: &PrefilterResult) -> String {
        let mut prompt = self.header(result);
        prompt.push_str(
            "Using the companion chapters below, write cross-reference citations and short \
             annotations that connect them to the source chapter.\n\n",
        );
        self.candidates(&mut prompt, &result.candidates);
        prompt.push_str(
            "Respond with JSON only: {\"annotations\": [{\"book\": \"...\", \"chapter\": <number>, \
             \"citation\": \"...\", \"annotation\": \"...\"}]}\n",
        );
        prompt
    }

    fn header(&self, result: &PrefilterResult) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "# Source chapter {}: {}",
            result.source_chapter_number, result.source_chapter_title
        );
        out.push('\n');
        if !result.summary.is_empty() {
            let _ = writeln!(out, "Summary: {}", result.summary);
        }
        if !result.keywords.is_empty() {
            let _ = writeln!(out, "Keywords: {}", result.keywords.join(", "));
        }
        if !result.concepts.is_empty() {
            let _ = writeln!(out, "Concepts: {}", result.concepts.join(", "));
        }
        out.push('\n');
        out
    }

    fn candidates(&self, out: &mut String, candidates: &[ChapterCandidate]) {
        if candidates.is_empty() {
            out.push_str("(no candidate chapters)\n\n");
            return;
        }
        for (idx, c) in candidates.iter().enumerate() {
            let _ = writeln!(
                out,
                "## Candidate {}: {}, chapter {} ({})",
                idx + 1,
                c.book_name,
                c.chapter_number,
                c.chapter_title
            );
            let _ = writeln!(out, "Similarity: {:.3}", c.similarity_score);
            if !c.matched_keywords.is_empty() {
                let _ = writeln!(out, "Matched keywords: {}", c.matched_keywords.join(", "));
            }
            if !c.matched_concepts.is_empty() {
                let _ = writeln!(out, "Matched concepts: {}", c.matched_concepts.join(", "));
            }
            let _ = writeln!(out, "Excerpt: {}", c.excerpt);
            out.push('\n');
        }
    }
}
