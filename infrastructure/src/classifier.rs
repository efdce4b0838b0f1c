//! Keyword-based task classifier

use arena_application::ports::classifier::DomainClassifier;
use arena_domain::TaskCategory;

const CODING: &[&str] = &[
    "code", "function", "bug", "compile", "refactor", "implement", "rust", "python",
    "javascript", "typescript", "sql", "api", "regex", "unit test", "stack trace", "algorithm",
];
const MATH: &[&str] = &[
    "prove", "proof", "equation", "integral", "derivative", "solve", "theorem", "probability",
    "calculate", "compute", "matrix", "prime", "sum of",
];
const RESEARCH: &[&str] = &[
    "research", "compare", "survey", "sources", "literature", "evidence", "study", "history of",
    "pros and cons", "summarize", "explain why", "analysis",
];
const CREATIVE: &[&str] = &[
    "story", "poem", "write a", "slogan", "lyrics", "fiction", "character", "tagline", "haiku",
    "creative", "brainstorm", "name ideas",
];

/// Picks the category whose keywords appear most often in the prompt.
///
/// Ties go to the earlier category in Coding, Math, Research, Creative
/// order; a prompt with no keyword at all is General.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    fn hits(text: &str, keywords: &[&str]) -> usize {
        keywords.iter().filter(|k| text.contains(*k)).count()
    }
}

impl DomainClassifier for KeywordClassifier {
    fn classify(&self, prompt: &str) -> TaskCategory {
        let lower = prompt.to_lowercase();
        let candidates = [
            (TaskCategory::Coding, Self::hits(&lower, CODING)),
            (TaskCategory::Math, Self::hits(&lower, MATH)),
            (TaskCategory::Research, Self::hits(&lower, RESEARCH)),
            (TaskCategory::Creative, Self::hits(&lower, CREATIVE)),
        ];

        let mut best = (TaskCategory::General, 0);
        for (category, hits) in candidates {
            if hits > best.1 {
                best = (category, hits);
            }
        }
        best.0
    }
}
