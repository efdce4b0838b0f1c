//! Domain classifier port

use arena_domain::TaskCategory;

/// Maps a prompt to one of the fixed task categories
pub trait DomainClassifier: Send + Sync {
    fn classify(&self, prompt: &str) -> TaskCategory;
}
