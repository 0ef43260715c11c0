pub const INDEX_FILE_NAME: &str = "papers_info.json";
pub const DEFAULT_PAPERS_DIR: &str = "papers";
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Derives the partition key for a raw topic string.
///
/// The key is lowercased and every whitespace or path separator becomes `_`,
/// so `"Quantum Computing"` and `"quantum computing"` share `quantum_computing`.
#[must_use]
pub fn make_topic_key(topic: &str) -> String {
    topic
        .chars()
        .flat_map(char::to_lowercase)
        .map(|ch| {
            if ch.is_whitespace() || ch == '/' || ch == '\\' {
                '_'
            } else {
                ch
            }
        })
        .collect()
}

/// Returns true when a topic key can be used as a directory under the store root.
#[must_use]
pub fn is_valid_topic_key(topic_key: &str) -> bool {
    !topic_key.is_empty() && topic_key != "." && topic_key != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_key_folds_case_and_spaces() {
        assert_eq!(make_topic_key("Quantum Computing"), "quantum_computing");
        assert_eq!(make_topic_key("ai"), make_topic_key("Ai"));
        assert_eq!(make_topic_key("graph\tneural nets"), "graph_neural_nets");
    }

    #[test]
    fn topic_key_keeps_surrounding_whitespace() {
        assert_eq!(make_topic_key(" ai"), "_ai");
        assert_ne!(make_topic_key(" ai"), make_topic_key("ai"));
    }

    #[test]
    fn topic_key_cannot_escape_root() {
        assert_eq!(make_topic_key("../etc/passwd"), ".._etc_passwd");
        assert!(!is_valid_topic_key(&make_topic_key("..")));
        assert!(!is_valid_topic_key(&make_topic_key("")));
    }
}
