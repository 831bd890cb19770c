//! Static FAQ table with keyword substring matching.
//!
//! The table is loaded once at startup from a JSON object mapping lowercase
//! keywords/phrases to canned answers, and is immutable thereafter. Lookup
//! order is the document order of the data file (`serde_json` is built with
//! `preserve_order`), so the first matching entry wins deterministically.

use relay_common::{Error, Result};
use std::path::Path;

/// Immutable keyword → answer table consulted before the upstream model.
#[derive(Debug, Clone)]
pub struct FaqTable {
    entries: Vec<(String, String)>,
}

impl FaqTable {
    /// Load the table from a JSON file.
    ///
    /// A missing or malformed file is a fatal `Error::Config`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read FAQ data from {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    /// Parse the table from a JSON object string.
    pub fn from_json(content: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Malformed FAQ data: {}", e)))?;

        let mut entries = Vec::with_capacity(map.len());
        for (keyword, answer) in map {
            let answer = answer.as_str().ok_or_else(|| {
                Error::Config(format!("FAQ answer for {:?} is not a string", keyword))
            })?;
            entries.push((keyword.to_lowercase(), answer.to_string()));
        }

        Ok(Self { entries })
    }

    /// Find the canned answer for a message, if any keyword matches.
    ///
    /// The message is lowercased and each keyword is checked as a substring,
    /// in load order. Returns the first match.
    pub fn lookup(&self, message: &str) -> Option<&str> {
        let msg = message.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| msg.contains(keyword.as_str()))
            .map(|(_, answer)| answer.as_str())
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn table() -> FaqTable {
        FaqTable::from_json(
            r#"{
                "duration": "The program runs for 12 weeks.",
                "certificate": "Yes, a certificate is issued on completion.",
                "cert": "Short-form certificate answer."
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_substring_hit() {
        let faq = table();
        assert_eq!(
            faq.lookup("what is the duration of the program"),
            Some("The program runs for 12 weeks.")
        );
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let faq = table();
        assert_eq!(
            faq.lookup("DURATION please?"),
            Some("The program runs for 12 weeks.")
        );
    }

    #[test]
    fn test_lookup_miss() {
        let faq = table();
        assert_eq!(faq.lookup("tell me about the mentors"), None);
    }

    #[test]
    fn test_lookup_first_match_in_load_order() {
        // "certificate" contains "cert"; both keys match the message below.
        // "certificate" appears first in the document, so it wins.
        let faq = table();
        assert_eq!(
            faq.lookup("do I get a certificate"),
            Some("Yes, a certificate is issued on completion.")
        );
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = FaqTable::load(Path::new("/nonexistent/faq.json")).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_load_malformed_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2, 3]").unwrap();

        let err = FaqTable::load(file.path()).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_non_string_answer_rejected() {
        let err = FaqTable::from_json(r#"{"duration": 42}"#).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_empty_table() {
        let faq = FaqTable::from_json("{}").unwrap();
        assert!(faq.is_empty());
        assert_eq!(faq.lookup("anything"), None);
    }
}
