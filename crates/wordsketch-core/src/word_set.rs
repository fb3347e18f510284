//! Word lists children draw from.
//!
//! Teachers upload a list either as CSV with a `word` column (and an optional
//! `image` column) or as plain text with one word per line.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Word list import errors.
#[derive(Debug, Error)]
pub enum WordListError {
    #[error("Failed to parse CSV word list: {0}")]
    Csv(#[from] csv::Error),
}

/// One word of a word set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordItem {
    pub word: String,
    /// Optional hint picture shown on request.
    #[serde(default, alias = "image", skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Position within the set. Also serves as the word id for submissions.
    pub order: u32,
}

impl WordItem {
    pub fn new(word: impl Into<String>, order: u32) -> Self {
        Self {
            word: word.into(),
            hint: None,
            order,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Id used for submissions and saved progress.
    pub fn id(&self) -> u32 {
        self.order
    }
}

/// A week's word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSet {
    pub id: u64,
    pub title: String,
    pub items: Vec<WordItem>,
}

impl WordSet {
    /// Create a word set with its items sorted by `order`.
    pub fn new(id: u64, title: impl Into<String>, items: Vec<WordItem>) -> Self {
        let mut set = Self {
            id,
            title: title.into(),
            items,
        };
        set.sort_items();
        set
    }

    /// Sort items by `order`, keeping the input order for ties.
    pub fn sort_items(&mut self) {
        self.items.sort_by_key(|item| item.order);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WordItem> {
        self.items.get(index)
    }

    /// Build a set from an uploaded file, picking the format by extension.
    pub fn import(
        id: u64,
        title: impl Into<String>,
        file_name: &str,
        content: &str,
    ) -> Result<Self, WordListError> {
        if file_name.ends_with(".csv") {
            Self::from_csv(id, title, content)
        } else {
            Ok(Self::from_text(id, title, content))
        }
    }

    /// Parse a CSV list with a header row.
    ///
    /// Words come from the `word` or `Word` column and hints from `image` or
    /// `Image`. Rows without a word are dropped, but each row keeps the
    /// `order` of its position in the file. Every row must have as many
    /// fields as the header.
    pub fn from_csv(
        id: u64,
        title: impl Into<String>,
        content: &str,
    ) -> Result<Self, WordListError> {
        let content = content.trim_start_matches('\u{feff}');
        let mut reader = csv::Reader::from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        let columns = |names: [&str; 2]| -> Vec<usize> {
            names
                .iter()
                .filter_map(|name| headers.iter().position(|header| header.trim() == *name))
                .collect()
        };
        let word_columns = columns(["word", "Word"]);
        let image_columns = columns(["image", "Image"]);

        let mut items = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let first_filled = |columns: &[usize]| {
                columns
                    .iter()
                    .filter_map(|&column| record.get(column))
                    .map(str::trim)
                    .find(|value| !value.is_empty())
                    .map(str::to_string)
            };
            let Some(word) = first_filled(&word_columns) else {
                continue;
            };
            let mut item = WordItem::new(word, index as u32 + 1);
            if let Some(image) = first_filled(&image_columns) {
                item = item.with_hint(image);
            }
            items.push(item);
        }

        log::debug!("Parsed {} words from CSV", items.len());
        Ok(Self::new(id, title, items))
    }

    /// Parse a plain list, one word per line. Blank lines are skipped.
    pub fn from_text(id: u64, title: impl Into<String>, content: &str) -> Self {
        let items = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, word)| WordItem::new(word, index as u32 + 1))
            .collect();
        Self::new(id, title, items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_sorted_by_order() {
        let set = WordSet::new(
            1,
            "Week 1",
            vec![WordItem::new("dog", 2), WordItem::new("cat", 1)],
        );
        assert_eq!(set.get(0).map(|item| item.word.as_str()), Some("cat"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_image_alias() {
        let json = r#"{"id": 3, "title": "Animals", "items": [{"word": "cat", "image": "cat.png", "order": 1}]}"#;
        let set: WordSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.items[0].hint.as_deref(), Some("cat.png"));
        assert_eq!(set.items[0].id(), 1);
    }

    fn words(set: &WordSet) -> Vec<(&str, u32)> {
        set.items
            .iter()
            .map(|item| (item.word.as_str(), item.order))
            .collect()
    }

    #[test]
    fn test_text_list() {
        let set = WordSet::from_text(4, "Week 4", "cat\r\n\n  dog \n\nsun\n");
        assert_eq!(set.title, "Week 4");
        assert_eq!(words(&set), vec![("cat", 1), ("dog", 2), ("sun", 3)]);
        assert!(set.items.iter().all(|item| item.hint.is_none()));
    }

    #[test]
    fn test_csv_list() {
        let csv = "word,image\ncat,cat.png\n,orphan.png\ndog,\nsun,sun.png\n";
        let set = WordSet::from_csv(5, "Week 5", csv).unwrap();

        // the blank row still uses up position 2
        assert_eq!(words(&set), vec![("cat", 1), ("dog", 3), ("sun", 4)]);
        assert_eq!(set.items[0].hint.as_deref(), Some("cat.png"));
        assert!(set.items[1].hint.is_none());
    }

    #[test]
    fn test_csv_capitalized_headers() {
        let csv = "Word,Image,Notes\nTree,tree.png,green\nBird,,\n";
        let set = WordSet::from_csv(6, "Week 6", csv).unwrap();
        assert_eq!(words(&set), vec![("Tree", 1), ("Bird", 2)]);
        assert_eq!(set.items[0].hint.as_deref(), Some("tree.png"));
    }

    #[test]
    fn test_csv_without_word_column() {
        let set = WordSet::from_csv(7, "Week 7", "name\ncat\n").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_csv_ragged_row() {
        let result = WordSet::from_csv(8, "Broken", "word,image\ncat,cat.png,extra\n");
        assert!(matches!(result, Err(WordListError::Csv(_))));
    }

    #[test]
    fn test_import_by_extension() {
        let content = "word\ncat\ndog\n";
        let csv = WordSet::import(1, "Week 1", "list.csv", content).unwrap();
        assert_eq!(words(&csv), vec![("cat", 1), ("dog", 2)]);

        // read as text, the header is just another word
        let text = WordSet::import(1, "Week 1", "list.txt", content).unwrap();
        assert_eq!(words(&text), vec![("word", 1), ("cat", 2), ("dog", 3)]);
    }

    #[test]
    fn test_missing_hint() {
        let json = r#"{"word": "sun", "order": 4}"#;
        let item: WordItem = serde_json::from_str(json).unwrap();
        assert!(item.hint.is_none());
        assert!(!serde_json::to_string(&item).unwrap().contains("hint"));
    }
}
