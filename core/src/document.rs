use crate::error::SearchError;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentStatus::Actual => "ACTUAL",
            DocumentStatus::Irrelevant => "IRRELEVANT",
            DocumentStatus::Banned => "BANNED",
            DocumentStatus::Removed => "REMOVED",
        };
        f.write_str(name)
    }
}

impl FromStr for DocumentStatus {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "actual" => Ok(DocumentStatus::Actual),
            "irrelevant" => Ok(DocumentStatus::Irrelevant),
            "banned" => Ok(DocumentStatus::Banned),
            "removed" => Ok(DocumentStatus::Removed),
            _ => Err(SearchError::InvalidArgument(format!("unknown document status {s:?}"))),
        }
    }
}

/// One ranked search hit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub relevance: f64,
    pub rating: i32,
}

impl Document {
    pub fn new(id: DocId, relevance: f64, rating: i32) -> Self {
        Self { id, relevance, rating }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}

/// Truncating arithmetic mean; 0 for no ratings.
pub fn compute_average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    // The mean of i32 values always fits in i32.
    (sum / ratings.len() as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rating_truncates_toward_zero() {
        assert_eq!(compute_average_rating(&[]), 0);
        assert_eq!(compute_average_rating(&[1, 2, 3, 4, 5]), 3);
        assert_eq!(compute_average_rating(&[9, 1]), 5);
        assert_eq!(compute_average_rating(&[0, 0, 4]), 1);
        assert_eq!(compute_average_rating(&[-7, 2]), -2);
    }

    #[test]
    fn average_rating_does_not_overflow() {
        assert_eq!(compute_average_rating(&[i32::MAX, i32::MAX]), i32::MAX);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("BANNED".parse::<DocumentStatus>().unwrap(), DocumentStatus::Banned);
        assert_eq!("actual".parse::<DocumentStatus>().unwrap(), DocumentStatus::Actual);
        assert!("gone".parse::<DocumentStatus>().is_err());
    }

    #[test]
    fn document_display() {
        let doc = Document::new(4, 0.5, 2);
        assert_eq!(doc.to_string(), "{ document_id = 4, relevance = 0.5, rating = 2 }");
    }

    #[test]
    fn document_json_shape() {
        let json = serde_json::to_value(Document::new(1, 0.25, 3)).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["rating"], 3);
        let status: DocumentStatus = serde_json::from_str("\"irrelevant\"").unwrap();
        assert_eq!(status, DocumentStatus::Irrelevant);
    }
}
