//! Parsing of model-produced issue classifications.
//!
//! Models are asked for a strict JSON array but often wrap it in prose or
//! code fences, so the first `[...]` span is accepted as well. Each entry is
//! read leniently: a missing or out-of-range score is clamped instead of
//! rejected.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

const MAX_TOPICS: usize = 5;
const MAX_SUMMARY_CHARS: usize = 100;
const DEFAULT_SCORE: u8 = 2;

static ARRAY_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("array span pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Map a 1..=3 score; anything else is medium.
    pub fn from_score(score: u8) -> Self {
        match score {
            1 => Difficulty::Easy,
            3 => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueAnalysis {
    pub difficulty: Difficulty,
    pub difficulty_score: u8,
    pub topics: Vec<String>,
    pub summary: String,
}

impl IssueAnalysis {
    /// Used when no text generation credentials are configured.
    pub fn unavailable() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            difficulty_score: DEFAULT_SCORE,
            topics: vec!["general".to_string()],
            summary: "AI classification unavailable".to_string(),
        }
    }

    /// Used when generation or parsing failed.
    pub fn failed() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            difficulty_score: DEFAULT_SCORE,
            topics: Vec::new(),
            summary: "AI analysis unavailable".to_string(),
        }
    }

    fn from_entry(entry: &Value) -> Self {
        let score = clamp_score(&entry["difficulty_score"]);
        let summary = entry["rationale"]
            .as_str()
            .filter(|s| !s.is_empty())
            .unwrap_or("unknown")
            .chars()
            .take(MAX_SUMMARY_CHARS)
            .collect();

        Self {
            difficulty: Difficulty::from_score(score),
            difficulty_score: score,
            topics: clean_topics(&entry["topics"]),
            summary,
        }
    }
}

/// One parsed entry; `number` is the issue number the model echoed back, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub number: Option<u64>,
    pub analysis: IssueAnalysis,
}

/// Parse a model response into classifications, in response order.
pub fn parse_classifications(text: &str) -> AppResult<Vec<Classification>> {
    let entries = match serde_json::from_str::<Vec<Value>>(text.trim()) {
        Ok(entries) => entries,
        Err(_) => {
            let span = ARRAY_SPAN
                .find(text)
                .ok_or_else(|| malformed("no JSON array in response"))?;
            serde_json::from_str::<Vec<Value>>(span.as_str())
                .map_err(|e| malformed(format!("invalid JSON array: {}", e)))?
        }
    };

    Ok(entries
        .iter()
        .map(|entry| Classification {
            number: entry["number"].as_u64(),
            analysis: IssueAnalysis::from_entry(entry),
        })
        .collect())
}

fn malformed(message: impl Into<String>) -> AppError {
    AppError::ExternalApi {
        service: "openai".into(),
        message: message.into(),
        source: None,
    }
}

/// Zero and missing both mean "no opinion".
fn clamp_score(value: &Value) -> u8 {
    let score = value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.round() as i64))
        .unwrap_or(0);

    if score == 0 {
        DEFAULT_SCORE
    } else {
        score.clamp(1, 3) as u8
    }
}

fn clean_topics(value: &Value) -> Vec<String> {
    let Some(topics) = value.as_array() else {
        return vec!["general".to_string()];
    };

    topics
        .iter()
        .filter_map(Value::as_str)
        .map(|topic| {
            topic
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|topic| !topic.is_empty())
        .take(MAX_TOPICS)
        .collect()
}
