mod classification;
mod client;
mod provider;

pub use classification::{Classification, Difficulty, IssueAnalysis, parse_classifications};
pub use client::OpenAiClient;
pub use provider::TextGenerator;
