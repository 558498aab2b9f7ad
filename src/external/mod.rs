pub mod ai;
pub mod client;
pub mod github;
