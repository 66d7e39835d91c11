pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod taxonomy;
pub mod classify;
pub mod analytics;
pub mod server;

pub use config::Config;
pub use error::{Error, Result};
pub use github::{GitHubClient, RepoHost};
pub use classify::{Classification, IssueClassifier, LabelBot};
pub use analytics::RepositoryAnalyzer;
