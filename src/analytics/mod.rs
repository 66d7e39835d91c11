pub mod aggregate;
pub mod analyzer;
pub mod health;

pub use analyzer::RepositoryAnalyzer;
pub use health::{health_score, health_status, HealthInputs};
