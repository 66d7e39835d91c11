pub mod handlers;
pub mod router;
pub mod signature;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::classify::LabelBot;
use crate::config::Config;
use crate::github::RepoHost;
use crate::models::report::AnalyticsReport;

pub use router::app_router;

/// Time-boxed comprehensive-report cache, keyed by repository name. Sits at
/// the serving boundary only; the analytics core itself never caches.
pub struct ReportCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, AnalyticsReport)>>,
}

impl ReportCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get(&self, repo: &str) -> Option<AnalyticsReport> {
        let entries = self.entries.lock().await;
        entries
            .get(repo)
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, report)| report.clone())
    }

    pub async fn put(&self, repo: String, report: AnalyticsReport) {
        self.entries.lock().await.insert(repo, (Instant::now(), report));
    }
}

pub struct AppState {
    pub config: Config,
    pub host: Arc<dyn RepoHost>,
    pub bot: LabelBot,
    pub report_cache: ReportCache,
}

impl AppState {
    pub fn new(config: Config, host: Arc<dyn RepoHost>) -> Self {
        let report_cache = ReportCache::new(Duration::from_secs(config.cache_ttl_secs));
        Self {
            bot: LabelBot::new(host.clone()),
            config,
            host,
            report_cache,
        }
    }
}
