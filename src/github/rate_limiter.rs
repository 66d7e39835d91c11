use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};
use reqwest::Response;

/// Remaining-call count below which we wait for the quota window to reset
/// before issuing more requests.
const SAFETY_THRESHOLD: u32 = 10;

pub struct RateLimiter {
    state: Arc<Mutex<RateLimitState>>,
}

struct RateLimitState {
    remaining: u32,
    reset_at: Option<std::time::Instant>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimitState {
                remaining: 5000,
                reset_at: None,
            })),
        }
    }

    /// Blocks until the quota window resets if the remaining call budget has
    /// dropped below the safety threshold. This is the only wait in the
    /// system; failed calls are never retried.
    pub async fn wait(&self) {
        let mut state = self.state.lock().await;

        if state.remaining <= SAFETY_THRESHOLD {
            if let Some(reset_at) = state.reset_at {
                let now = std::time::Instant::now();
                if reset_at > now {
                    let wait_duration = reset_at - now;
                    drop(state);
                    tracing::info!("Rate limit low, waiting {:?} for reset", wait_duration);
                    sleep(wait_duration).await;
                    state = self.state.lock().await;
                    state.remaining = 5000;
                    state.reset_at = None;
                }
            }
        }
    }

    pub fn update_from_response(&self, response: &Response) {
        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
        {
            let state = self.state.clone();
            let reset = response
                .headers()
                .get("x-ratelimit-reset")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());

            tokio::spawn(async move {
                let mut state = state.lock().await;
                state.remaining = remaining;
                if let Some(reset_timestamp) = reset {
                    let now = std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .map(|d| d.as_secs())
                        .unwrap_or(0);
                    if reset_timestamp > now {
                        let wait_secs = reset_timestamp - now;
                        state.reset_at =
                            Some(std::time::Instant::now() + Duration::from_secs(wait_secs));
                    }
                }
            });
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
