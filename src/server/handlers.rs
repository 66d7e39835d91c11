use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::analytics::RepositoryAnalyzer;
use crate::classify::{IssueEvent, PullRequestEvent};
use crate::server::signature::verify_signature;
use crate::server::AppState;

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn json_message(message: String) -> Response {
    (StatusCode::OK, Json(json!({ "message": message }))).into_response()
}

pub async fn home_handler() -> Response {
    Json(json!({
        "service": "Smart Repository Assistant",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "webhook": "POST /webhook",
            "health": "GET /health",
            "analytics": "GET /analytics",
            "analyze_issue": "POST /analyze-issue",
            "stats": "GET /stats"
        }
    }))
    .into_response()
}

/// GitHub webhook endpoint. Signature mismatch is 401, malformed JSON 400,
/// processing failure 500; unhandled event types are acknowledged with 200.
pub async fn webhook_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get("X-Hub-Signature-256")
        .and_then(|v| v.to_str().ok());

    if !verify_signature(state.config.webhook_secret.as_deref(), &body, signature) {
        tracing::warn!("Invalid webhook signature");
        return json_error(StatusCode::UNAUTHORIZED, "Invalid signature");
    }

    let event_type = headers
        .get("X-GitHub-Event")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "Invalid payload"),
    };

    tracing::info!("Received {} event", event_type);

    match event_type.as_str() {
        "issues" => {
            let event: IssueEvent = match serde_json::from_value(payload) {
                Ok(event) => event,
                Err(_) => return json_error(StatusCode::BAD_REQUEST, "Invalid payload"),
            };
            match state.bot.process_issue_event(&event).await {
                Ok(()) => json_message("Issue processed successfully".to_string()),
                Err(err) => {
                    tracing::error!("Webhook processing error: {}", err);
                    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            }
        }
        "pull_request" => {
            let event: PullRequestEvent = match serde_json::from_value(payload) {
                Ok(event) => event,
                Err(_) => return json_error(StatusCode::BAD_REQUEST, "Invalid payload"),
            };
            match state.bot.process_pull_event(&event).await {
                Ok(()) => json_message("Pull request processed successfully".to_string()),
                Err(err) => {
                    tracing::error!("Webhook processing error: {}", err);
                    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            }
        }
        "ping" => json_message("Webhook is working!".to_string()),
        other => {
            tracing::info!("Unhandled event type: {}", other);
            json_message(format!("Event {} received but not processed", other))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RepoQuery {
    pub repo: Option<String>,
}

pub async fn health_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RepoQuery>,
) -> Response {
    let repo = query.repo.unwrap_or_else(|| state.config.default_repo.clone());
    let analyzer = RepositoryAnalyzer::new(state.host.clone(), repo);
    let report = analyzer.health_report().await;
    Json(report).into_response()
}

pub async fn analytics_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RepoQuery>,
) -> Response {
    let repo = query.repo.unwrap_or_else(|| state.config.default_repo.clone());
    analytics_response(&state, repo).await
}

pub async fn analytics_repo_handler(
    State(state): State<Arc<AppState>>,
    Path(repo): Path<String>,
) -> Response {
    analytics_response(&state, repo).await
}

async fn analytics_response(state: &AppState, repo: String) -> Response {
    let report = match state.report_cache.get(&repo).await {
        Some(report) => {
            tracing::debug!("Serving cached report for {}", repo);
            report
        }
        None => {
            let analyzer = RepositoryAnalyzer::new(state.host.clone(), repo.clone());
            let report = analyzer.comprehensive_report().await;
            state.report_cache.put(repo.clone(), report.clone()).await;
            report
        }
    };

    let mut body = match serde_json::to_value(&report) {
        Ok(Value::Object(map)) => map,
        _ => return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    };

    body.insert("api_version".to_string(), json!("1.0"));
    body.insert(
        "endpoints".to_string(),
        json!({
            "webhook": "/webhook",
            "health": "/health",
            "analytics": "/analytics"
        }),
    );

    Json(Value::Object(body)).into_response()
}

/// Manual classification: synthesizes an `opened` issue event and drives the
/// same pipeline the webhook uses.
pub async fn analyze_issue_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Response {
    let Ok(data) = serde_json::from_slice::<Value>(&body) else {
        return json_error(StatusCode::BAD_REQUEST, "No data provided");
    };

    let Some(repo_name) = data
        .get("repo_name")
        .and_then(Value::as_str)
        .map(str::to_string)
    else {
        return json_error(StatusCode::BAD_REQUEST, "Missing required field: repo_name");
    };
    let Some(issue_number) = data.get("issue_number").and_then(Value::as_u64) else {
        return json_error(StatusCode::BAD_REQUEST, "Missing required field: issue_number");
    };

    let event = IssueEvent {
        action: "opened".to_string(),
        issue: crate::classify::EventTarget {
            number: issue_number,
        },
        repository: crate::classify::EventRepository {
            full_name: repo_name.clone(),
        },
    };

    match state.bot.process_issue_event(&event).await {
        Ok(()) => Json(json!({
            "message": "Issue analyzed successfully",
            "repo": repo_name,
            "issue": issue_number
        }))
        .into_response(),
        Err(err) => {
            tracing::error!("Manual analysis error: {}", err);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub repos: Option<String>,
}

/// Mini health summary for up to five repositories. Per-repo failures are
/// captured in that repo's entry rather than failing the whole response.
pub async fn quick_stats_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatsQuery>,
) -> Response {
    let repos = query.repos.unwrap_or_else(|| state.config.default_repo.clone());
    let mut stats = serde_json::Map::new();

    for repo_name in repos.split(',').take(5) {
        let repo_name = repo_name.trim();
        if repo_name.is_empty() {
            continue;
        }

        match state.host.get_repo(repo_name).await {
            Ok(repo) => {
                let analyzer = RepositoryAnalyzer::new(state.host.clone(), repo_name);
                let report = analyzer.health_report().await;
                stats.insert(
                    repo_name.to_string(),
                    json!({
                        "health_score": report.health_score,
                        "stars": repo.stargazers_count,
                        "forks": repo.forks_count,
                        "open_issues": repo.open_issues_count,
                        "language": repo.language.unwrap_or_else(|| "Unknown".to_string())
                    }),
                );
            }
            Err(err) => {
                stats.insert(repo_name.to_string(), json!({ "error": err.to_string() }));
            }
        }
    }

    Json(Value::Object(stats)).into_response()
}

pub async fn not_found_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "Endpoint not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::github::host::fake::FakeHost;
    use crate::models::report::AnalyticsReport;
    use crate::models::{Issue, Repository};
    use crate::server::signature::sign;
    use axum::http::HeaderValue;
    use chrono::Utc;

    async fn read_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn test_state(secret: Option<&str>) -> (Arc<AppState>, Arc<FakeHost>) {
        let host = Arc::new(FakeHost::default());
        let config = Config {
            github_token: "test-token".to_string(),
            webhook_secret: secret.map(str::to_string),
            default_repo: "owner/repo".to_string(),
            bind_host: "127.0.0.1".to_string(),
            bind_port: 0,
            cache_ttl_secs: 3600,
        };
        (Arc::new(AppState::new(config, host.clone())), host)
    }

    fn seed_issue(host: &FakeHost, number: u64) {
        host.issues.lock().unwrap().insert(
            ("owner/repo".to_string(), number),
            Issue {
                number,
                title: "Bug: crash".to_string(),
                body: Some("it crashes on click".to_string()),
                state: "open".to_string(),
                created_at: Utc::now(),
                closed_at: None,
                user: None,
                labels: Vec::new(),
            },
        );
    }

    fn seed_repo(host: &FakeHost, full_name: &str) {
        let (_, name) = full_name.split_once('/').unwrap();
        host.repos.lock().unwrap().insert(
            full_name.to_string(),
            Repository {
                name: name.to_string(),
                full_name: full_name.to_string(),
                description: Some("a test repository".to_string()),
                stargazers_count: 42,
                forks_count: 7,
                watchers_count: 42,
                open_issues_count: 1,
                language: Some("Rust".to_string()),
                size: 1024,
                created_at: Utc::now(),
                updated_at: Utc::now(),
                default_branch: Some("main".to_string()),
            },
        );
    }

    fn webhook_headers(event: &str, signature: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("X-GitHub-Event", HeaderValue::from_str(event).unwrap());
        if let Some(signature) = signature {
            headers.insert(
                "X-Hub-Signature-256",
                HeaderValue::from_str(signature).unwrap(),
            );
        }
        headers
    }

    #[tokio::test]
    async fn test_webhook_rejects_bad_signature_without_processing() {
        let (state, host) = test_state(Some("abc"));
        seed_issue(&host, 1);

        let body = br#"{"action":"opened","issue":{"number":1},"repository":{"full_name":"owner/repo"}}"#;
        let headers = webhook_headers("issues", Some("sha256=0000"));
        let response = webhook_handler(State(state), headers, Bytes::from_static(body)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(host.set_labels_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_processes_signed_issue_event() {
        let (state, host) = test_state(Some("abc"));
        seed_issue(&host, 1);

        let body = br#"{"action":"opened","issue":{"number":1},"repository":{"full_name":"owner/repo"}}"#;
        let signature = sign("abc", body);
        let headers = webhook_headers("issues", Some(&signature));
        let response = webhook_handler(State(state), headers, Bytes::from_static(body)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(host.set_labels_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_webhook_ping_without_secret() {
        let (state, _) = test_state(None);
        let response = webhook_handler(
            State(state),
            webhook_headers("ping", None),
            Bytes::from_static(br#"{"zen":"Keep it simple."}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_webhook_malformed_json_is_400() {
        let (state, _) = test_state(None);
        let response = webhook_handler(
            State(state),
            webhook_headers("issues", None),
            Bytes::from_static(b"not json"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_webhook_unknown_event_acknowledged() {
        let (state, _) = test_state(None);
        let response = webhook_handler(
            State(state),
            webhook_headers("workflow_run", None),
            Bytes::from_static(b"{}"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analytics_served_from_cache_within_ttl() {
        let (state, _) = test_state(None);
        // A fresh computation for the unseeded default repo would score 20;
        // the sentinel proves the cached report is returned instead.
        let cached = AnalyticsReport {
            generated_at: Utc::now(),
            repository: "owner/repo".to_string(),
            basic_stats: Default::default(),
            health_score: 99.5,
            commit_activity: Default::default(),
            issue_analytics: Default::default(),
            pr_analytics: Default::default(),
            contributor_activity: Default::default(),
        };
        state.report_cache.put("owner/repo".to_string(), cached).await;

        let response = analytics_handler(State(state), Query(RepoQuery { repo: None })).await;
        assert_eq!(response.status(), StatusCode::OK);

        let payload = read_json(response).await;
        assert_eq!(payload["health_score"], 99.5);
        assert_eq!(payload["api_version"], "1.0");
    }

    #[tokio::test]
    async fn test_quick_stats_caps_at_five_and_captures_errors() {
        let (state, host) = test_state(None);
        seed_repo(&host, "owner/repo");

        let response = quick_stats_handler(
            State(state),
            Query(StatsQuery {
                repos: Some("owner/repo,u/r1,u/r2,u/r3,u/r4,u/r5".to_string()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let payload = read_json(response).await;
        let entries = payload.as_object().unwrap();
        assert_eq!(entries.len(), 5);
        assert!(entries["owner/repo"]["health_score"].is_number());
        assert_eq!(entries["owner/repo"]["stars"], 42);
        for unknown in ["u/r1", "u/r2", "u/r3", "u/r4"] {
            assert!(entries[unknown]["error"].is_string());
        }
        // Sixth repo falls past the cap entirely
        assert!(!entries.contains_key("u/r5"));
    }

    #[tokio::test]
    async fn test_analyze_issue_requires_fields() {
        let (state, _) = test_state(None);
        let response = analyze_issue_handler(
            State(state.clone()),
            Bytes::from_static(br#"{"repo_name":"owner/repo"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response =
            analyze_issue_handler(State(state), Bytes::from_static(b"not json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_issue_drives_pipeline() {
        let (state, host) = test_state(None);
        seed_issue(&host, 42);

        let response = analyze_issue_handler(
            State(state),
            Bytes::from_static(br#"{"repo_name":"owner/repo","issue_number":42}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(host.set_labels_calls.lock().unwrap().len(), 1);
        assert_eq!(host.comments_posted.lock().unwrap().len(), 1);
    }
}
