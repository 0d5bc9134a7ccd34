//! End-to-end runs of `CommitFetcher` against a `MockTransport`.
//!
//! Each test wires canned event pages (and PR lookups where needed) and
//! checks the ordered result, the error surface, and which URLs were hit.

use chrono::{DateTime, Duration, Utc};
use commitfeed_core::SortOrder;
use commitfeed_github::events::events_url;
use commitfeed_github::pulls::pulls_url;
use commitfeed_github::transport::mock::MockTransport;
use commitfeed_github::{CommitFetcher, EnrichScope, FetchError, FetchRequest, HttpResponse};

const API: &str = "https://api.test";
const USER: &str = "octo";

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-06-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn days_ago(days: i64) -> String {
    (now() - Duration::days(days)).to_rfc3339()
}

fn push_event(created_at: &str, repo: &str, shas: &[&str]) -> String {
    let commits: Vec<String> = shas
        .iter()
        .map(|sha| {
            format!(
                r#"{{"sha": "{sha}", "author": {{"name": "Octo Cat", "email": "octo@example.com"}}, "message": "work on {sha}", "distinct": true}}"#
            )
        })
        .collect();
    format!(
        r#"{{"id": "1", "type": "PushEvent", "actor": {{"login": "octo"}}, "created_at": "{created_at}",
            "repo": {{"id": 1, "name": "{repo}"}}, "payload": {{"ref": "refs/heads/main", "commits": [{}]}}}}"#,
        commits.join(",")
    )
}

fn other_event(kind: &str, created_at: &str) -> String {
    format!(
        r#"{{"id": "2", "type": "{kind}", "created_at": "{created_at}", "repo": {{"name": "octo/x"}}, "payload": {{}}}}"#
    )
}

fn page(events: &[String]) -> String {
    format!("[{}]", events.join(","))
}

fn request() -> FetchRequest {
    FetchRequest {
        endpoint: API.into(),
        ..FetchRequest::new(USER, "tok")
    }
}

fn shas(commits: &[commitfeed_core::CommitRecord]) -> Vec<&str> {
    commits.iter().map(|c| c.sha.as_str()).collect()
}

/// Page 1: three push events, one outside the window, plus noise.
fn two_page_mock() -> MockTransport {
    let page1 = page(&[
        push_event(&days_ago(2), "octo/widgets", &["newest"]),
        other_event("WatchEvent", &days_ago(3)),
        push_event(&days_ago(10), "octo/gadgets", &["middle"]),
        push_event(&days_ago(60), "octo/widgets", &["ancient"]),
    ]);
    MockTransport::new()
        .with_json(&events_url(API, USER, 1), &page1)
        .with_json(&events_url(API, USER, 2), "[]")
}

#[test]
fn two_pages_one_month_window_sorted_desc_by_default() {
    let mock = two_page_mock();
    let commits = CommitFetcher::new(&mock).run_at(&request(), now()).unwrap();

    assert_eq!(shas(&commits), vec!["newest", "middle"]);
    assert_eq!(commits[1].repository, "octo/gadgets");
    assert!(commits.iter().all(|c| c.pr_url.is_none()));
}

#[test]
fn pagination_stops_after_first_empty_page() {
    let mock = two_page_mock();
    CommitFetcher::new(&mock).run_at(&request(), now()).unwrap();

    // page 3 has no route; requesting it would have failed the run
    assert_eq!(
        mock.request_urls(),
        vec![events_url(API, USER, 1), events_url(API, USER, 2)]
    );
}

#[test]
fn page_of_only_non_push_events_terminates() {
    let page1 = page(&[
        other_event("IssuesEvent", &days_ago(1)),
        other_event("ForkEvent", &days_ago(2)),
    ]);
    let mock = MockTransport::new().with_json(&events_url(API, USER, 1), &page1);

    let commits = CommitFetcher::new(&mock).run_at(&request(), now()).unwrap();
    assert!(commits.is_empty());
    assert_eq!(mock.requests().len(), 1);
}

#[test]
fn ascending_order() {
    let mock = two_page_mock();
    let req = FetchRequest {
        sort_order: SortOrder::parse_str("asc"),
        ..request()
    };
    let commits = CommitFetcher::new(&mock).run_at(&req, now()).unwrap();

    assert_eq!(shas(&commits), vec!["middle", "newest"]);
    assert!(commits.windows(2).all(|w| w[0].date <= w[1].date));
}

#[test]
fn unknown_sort_order_behaves_like_desc() {
    let desc = CommitFetcher::new(&two_page_mock())
        .run_at(&request(), now())
        .unwrap();
    let other = CommitFetcher::new(&two_page_mock())
        .run_at(
            &FetchRequest {
                sort_order: SortOrder::parse_str("newest-first"),
                ..request()
            },
            now(),
        )
        .unwrap();

    assert_eq!(desc, other);
    assert!(desc.windows(2).all(|w| w[0].date >= w[1].date));
}

#[test]
fn wider_window_includes_older_events() {
    let mock = two_page_mock();
    let req = FetchRequest {
        months_back: 3,
        ..request()
    };
    let commits = CommitFetcher::new(&mock).run_at(&req, now()).unwrap();
    assert_eq!(shas(&commits), vec!["newest", "middle", "ancient"]);
}

#[test]
fn every_commit_of_an_in_window_event_is_kept() {
    let page1 = page(&[push_event(&days_ago(1), "octo/widgets", &["c1", "c2", "c3"])]);
    let mock = MockTransport::new()
        .with_json(&events_url(API, USER, 1), &page1)
        .with_json(&events_url(API, USER, 2), "[]");

    let commits = CommitFetcher::new(&mock).run_at(&request(), now()).unwrap();
    assert_eq!(shas(&commits), vec!["c1", "c2", "c3"]);
    assert!(commits.iter().all(|c| c.author == "Octo Cat"));
}

#[test]
fn exhausted_budget_on_first_page_is_rate_limit_error() {
    let page1 = page(&[push_event(&days_ago(1), "octo/widgets", &["a"])]);
    let resp = HttpResponse::new(200, page1).with_header("X-RateLimit-Remaining", "0");
    let mock = MockTransport::new().with_response(&events_url(API, USER, 1), resp);

    let err = CommitFetcher::new(&mock)
        .run_at(&request(), now())
        .unwrap_err();
    assert!(err.is_rate_limited(), "got {err:?}");
    assert_eq!(mock.requests().len(), 1);
}

#[test]
fn forbidden_page_surfaces_reset_time() {
    let resp = HttpResponse::new(403, r#"{"message": "API rate limit exceeded"}"#)
        .with_header("X-RateLimit-Reset", "1718459200");
    let mock = MockTransport::new().with_response(&events_url(API, USER, 1), resp);

    let err = CommitFetcher::new(&mock)
        .run_at(&request(), now())
        .unwrap_err();
    match &err {
        FetchError::RateLimited { reset_at: Some(at) } => assert_eq!(at.timestamp(), 1_718_459_200),
        other => panic!("expected rate limit with reset, got {other:?}"),
    }
    assert!(err.to_string().contains("resets at"));
}

#[test]
fn malformed_page_aborts_run() {
    let mock = MockTransport::new().with_json(&events_url(API, USER, 1), "<html>oops</html>");
    let err = CommitFetcher::new(&mock)
        .run_at(&request(), now())
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[test]
fn pr_mapping_fills_urls_and_empty_association() {
    let page1 = page(&[
        push_event(&days_ago(1), "octo/widgets", &["with-pr"]),
        push_event(&days_ago(2), "octo/widgets", &["no-pr"]),
    ]);
    let mock = MockTransport::new()
        .with_json(&events_url(API, USER, 1), &page1)
        .with_json(&events_url(API, USER, 2), "[]")
        .with_json(
            &pulls_url(API, "octo/widgets", "with-pr"),
            r#"[{"html_url": "https://github.com/octo/widgets/pull/9"}]"#,
        )
        .with_json(&pulls_url(API, "octo/widgets", "no-pr"), "[]");
    let req = FetchRequest {
        map_prs: true,
        ..request()
    };

    let commits = CommitFetcher::new(&mock).run_at(&req, now()).unwrap();
    assert_eq!(
        commits[0].pr_url.as_deref(),
        Some("https://github.com/octo/widgets/pull/9")
    );
    assert_eq!(commits[1].pr_url.as_deref(), Some(""));

    let pulls_req = mock
        .requests()
        .into_iter()
        .find(|r| r.url.ends_with("/pulls"))
        .unwrap();
    assert_eq!(
        pulls_req.header("Accept"),
        Some("application/vnd.github.groot-preview+json")
    );
}

#[test]
fn pr_failure_keeps_commit_and_run_succeeds() {
    let page1 = page(&[
        push_event(&days_ago(1), "octo/widgets", &["throttled"]),
        push_event(&days_ago(2), "octo/widgets", &["ok"]),
        push_event(&days_ago(3), "octo/widgets", &["unrouted"]),
    ]);
    let mock = MockTransport::new()
        .with_json(&events_url(API, USER, 1), &page1)
        .with_json(&events_url(API, USER, 2), "[]")
        .with_response(
            &pulls_url(API, "octo/widgets", "throttled"),
            HttpResponse::new(403, ""),
        )
        .with_json(
            &pulls_url(API, "octo/widgets", "ok"),
            r#"[{"html_url": "https://github.com/octo/widgets/pull/1"}]"#,
        );
    let req = FetchRequest {
        map_prs: true,
        enrich_scope: EnrichScope::NewOnly,
        ..request()
    };

    let commits = CommitFetcher::new(&mock).run_at(&req, now()).unwrap();
    assert_eq!(shas(&commits), vec!["throttled", "ok", "unrouted"]);
    assert_eq!(commits[0].pr_url, None);
    assert_eq!(
        commits[1].pr_url.as_deref(),
        Some("https://github.com/octo/widgets/pull/1")
    );
    assert_eq!(commits[2].pr_url, None);
}

#[test]
fn zero_months_never_touches_network() {
    let mock = two_page_mock();
    let req = FetchRequest {
        months_back: 0,
        ..request()
    };
    let err = CommitFetcher::new(&mock).run_at(&req, now()).unwrap_err();
    assert!(matches!(err, FetchError::InvalidConfig(_)));
    assert!(mock.requests().is_empty());
}

#[test]
fn token_is_sent_on_every_request() {
    let page1 = page(&[push_event(&days_ago(1), "octo/widgets", &["a"])]);
    let mock = MockTransport::new()
        .with_json(&events_url(API, USER, 1), &page1)
        .with_json(&events_url(API, USER, 2), "[]")
        .with_json(&pulls_url(API, "octo/widgets", "a"), "[]");
    let req = FetchRequest {
        map_prs: true,
        ..request()
    };

    CommitFetcher::new(&mock).run_at(&req, now()).unwrap();
    let requests = mock.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests
        .iter()
        .all(|r| r.header("Authorization") == Some("token tok")));
}
