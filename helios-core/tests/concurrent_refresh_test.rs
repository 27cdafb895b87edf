//! Tests for single-flight token refresh
//!
//! Several requests failing with 401 at the same time must share one
//! refresh call and all succeed with the new token.
//!
//! Run with: cargo test --test concurrent_refresh_test -- --nocapture

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use helios_core::domain::StorageKey;
use helios_core::ports::SessionStore;
use helios_core::SessionPhase;

use common::{context, seeded_store, MockBackend, RedirectRecorder, Reply};

fn backend_with_slow_refresh(refreshes: Arc<AtomicUsize>) -> MockBackend {
    MockBackend::start(move |req| match (req.route(), req.bearer()) {
        ("/auth/refresh", _) => {
            refreshes.fetch_add(1, Ordering::SeqCst);
            // keep the refresh in flight while the other 401s arrive
            thread::sleep(Duration::from_millis(200));
            Reply::data(serde_json::json!({ "accessToken": "fresh" }))
        }
        (_, Some("fresh")) => Reply::data(serde_json::json!({
            "totalConsumption": 100.0,
            "averageConsumption": 10.0,
            "totalSavings": 20.0,
            "peakConsumption": 15.0,
            "lowestConsumption": 5.0
        })),
        _ => Reply::error(401, "Token expirado"),
    })
}

#[tokio::test]
async fn test_two_concurrent_401s_share_one_refresh() {
    let refreshes = Arc::new(AtomicUsize::new(0));
    let backend = backend_with_slow_refresh(Arc::clone(&refreshes));
    let store = seeded_store("stale", Some("refresh-1"));
    let ctx = context(&backend.url(), store.clone(), Arc::new(RedirectRecorder::default()));

    let (first, second) = tokio::join!(
        ctx.consumption_service.stats(),
        ctx.consumption_service.stats()
    );

    assert_eq!(first.unwrap().total_consumption, 100.0);
    assert_eq!(second.unwrap().total_consumption, 100.0);
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(backend.hits("/auth/refresh"), 1);
    assert_eq!(store.get(StorageKey::AccessToken).unwrap().as_deref(), Some("fresh"));
    assert_eq!(ctx.session.state().phase(), SessionPhase::Authenticated);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_401s_share_one_refresh() {
    let refreshes = Arc::new(AtomicUsize::new(0));
    let backend = backend_with_slow_refresh(Arc::clone(&refreshes));
    let store = seeded_store("stale", Some("refresh-1"));
    let ctx = Arc::new(context(
        &backend.url(),
        store,
        Arc::new(RedirectRecorder::default()),
    ));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let ctx = Arc::clone(&ctx);
        handles.push(tokio::spawn(async move {
            ctx.consumption_service.stats().await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 8);
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_401s_with_failed_refresh_redirect_once() {
    let backend = MockBackend::start(|req| match req.route() {
        "/auth/refresh" => {
            thread::sleep(Duration::from_millis(100));
            Reply::error(401, "Refresh inválido")
        }
        _ => Reply::error(401, "Token expirado"),
    });
    let store = seeded_store("stale", Some("refresh-1"));
    let listener = Arc::new(RedirectRecorder::default());
    let ctx = context(&backend.url(), store.clone(), listener.clone());

    let (first, second) = tokio::join!(
        ctx.consumption_service.stats(),
        ctx.production_service.stats()
    );

    assert!(first.unwrap_err().is_unauthorized());
    assert!(second.unwrap_err().is_unauthorized());
    assert_eq!(backend.hits("/auth/refresh"), 1);
    assert_eq!(listener.redirects().len(), 1);
    assert!(store.is_empty());
}
