// tests/stats_api_test.rs
//! End-to-end checks of the `miner_getstat1` endpoint through the HTTP router

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use dero_miner_rs::api::server::{STATS_METHOD, registry, router};
use dero_miner_rs::stats::{HashrateGauge, MiningState, ShareResult, StatsSource};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceExt;

struct Miner {
    state: Arc<MiningState>,
    gauge: Arc<HashrateGauge>,
    source: Arc<StatsSource>,
}

fn miner(pool: &str) -> Miner {
    let state = Arc::new(MiningState::new(pool, false));
    let gauge = Arc::new(HashrateGauge::new());
    let source = Arc::new(StatsSource::with_label(
        Arc::clone(&state),
        Arc::clone(&gauge),
        "dero-miner-rs 0.1.0",
    ));
    Miner {
        state,
        gauge,
        source,
    }
}

async fn post(source: &Arc<StatsSource>, body: Value) -> (StatusCode, Option<Value>) {
    let app = router(Arc::new(registry(Arc::clone(source))));
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://dashboard.example")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = (!bytes.is_empty()).then(|| serde_json::from_slice(&bytes).unwrap());
    (status, json)
}

fn getstat(id: u64) -> Value {
    json!({"id": id, "jsonrpc": "2.0", "method": STATS_METHOD})
}

#[tokio::test]
async fn test_getstat_before_mining() {
    let miner = miner("");
    let (status, reply) = post(&miner.source, getstat(0)).await;
    assert_eq!(status, StatusCode::OK);

    let reply = reply.unwrap();
    assert_eq!(reply["id"], json!(0));
    assert_eq!(
        reply["result"],
        json!([
            "dero-miner-rs 0.1.0",
            "0",
            "0;0;0",
            "0",
            "0",
            "off",
            "0;0",
            "",
            "0;0;0;0"
        ])
    );
}

#[tokio::test]
async fn test_getstat_reflects_counters() {
    let miner = miner("stratum+tcp://pool.example.com:10300");
    miner.source.mark_started(Instant::now());
    for _ in 0..10 {
        miner.state.record_share(ShareResult::Accepted);
    }
    miner.state.record_share(ShareResult::Rejected);
    miner.gauge.set(250);

    let (_, reply) = post(&miner.source, getstat(7)).await;
    let fields = reply.unwrap()["result"].as_array().unwrap().clone();

    assert_eq!(fields.len(), 9);
    assert!(fields[1].as_str().unwrap().parse::<u64>().is_ok());
    assert_eq!(fields[2], "10;1;0");
    assert_eq!(fields[3], "250");
    assert_eq!(fields[7], "stratum+tcp://pool.example.com:10300");
}

#[tokio::test]
async fn test_concurrent_queries_while_counters_change() {
    let miner = miner("stratum+tcp://pool:10300");
    let writer = {
        let state = Arc::clone(&miner.state);
        std::thread::spawn(move || {
            for _ in 0..1000 {
                state.add_hashes(10);
                state.record_share(ShareResult::Accepted);
            }
        })
    };

    let queries: Vec<_> = (0..8)
        .map(|id| {
            let source = Arc::clone(&miner.source);
            tokio::spawn(async move { post(&source, getstat(id)).await })
        })
        .collect();

    for query in queries {
        let (status, reply) = query.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        let fields = reply.unwrap()["result"].as_array().unwrap().clone();
        assert_eq!(fields.len(), 9);
        assert!(fields[2].as_str().unwrap().ends_with(";0;0"));
    }
    writer.join().unwrap();
    assert_eq!(miner.state.accepted_shares(), 1000);
}

#[tokio::test]
async fn test_unknown_method_and_notification() {
    let miner = miner("");
    let (status, reply) = post(
        &miner.source,
        json!({"id": 1, "jsonrpc": "2.0", "method": "miner_restart"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply.unwrap()["error"]["code"], json!(-32601));

    let (status, reply) = post(
        &miner.source,
        json!({"jsonrpc": "2.0", "method": STATS_METHOD}),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(reply.is_none());
}
