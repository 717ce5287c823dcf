// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Integration tests hosting the comparison endpoints on a REST server.
//!
//! The library itself owns no transport; this harness wires the engine
//! into an axum app the way a deployment would, and checks that reports
//! stay deterministic under concurrent requests.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use dispute_recon_rs::{
    DisputeRecord, InMemoryStore, ReconcileError, Reconciler, StaticRates,
};
use futures::future::join_all;
use reqwest::Client;
use rust_decimal_macros::dec;
use std::io::Cursor;
use std::sync::Arc;
use tokio::net::TcpListener;

struct AppState {
    engine: Reconciler<InMemoryStore, StaticRates>,
}

fn app_state() -> Arc<AppState> {
    let store = InMemoryStore::new();
    store
        .seed([
            DisputeRecord {
                dispute_id: "case_001".into(),
                transaction_id: "txn_001".into(),
                amount: dec!(100.00),
                currency: "USD".into(),
                status: "Open".into(),
                reason: "Fraud".into(),
            },
            DisputeRecord {
                dispute_id: "case_002".into(),
                transaction_id: "txn_005".into(),
                amount: dec!(150.00),
                currency: "USD".into(),
                status: "Lost".into(),
                reason: "Product Not Received".into(),
            },
        ])
        .unwrap();

    Arc::new(AppState {
        engine: Reconciler::new(store, StaticRates::usd_base()),
    })
}

/// `POST /disputes/compare/file/{name}` with the raw file as the body.
async fn compare_file(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    run_to_response(state.engine.reconcile_file(Cursor::new(body.as_ref()), &name))
}

/// `POST /disputes/compare/json` with an already-structured record list.
async fn compare_json(
    State(state): State<Arc<AppState>>,
    Json(records): Json<Vec<DisputeRecord>>,
) -> Response {
    run_to_response(state.engine.reconcile_records(records))
}

fn run_to_response(result: Result<dispute_recon_rs::Report, ReconcileError>) -> Response {
    match result {
        Ok(report) => (StatusCode::OK, report.render()).into_response(),
        // An unparseable upload is the client's fault and must be an
        // explicit failure, never an empty report.
        Err(e @ ReconcileError::Parse(_)) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/disputes/compare/file/{name}", post(compare_file))
        .route("/disputes/compare/json", post(compare_json))
        .with_state(app_state());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn compare_file_returns_report() {
    let base = spawn_server().await;
    let client = Client::new();

    let csv = "DisputeId,TransactionId,Amount,Currency,Status,Reason\n\
               case_001,txn_001,250.00,USD,Open,Fraud\n\
               D9,T9,10,USD,Open,X\n";

    let response = client
        .post(format!("{base}/disputes/compare/file/incoming.csv"))
        .body(csv)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("===== AUDIT ====="));
    assert!(body.contains("[case_001/txn_001] amount mismatch: 100.00 vs 250.00 [HIGH]"));
    assert!(body.contains("HIGH: D9/T9 not found"));
}

#[tokio::test]
async fn compare_json_bypasses_format_detection() {
    let base = spawn_server().await;
    let client = Client::new();

    let body = serde_json::json!([
        {
            "disputeId": "case_002",
            "transactionId": "txn_005",
            "amount": "150.00",
            "currency": "USD",
            "status": "Lost",
            "reason": "Product Not Received"
        }
    ]);

    let response = client
        .post(format!("{base}/disputes/compare/json"))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let text = response.text().await.unwrap();
    assert!(text.contains("[case_002/txn_005] already resolved"));
}

#[tokio::test]
async fn unparseable_upload_is_a_client_error() {
    let base = spawn_server().await;
    let client = Client::new();

    let csv = "h,h,h,h,h,h\nD1,T1,not-a-number,USD,Open,Fraud\n";
    let response = client
        .post(format!("{base}/disputes/compare/file/incoming.csv"))
        .body(csv)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body = response.text().await.unwrap();
    assert!(body.contains("cannot parse amount"));
}

#[tokio::test]
async fn unsupported_format_is_an_empty_report_not_an_error() {
    let base = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{base}/disputes/compare/file/incoming.txt"))
        .body("some data")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert_eq!(body, "===== AUDIT =====\n\n===== ALERTS =====\n");
}

#[tokio::test]
async fn concurrent_runs_are_deterministic() {
    let base = spawn_server().await;
    let client = Client::new();

    let csv = "DisputeId,TransactionId,Amount,Currency,Status,Reason\n\
               case_001,txn_001,250.00,USD,Open,Fraud\n\
               case_002,txn_005,150.00,USD,Lost,x\n\
               D9,T9,10,USD,Open,X\n";

    let requests = (0..32).map(|_| {
        let client = client.clone();
        let url = format!("{base}/disputes/compare/file/incoming.csv");
        let csv = csv.to_owned();
        async move {
            let response = client.post(url).body(csv).send().await.unwrap();
            assert_eq!(response.status(), 200);
            response.text().await.unwrap()
        }
    });

    let bodies = join_all(requests).await;
    for body in &bodies {
        assert_eq!(body, &bodies[0]);
    }
}
