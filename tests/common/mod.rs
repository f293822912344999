//! Shared test utilities for integration tests.
//!
//! This module provides a `TestClient` that makes HTTP requests against the
//! router over an in-memory database, plus seed helpers that write warehouse
//! rows the way the upstream loader does. Methods are intentionally broad to
//! support various test scenarios across different test files.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use household_kpi::config::Config;
use household_kpi::date_utils::{parse_stamp, Period};
use household_kpi::db::shards::{create_period_tables, table_name, SALES_DETAIL, SUMMARY};
use household_kpi::db::{create_in_memory_pool, migrations};
use household_kpi::server;
use household_kpi::state::AppState;
use http_body_util::BodyExt;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;

pub const REGION: &str = "PUMA";

/// A test client holding application state over a fresh in-memory database.
pub struct TestClient {
    state: AppState,
}

impl TestClient {
    /// Create a new test client with migrations applied and no warehouse tables.
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }

        let config = Config {
            host: "127.0.0.1".into(),
            port: 7080,
            database_path: PathBuf::from(":memory:"),
            migrations_path: PathBuf::from("migrations"),
            regional: REGION.into(),
            data_lag_days: 2,
        };

        let state = AppState {
            db: pool,
            config: Arc::new(config),
        };

        Self { state }
    }

    /// Client whose per-month tables cover `from` through `to` inclusive.
    pub fn with_periods(from: Period, to: Period) -> Self {
        let client = Self::new();
        client.seed(|conn| {
            let mut period = from;
            while period <= to {
                create_period_tables(conn, period).expect("Failed to create period tables");
                period = period.next();
            }
        });
        client
    }

    /// Get the router, middleware included, for making requests.
    pub fn router(&self) -> Router {
        server::router(self.state.clone())
    }

    /// Run `f` against the database. The pool has a single connection, so it
    /// is released before returning.
    pub fn seed<F: FnOnce(&Connection)>(&self, f: F) {
        let conn = self.state.db.get().expect("Failed to get connection");
        f(&conn);
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body)
            .unwrap_or_else(|e| panic!("Invalid JSON from {}: {} ({})", uri, e, body));
        (status, parsed)
    }

    /// The `data` array of a successful report.
    pub async fn rows(&self, uri: &str) -> Vec<Value> {
        let (status, body) = self.get_json(uri).await;
        assert_eq!(status, StatusCode::OK, "{} -> {}", uri, body);
        body["data"].as_array().cloned().expect("data array")
    }

    // =========================================================================
    // Seed helpers
    // =========================================================================

    pub fn add_territory(&self, regional: &str, branch: &str, wok: &str, sto: &str) {
        self.seed(|conn| {
            conn.execute(
                "INSERT INTO territories (sto, wok, branch, regional) VALUES (?, ?, ?, ?)",
                params![sto, wok, branch, regional],
            )
            .unwrap();
        });
    }

    /// Insert a summary row, copying territory columns from the hierarchy.
    pub fn add_summary(&self, snapshot_date: &str, sto: &str, channel: &str, package: &str, facts: Facts) {
        let table = table_name(SUMMARY, period_of(snapshot_date));
        self.seed(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO {table} (snapshot_date, regional, branch, wok, sto, channel, package,
                                          io, re, ps, revenue, subscribers)
                     SELECT ?1, regional, branch, wok, sto, ?2, ?3, ?4, ?5, ?6, ?7, ?8
                     FROM territories WHERE sto = ?9"
                ),
                params![
                    snapshot_date,
                    channel,
                    package,
                    facts.io,
                    facts.re,
                    facts.ps,
                    facts.revenue,
                    facts.subscribers,
                    sto
                ],
            )
            .unwrap();
        });
    }

    /// Insert an order into the table of its registration month.
    pub fn add_order(&self, order: OrderSeed) {
        let table = table_name(SALES_DETAIL, period_of(&order.registered_at));
        self.seed(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO {table} (order_id, service_id, stage, channel, sales_agent,
                                          registered_at, provision_start_at, provision_completed_at,
                                          fallout_category, fallout_subcategory,
                                          regional, branch, wok, sto, odp_name, provisioning_days)
                     SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                            regional, branch, wok, sto, ?11, ?12
                     FROM territories WHERE sto = ?13"
                ),
                params![
                    order.order_id,
                    order.service_id,
                    order.stage,
                    order.channel,
                    order.sales_agent,
                    order.registered_at,
                    order.provision_start_at,
                    order.provision_completed_at,
                    order.fallout_category,
                    order.fallout_subcategory,
                    order.odp_name,
                    order.provisioning_days,
                    order.sto
                ],
            )
            .unwrap();
        });
    }

    pub fn add_target(&self, periode: &str, sto: &str, target: TargetSeed) {
        self.seed(|conn| {
            conn.execute(
                "INSERT INTO household_targets (periode, sto, all_sales, demand, revenue,
                                                ps_grapari, ps_digital, ps_community, ps_agency)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    periode,
                    sto,
                    target.all_sales,
                    target.demand,
                    target.revenue,
                    target.ps_grapari,
                    target.ps_digital,
                    target.ps_community,
                    target.ps_agency
                ],
            )
            .unwrap();
        });
    }

    pub fn add_port(&self, snapshot_date: &str, odp: &str, sto: &str, total: i64, used: i64, status: &str) {
        self.seed(|conn| {
            conn.execute(
                "INSERT INTO odp_ports (snapshot_date, odp_name, sto, port_total, port_used, status)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![snapshot_date, odp, sto, total, used, status],
            )
            .unwrap();
        });
    }

    pub fn add_golive(&self, odp: &str, sto: &str, golive_date: &str, program_year: i32, capacity: i64) {
        self.seed(|conn| {
            conn.execute(
                "INSERT INTO odp_golive (odp_name, sto, golive_date, program_year, port_capacity)
                 VALUES (?, ?, ?, ?, ?)",
                params![odp, sto, golive_date, program_year, capacity],
            )
            .unwrap();
        });
    }

    pub fn add_agent(&self, code: &str, sto: &str, active: bool) {
        self.seed(|conn| {
            conn.execute(
                "INSERT INTO sales_agents (agent_code, agent_name, sto, active) VALUES (?, ?, ?, ?)",
                params![code, format!("Agent {}", code), sto, active as i64],
            )
            .unwrap();
        });
    }

    /// The territory tree most tests run against: two branches in the
    /// configured region and one sto in another region.
    pub fn add_standard_territories(&self) {
        self.add_territory(REGION, "AMBON", "AMBON INNER", "AMB");
        self.add_territory(REGION, "AMBON", "AMBON INNER", "PSO");
        self.add_territory(REGION, "AMBON", "TUAL", "TUL");
        self.add_territory(REGION, "JAYAPURA", "JAYAPURA INNER", "JPR");
        self.add_territory("SULAWESI", "MAKASSAR", "MAKASSAR INNER", "MKS");
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Facts {
    pub io: i64,
    pub re: i64,
    pub ps: i64,
    pub revenue: f64,
    pub subscribers: i64,
}

#[derive(Debug, Clone, Default)]
pub struct OrderSeed {
    pub order_id: String,
    pub service_id: String,
    pub stage: String,
    pub channel: String,
    pub sales_agent: Option<String>,
    pub registered_at: String,
    pub provision_start_at: Option<String>,
    pub provision_completed_at: Option<String>,
    pub fallout_category: Option<String>,
    pub fallout_subcategory: Option<String>,
    pub sto: String,
    pub odp_name: Option<String>,
    pub provisioning_days: Option<f64>,
}

/// Order with the fields every test sets; the rest default to empty.
pub fn order(order_id: &str, service_id: &str, stage: &str, registered_at: &str, sto: &str) -> OrderSeed {
    OrderSeed {
        order_id: order_id.into(),
        service_id: service_id.into(),
        stage: stage.into(),
        channel: "k3".into(),
        registered_at: registered_at.into(),
        sto: sto.into(),
        ..Default::default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TargetSeed {
    pub all_sales: Option<f64>,
    pub demand: Option<f64>,
    pub revenue: Option<f64>,
    pub ps_grapari: Option<f64>,
    pub ps_digital: Option<f64>,
    pub ps_community: Option<f64>,
    pub ps_agency: Option<f64>,
}

pub fn period(year: i32, month: u32) -> Period {
    Period { year, month }
}

fn period_of(stamp: &str) -> Period {
    Period::of(parse_stamp(stamp).expect("seed date"))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Find the row named `name` in a report.
pub fn row<'a>(rows: &'a [Value], name: &str) -> &'a Value {
    rows.iter()
        .find(|r| r["name"] == name)
        .unwrap_or_else(|| panic!("no row named {} in {:?}", name, rows))
}

pub fn names(rows: &[Value]) -> Vec<String> {
    rows.iter()
        .map(|r| r["name"].as_str().unwrap_or_default().to_string())
        .collect()
}
