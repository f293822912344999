//! End-to-end tests for the `/household` report endpoints.

mod common;

use axum::http::StatusCode;
use common::{names, order, period, row, Facts, OrderSeed, TargetSeed, TestClient};
use serde_json::Value;

const DATE: &str = "date=2025-04-30";

fn client() -> TestClient {
    let client = TestClient::with_periods(period(2024, 1), period(2025, 4));
    client.add_standard_territories();
    client
}

/// Summary snapshots, targets and orders shared by the trend reports.
fn seeded() -> TestClient {
    let c = client();
    let total = |io, re, ps, revenue, subscribers| Facts {
        io,
        re,
        ps,
        revenue,
        subscribers,
    };

    c.add_summary("2025-04-10", "AMB", "ALL", "ALL", total(10, 8, 6, 1000.0, 50));
    c.add_summary("2025-04-20", "PSO", "ALL", "ALL", total(5, 4, 2, 500.0, 25));
    c.add_summary("2025-04-15", "TUL", "ALL", "ALL", total(4, 2, 2, 300.0, 10));
    c.add_summary("2025-04-15", "JPR", "ALL", "ALL", total(20, 10, 5, 2000.0, 100));
    c.add_summary("2025-04-15", "MKS", "ALL", "ALL", total(99, 99, 99, 9999.0, 999));
    c.add_summary("2025-03-31", "AMB", "ALL", "ALL", total(8, 6, 4, 800.0, 40));
    c.add_summary("2024-04-15", "AMB", "ALL", "ALL", total(5, 5, 3, 600.0, 30));

    let split = |ps, revenue| Facts {
        ps,
        revenue,
        ..Default::default()
    };
    c.add_summary("2025-04-10", "AMB", "k3", "ALL", split(4, 700.0));
    c.add_summary("2025-04-10", "AMB", "b0", "ALL", split(2, 300.0));
    c.add_summary("2025-04-10", "AMB", "k3", "HSI", split(4, 700.0));
    c.add_summary("2025-03-20", "AMB", "k3", "ALL", split(3, 400.0));

    c.add_target(
        "202504",
        "AMB",
        TargetSeed {
            all_sales: Some(100.0),
            revenue: Some(2000.0),
            ps_grapari: Some(10.0),
            ..Default::default()
        },
    );
    c.add_target(
        "202504",
        "TUL",
        TargetSeed {
            all_sales: Some(50.0),
            ..Default::default()
        },
    );
    c.add_target(
        "202504",
        "JPR",
        TargetSeed {
            demand: Some(64.0),
            ..Default::default()
        },
    );
    c
}

fn ps_order(id: &str, registered: &str, completed: &str, sto: &str) -> OrderSeed {
    OrderSeed {
        provision_completed_at: Some(completed.into()),
        ..order(id, &format!("SVC-{}", id), "PS", registered, sto)
    }
}

#[tokio::test]
async fn test_health() {
    let client = TestClient::new();
    let (status, body) = client.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_io_re_ps_trends_and_ratios() {
    let client = seeded();
    let rows = client.rows(&format!("/household/io-re-ps?{}", DATE)).await;
    assert_eq!(names(&rows), vec!["AMBON", "JAYAPURA"]);

    let ambon = row(&rows, "AMBON");
    assert_eq!(ambon["level"], "branch");
    assert_eq!(ambon["io"]["mtd"], 19);
    assert_eq!(ambon["re"]["mtd"], 14);
    assert_eq!(ambon["ps"]["mtd"], 10);
    assert_eq!(ambon["ps"]["m1"], 4);
    assert_eq!(ambon["ps"]["yoy"], 3);
    assert_eq!(ambon["ps"]["mom"], "150.00%");
    assert_eq!(ambon["re_to_io"], "73.68%");
    assert_eq!(ambon["ps_to_re"], "71.43%");
    assert_eq!(ambon["ps_ytd"], 14);
    assert_eq!(ambon["ps_ytd_prev"], 3);

    let attainment = &ambon["ps_attainment"];
    assert_eq!(attainment["target"], 150.0);
    assert_eq!(attainment["achievement"], "6.67%");
    assert_eq!(attainment["required_daily"], Value::Null);

    let jayapura = row(&rows, "JAYAPURA");
    assert_eq!(jayapura["io"]["mtd"], 20);
    assert_eq!(jayapura["io"]["m1"], 0);
    assert_eq!(jayapura["io"]["mom"], Value::Null);
    assert_eq!(jayapura["ps_attainment"]["target"], Value::Null);
    assert_eq!(jayapura["ps_attainment"]["achievement"], Value::Null);
}

#[tokio::test]
async fn test_io_re_ps_channel_attainment_ignores_package_breakdown() {
    let client = seeded();
    let rows = client.rows(&format!("/household/io-re-ps?{}", DATE)).await;
    let channels = row(&rows, "AMBON")["channels"].as_array().unwrap().clone();

    let grapari = channels.iter().find(|c| c["channel"] == "GRAPARI").unwrap();
    assert_eq!(grapari["actual"], 4);
    assert_eq!(grapari["target"], 10.0);
    assert_eq!(grapari["achievement"], "40.00%");

    let digital = channels.iter().find(|c| c["channel"] == "DIGITAL").unwrap();
    assert_eq!(digital["actual"], 2);
    assert_eq!(digital["achievement"], Value::Null);

    assert!(channels.iter().all(|c| c["channel"] != "OTHER"));
}

#[tokio::test]
async fn test_io_re_ps_rolls_up_consistently() {
    let client = seeded();
    let branches = client.rows(&format!("/household/io-re-ps?{}", DATE)).await;
    let woks = client
        .rows(&format!("/household/io-re-ps?{}&branch=ambon", DATE))
        .await;
    let stos = client
        .rows(&format!("/household/io-re-ps?{}&branch=AMBON&wok=AMBON%20INNER", DATE))
        .await;

    assert_eq!(names(&woks), vec!["AMBON INNER", "TUAL"]);
    assert!(woks.iter().all(|r| r["level"] == "wok"));
    assert_eq!(names(&stos), vec!["AMB", "PSO"]);
    assert!(stos.iter().all(|r| r["level"] == "sto"));

    let sum = |rows: &[Value], metric: &str| -> i64 {
        rows.iter().map(|r| r[metric]["mtd"].as_i64().unwrap()).sum()
    };
    for metric in ["io", "re", "ps"] {
        assert_eq!(
            sum(&woks, metric),
            row(&branches, "AMBON")[metric]["mtd"].as_i64().unwrap(),
            "{}",
            metric
        );
        assert_eq!(
            sum(&stos, metric),
            row(&woks, "AMBON INNER")[metric]["mtd"].as_i64().unwrap(),
            "{}",
            metric
        );
    }
}

#[tokio::test]
async fn test_io_re_ps_greenfield_and_brownfield() {
    let client = seeded();
    client.add_golive("ODP-A", "AMB", "2025-02-01", 2025, 16);
    client.add_golive("ODP-B", "TUL", "2024-06-01", 2024, 8);
    client.add_order(OrderSeed {
        odp_name: Some("ODP-A".into()),
        ..ps_order("O1", "2025-04-02", "2025-04-08", "AMB")
    });
    client.add_order(OrderSeed {
        stage: "COMPLETED".into(),
        odp_name: Some("ODP-B".into()),
        ..ps_order("O2", "2025-03-25 09:00:00", "2025-04-03 10:00:00", "TUL")
    });
    // Completed last month, so not counted this month.
    client.add_order(OrderSeed {
        odp_name: Some("ODP-A".into()),
        ..ps_order("O3", "2025-03-01", "2025-03-20", "AMB")
    });

    let rows = client.rows(&format!("/household/io-re-ps?{}", DATE)).await;
    let ambon = row(&rows, "AMBON");
    assert_eq!(ambon["greenfield"], 1);
    assert_eq!(ambon["brownfield"], 1);
    assert_eq!(row(&rows, "JAYAPURA")["greenfield"], 0);
}

#[tokio::test]
async fn test_ps_from_orders_registered_months_earlier_is_counted() {
    let client = seeded();
    client.add_golive("ODP-A", "AMB", "2025-01-10", 2025, 16);
    client.add_agent("AG1", "AMB", true);
    client.add_order(OrderSeed {
        odp_name: Some("ODP-A".into()),
        sales_agent: Some("AG1".into()),
        ..ps_order("OLD1", "2025-02-20", "2025-04-05", "AMB")
    });
    client.add_order(OrderSeed {
        odp_name: Some("ODP-A".into()),
        sales_agent: Some("AG1".into()),
        ..ps_order("OLD2", "2024-11-03", "2025-04-20", "AMB")
    });
    // Completed before this month.
    client.add_order(OrderSeed {
        odp_name: Some("ODP-A".into()),
        sales_agent: Some("AG1".into()),
        ..ps_order("OLD3", "2025-02-10", "2025-02-25", "AMB")
    });

    let rows = client.rows(&format!("/household/io-re-ps?{}", DATE)).await;
    assert_eq!(row(&rows, "AMBON")["greenfield"], 2);

    let rows = client.rows(&format!("/household/sf-class?{}", DATE)).await;
    assert_eq!(row(&rows, "AMBON")["ps_mtd"], 2);
}

#[tokio::test]
async fn test_unknown_branch_returns_empty_data() {
    let client = seeded();
    let (status, body) = client
        .get_json(&format!("/household/io-re-ps?{}&branch=NOWHERE", DATE))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_wok_without_branch_is_ignored() {
    let client = seeded();
    let rows = client
        .rows(&format!("/household/io-re-ps?{}&wok=TUAL", DATE))
        .await;
    assert_eq!(names(&rows), vec!["AMBON", "JAYAPURA"]);
}

#[tokio::test]
async fn test_invalid_date_is_rejected() {
    let client = seeded();
    for uri in [
        "/household/io-re-ps?date=not-a-date",
        "/household/funnel?date=2025-13-01",
        "/household/sf-class?date=30/04/2025",
        "/household/revenue-c3mr?date=2025-04-301",
        "/household/io-re-ps?date=2025-04-30garbage",
    ] {
        let (status, body) = client.get_json(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].as_str().unwrap().contains("Invalid date"));
    }
}

#[tokio::test]
async fn test_timestamp_date_parameter_is_accepted() {
    let client = seeded();
    let rows = client
        .rows("/household/io-re-ps?date=2025-04-30T23:59:59Z")
        .await;
    assert_eq!(row(&rows, "AMBON")["io"]["mtd"], 19);
}

#[tokio::test]
async fn test_missing_period_table_is_server_error() {
    let client = seeded();
    let (status, body) = client
        .get_json("/household/revenue-c3mr?date=2025-06-15")
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Database error");
}

#[tokio::test]
async fn test_demands_deployment() {
    let client = seeded();
    client.add_port("2025-04-01", "ODP-A", "AMB", 16, 0, "GREEN");
    client.add_port("2025-04-29", "ODP-A", "AMB", 16, 10, "BLACKSYSTEM");
    client.add_port("2025-04-29", "ODP-X", "PSO", 8, 8, "RED");
    client.add_port("2025-04-29", "ODP-C", "JPR", 32, 4, "GREEN");
    client.add_port("2025-05-02", "ODP-C", "JPR", 32, 30, "YELLOW");
    client.add_golive("ODP-A", "AMB", "2025-02-01", 2025, 16);
    client.add_golive("ODP-C", "JPR", "2025-04-05", 2025, 32);

    let rows = client
        .rows(&format!("/household/demands-deployment?{}", DATE))
        .await;

    let ambon = row(&rows, "AMBON");
    assert_eq!(ambon["odp_total"], 2);
    assert_eq!(ambon["port_total"], 24);
    assert_eq!(ambon["port_used"], 18);
    assert_eq!(ambon["port_available"], 6);
    assert_eq!(ambon["occupancy"], "75.00%");
    let black = &ambon["status"]["black"];
    assert_eq!(black["odp"], 1);
    assert_eq!(black["port_total"], 16);
    assert_eq!(black["port_used"], 10);
    assert_eq!(black["occupancy"], "62.50%");
    let red = &ambon["status"]["red"];
    assert_eq!(red["odp"], 1);
    assert_eq!(red["port_total"], 8);
    assert_eq!(red["occupancy"], "100.00%");
    assert_eq!(ambon["status"]["green"]["odp"], 0);
    assert_eq!(ambon["status"]["green"]["port_total"], 0);
    assert_eq!(ambon["status"]["green"]["occupancy"], Value::Null);
    assert_eq!(ambon["deployed_ports"]["mtd"], 0);
    assert_eq!(ambon["demand_attainment"]["achievement"], Value::Null);

    let jayapura = row(&rows, "JAYAPURA");
    assert_eq!(jayapura["status"]["green"]["odp"], 1);
    assert_eq!(jayapura["status"]["green"]["port_used"], 4);
    assert_eq!(jayapura["status"]["green"]["occupancy"], "12.50%");
    assert_eq!(jayapura["status"]["yellow"]["odp"], 0);
    assert_eq!(jayapura["occupancy"], "12.50%");
    assert_eq!(jayapura["odp_golive_mtd"], 1);
    assert_eq!(jayapura["deployed_ports"]["mtd"], 32);
    assert_eq!(jayapura["demand_attainment"]["achievement"], "50.00%");
}

#[tokio::test]
async fn test_demands_reads_latest_snapshot_of_own_region() {
    let client = seeded();
    client.add_port("2025-04-20", "ODP-A", "AMB", 16, 4, "GREEN");
    client.add_port("2025-04-29", "ODP-M", "MKS", 64, 64, "BLACK");

    let rows = client
        .rows(&format!("/household/demands-deployment?{}", DATE))
        .await;
    let ambon = row(&rows, "AMBON");
    assert_eq!(ambon["odp_total"], 1);
    assert_eq!(ambon["port_total"], 16);
    assert_eq!(ambon["occupancy"], "25.00%");
}

#[tokio::test]
async fn test_demands_without_snapshot_reports_zero_capacity() {
    let client = seeded();
    let rows = client
        .rows(&format!("/household/demands-deployment?{}", DATE))
        .await;
    let ambon = row(&rows, "AMBON");
    assert_eq!(ambon["port_total"], 0);
    assert_eq!(ambon["occupancy"], Value::Null);
}

#[tokio::test]
async fn test_sf_class_counts_every_active_agent() {
    let client = seeded();
    client.add_agent("AG1", "AMB", true);
    client.add_agent("AG2", "AMB", true);
    client.add_agent("AG3", "TUL", true);
    client.add_agent("AG4", "JPR", false);

    for i in 0..5 {
        client.add_order(OrderSeed {
            sales_agent: Some("AG1".into()),
            ..ps_order(&format!("A{}", i), "2025-04-01", "2025-04-10", "AMB")
        });
    }
    client.add_order(OrderSeed {
        sales_agent: Some("AG3".into()),
        ..ps_order("B1", "2025-03-28", "2025-04-02", "TUL")
    });
    // Still in progress: no PS.
    client.add_order(OrderSeed {
        sales_agent: Some("AG2".into()),
        ..order("C1", "SVC-C1", "REGISTRATION", "2025-04-12", "AMB")
    });

    let rows = client.rows(&format!("/household/sf-class?{}", DATE)).await;
    let ambon = row(&rows, "AMBON");
    assert_eq!(ambon["agents"], 3);
    assert_eq!(ambon["productive"], 2);
    assert_eq!(ambon["productivity"], "66.67%");
    assert_eq!(ambon["ps_mtd"], 6);
    assert_eq!(ambon["ps_per_agent"], 2.0);

    let classes = ambon["classes"].as_array().unwrap();
    let count = |class: &str| {
        classes
            .iter()
            .find(|c| c["class"] == class)
            .map(|c| c["agents"].as_i64().unwrap())
            .unwrap()
    };
    assert_eq!(count("SILVER"), 1);
    assert_eq!(count("BRONZE"), 1);
    assert_eq!(count("NON_PRODUCTIVE"), 1);
    assert_eq!(count("PLATINUM"), 0);

    let jayapura = row(&rows, "JAYAPURA");
    assert_eq!(jayapura["agents"], 0);
    assert_eq!(jayapura["productivity"], Value::Null);
    assert_eq!(jayapura["ps_per_agent"], Value::Null);
}

#[tokio::test]
async fn test_revenue_c3mr() {
    let client = seeded();
    let rows = client.rows(&format!("/household/revenue-c3mr?{}", DATE)).await;
    let ambon = row(&rows, "AMBON");

    assert_eq!(ambon["revenue"]["mtd"], 1800.0);
    assert_eq!(ambon["revenue"]["m1"], 800.0);
    assert_eq!(ambon["revenue"]["yoy"], 600.0);
    assert_eq!(ambon["revenue"]["mom"], "125.00%");
    assert_eq!(ambon["revenue"]["yoy_growth"], "200.00%");
    assert_eq!(ambon["revenue_ytd"], 2600.0);
    assert_eq!(ambon["ytd_growth"], "333.33%");
    assert_eq!(ambon["revenue_qtd"], 1800.0);
    assert_eq!(ambon["qoq"], Value::Null);
    assert_eq!(ambon["subscribers"]["mtd"], 85);
    assert_eq!(ambon["arpu"], 21.18);
    assert_eq!(ambon["attainment"]["achievement"], "90.00%");

    let jayapura = row(&rows, "JAYAPURA");
    assert_eq!(jayapura["revenue"]["mtd"], 2000.0);
    assert_eq!(jayapura["attainment"]["target"], Value::Null);
}

#[tokio::test]
async fn test_revenue_c3mr_channel() {
    let client = seeded();
    let rows = client
        .rows(&format!("/household/revenue-c3mr-channel?{}", DATE))
        .await;
    let ambon = row(&rows, "AMBON");
    assert_eq!(ambon["total_mtd"], 1000.0);

    let channels = ambon["channels"].as_array().unwrap();
    let grapari = channels.iter().find(|c| c["channel"] == "GRAPARI").unwrap();
    assert_eq!(grapari["mtd"], 700.0);
    assert_eq!(grapari["m1"], 400.0);
    assert_eq!(grapari["mom"], "75.00%");
    assert_eq!(grapari["share"], "70.00%");

    let agency = channels.iter().find(|c| c["channel"] == "AGENCY").unwrap();
    assert_eq!(agency["mtd"], 0.0);
    assert_eq!(agency["mom"], Value::Null);

    assert_eq!(row(&rows, "JAYAPURA")["total_mtd"], 0.0);
}

#[tokio::test]
async fn test_funnel_excludes_duplicated_and_terminal_services() {
    let client = client();
    client.add_order(OrderSeed {
        fallout_category: Some("KENDALA TEKNIK".into()),
        fallout_subcategory: Some("ODP FULL".into()),
        provisioning_days: Some(5.0),
        ..order("A1", "SVC-A", "FALLOUT", "2025-04-05", "AMB")
    });
    // Duplicate service with a cancelled record: dropped entirely.
    client.add_order(order("B1", "SVC-B", "REGISTRATION", "2025-04-06", "AMB"));
    client.add_order(order("B2", "SVC-B", "CANCELLED", "2025-04-07", "PSO"));
    client.add_order(ps_order("C1", "2025-04-08", "2025-04-12", "TUL"));
    client.add_order(order("D1", "SVC-D", "REGISTRATION", "2025-03-10", "TUL"));
    // Registered before the previous month.
    client.add_order(order("E1", "SVC-E", "REGISTRATION", "2025-02-10", "AMB"));
    client.add_order(OrderSeed {
        provisioning_days: Some(2.0),
        ..order("F1", "SVC-F", "PROVISION_ISSUED", "2025-04-20", "JPR")
    });

    let rows = client.rows(&format!("/household/funnel?{}", DATE)).await;
    let ambon = row(&rows, "AMBON");
    assert_eq!(ambon["in_flight"], 2);

    let stage = |r: &Value, name: &str| {
        r["stages"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["stage"] == name)
            .map(|s| s["count"].as_i64().unwrap())
            .unwrap()
    };
    assert_eq!(stage(ambon, "REGISTRATION"), 1);
    assert_eq!(stage(ambon, "FALLOUT"), 1);
    assert_eq!(stage(ambon, "PROVISION_ISSUED"), 0);

    assert_eq!(ambon["fallout_total"], 1);
    let technical = ambon["fallout"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["category"] == "KENDALA TEKNIK")
        .unwrap();
    assert_eq!(technical["total"], 1);
    let odp_full = technical["subcategories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["subcategory"] == "ODP FULL")
        .unwrap();
    assert_eq!(odp_full["count"], 1);

    assert_eq!(ambon["duration_known"], 1);
    let band = ambon["durations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["bucket"] == "4-7 days")
        .unwrap();
    assert_eq!(band["count"], 1);
    assert_eq!(band["percentage"], "100.00%");

    let jayapura = row(&rows, "JAYAPURA");
    assert_eq!(jayapura["in_flight"], 1);
    assert_eq!(stage(jayapura, "PROVISION_ISSUED"), 1);
}

#[tokio::test]
async fn test_funnel_without_durations_has_null_percentages() {
    let client = client();
    client.add_order(order("A1", "SVC-A", "REGISTRATION", "2025-04-05", "AMB"));
    let rows = client.rows(&format!("/household/funnel?{}", DATE)).await;
    let ambon = row(&rows, "AMBON");
    assert_eq!(ambon["duration_known"], 0);
    assert!(ambon["durations"]
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["percentage"].is_null()));
}
