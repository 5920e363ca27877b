// Copyright (c) 2025 Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use patrimoine::{cli, commands::export, db};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute("INSERT INTO users(id, name) VALUES (1, 'Dupont')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO immobilier(id, user_id, label, value, acquired_on)
         VALUES (1, 1, 'Appartement Paris', '300000', '2019-05-01')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO credits(id, user_id, label, capital_restant_du, acquired_on)
         VALUES (1, 1, 'Pret BNP', '180000', '2019-05-01')",
        [],
    )
    .unwrap();
    conn
}

fn export_matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["patrimoine", "export", "records"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    let Some(("export", sub)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    sub.clone()
}

#[test]
fn export_records_streams_pretty_json() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let m = export_matches(&["--format", "json", "--out", &out_str]);
    export::handle(&conn, &m).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": 1,
                "user": "Dupont",
                "category": "immobilier",
                "label": "Appartement Paris",
                "value": "300000",
                "acquired_on": "2019-05-01"
            },
            {
                "id": 1,
                "user": "Dupont",
                "category": "credit",
                "label": "Pret BNP",
                "value": "180000",
                "acquired_on": "2019-05-01"
            }
        ])
    );
}

#[test]
fn export_records_writes_csv_header_and_rows() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let m = export_matches(&["--format", "csv", "--out", &out_str]);
    export::handle(&conn, &m).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,user,category,label,value,acquired_on"
    );
    assert_eq!(lines.clone().count(), 2);
    assert!(contents.contains("credit,Pret BNP,180000"));
}

#[test]
fn export_records_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let m = export_matches(&["--format", "xml", "--out", &out_str]);
    assert!(export::handle(&conn, &m).is_err());
    assert!(!out_path.exists());
}
