// Copyright (c) Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use patrimoine::{cli, commands::users, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn user_matches(args: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["patrimoine", "user"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    let Some(("user", sub)) = matches.subcommand() else {
        panic!("no user subcommand");
    };
    sub.clone()
}

#[test]
fn add_trims_and_stores_optional_email() {
    let conn = setup();
    let m = user_matches(&["add", "--name", " Dupont ", "--email", " j.dupont@example.fr "]);
    users::handle(&conn, &m).unwrap();

    let (name, email): (String, Option<String>) = conn
        .query_row("SELECT name, email FROM users", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(name, "Dupont");
    assert_eq!(email.as_deref(), Some("j.dupont@example.fr"));
}

#[test]
fn duplicate_names_are_rejected() {
    let conn = setup();
    let m = user_matches(&["add", "--name", "Dupont"]);
    users::handle(&conn, &m).unwrap();
    let m = user_matches(&["add", "--name", "Dupont"]);
    assert!(users::handle(&conn, &m).is_err());
}

#[test]
fn rm_cascades_to_holdings() {
    let conn = setup();
    conn.execute("INSERT INTO users(id, name) VALUES (1, 'Dupont')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO immobilier(user_id, label, value, acquired_on) VALUES (1, 'Maison', '250000', '2018-01-01')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO credits(user_id, label, capital_restant_du, acquired_on) VALUES (1, 'Pret', '90000', '2018-01-01')",
        [],
    )
    .unwrap();

    let m = user_matches(&["rm", "--name", "Dupont"]);
    users::handle(&conn, &m).unwrap();

    let immo: i64 = conn
        .query_row("SELECT COUNT(*) FROM immobilier", [], |r| r.get(0))
        .unwrap();
    let credits: i64 = conn
        .query_row("SELECT COUNT(*) FROM credits", [], |r| r.get(0))
        .unwrap();
    assert_eq!(immo, 0);
    assert_eq!(credits, 0);
}

#[test]
fn rm_unknown_client_is_an_error() {
    let conn = setup();
    let m = user_matches(&["rm", "--name", "Nobody"]);
    let err = users::handle(&conn, &m).unwrap_err();
    assert!(err.to_string().contains("Nobody"));
}
