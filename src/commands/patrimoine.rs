// Copyright (c) 2025 Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Category;
use crate::patrimoine::Snapshot;
use crate::utils::{fmt_money, fmt_share, id_for_user, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("all", sub)) => all(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = sub.get_one::<String>("user").unwrap();

    let user_id = id_for_user(conn, user)?;
    let snap = Snapshot::compute(conn, Some(user_id))?;

    if maybe_print_json(json_flag, jsonl_flag, &snap)? {
        return Ok(());
    }

    let mut rows = Vec::new();
    for (cat, value, share) in snap.breakdown() {
        let signed = if cat.is_liability() { -value } else { value };
        rows.push(vec![
            cat.label().to_string(),
            fmt_money(&signed),
            fmt_share(&share),
        ]);
    }
    rows.push(vec![
        "Total".to_string(),
        fmt_money(&snap.total),
        String::new(),
    ]);
    println!(
        "Patrimoine of {}\n{}",
        user,
        pretty_table(&["Category", "Value", "Share"], rows)
    );
    Ok(())
}

fn all(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY name")?;
    let users = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))?;

    let mut entries = Vec::new();
    for user in users {
        let (id, name) = user?;
        let snap = Snapshot::compute(conn, Some(id))?;
        entries.push((name, snap));
    }
    let book = Snapshot::compute(conn, None)?;
    entries.push(("(all clients)".to_string(), book));

    if json_flag || jsonl_flag {
        let items: Vec<serde_json::Value> = entries
            .iter()
            .map(|(name, snap)| {
                let mut v = serde_json::to_value(snap).unwrap_or_default();
                if let Some(obj) = v.as_object_mut() {
                    obj.insert("user".into(), serde_json::Value::String(name.clone()));
                }
                v
            })
            .collect();
        maybe_print_json(json_flag, jsonl_flag, &items)?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|(name, snap)| {
            let mut row = vec![name.clone()];
            for cat in Category::ALL {
                row.push(format!("{:.2}", snap.get(cat)));
            }
            row.push(format!("{:.2}", snap.total));
            row
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Client",
                "Immobilier",
                "Bancaire",
                "Assurance vie",
                "Entreprise",
                "Autres",
                "Credits",
                "Total",
            ],
            rows,
        )
    );
    Ok(())
}
