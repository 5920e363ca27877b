// Copyright (c) Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::assets;
use crate::models::Category;
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("records", sub)) => export_records(conn, sub),
        _ => Ok(()),
    }
}

fn export_records(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let user = sub.get_one::<String>("user").map(|s| s.as_str());

    let rows = assets::query_rows(conn, user, None)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "user", "category", "label", "value", "acquired_on"])?;
            for r in &rows {
                wtr.write_record([
                    r.id.to_string(),
                    r.user.clone(),
                    r.category.to_string(),
                    r.label.clone(),
                    r.value.to_string(),
                    r.acquired_on.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<serde_json::Value> = rows
                .iter()
                .map(|r| {
                    json!({
                        "id": r.id, "user": r.user, "category": r.category.to_string(),
                        "label": r.label, "value": r.value.to_string(),
                        "acquired_on": r.acquired_on.to_string()
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
        }
    }
    println!(
        "Exported {} records across {} categories to {}",
        rows.len(),
        Category::ALL.len(),
        out
    );
    Ok(())
}
