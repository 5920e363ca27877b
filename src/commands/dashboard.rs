// Copyright (c) Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Category;
use crate::utils::{id_for_user, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("stats", sub)) => stats(conn, sub)?,
        Some(("acquisitions", sub)) => acquisitions(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Record count and exact value total per category across the whole book.
/// NULL values count as zero; an unparsable stored value is an error, the
/// same as in a snapshot.
pub fn category_stats(conn: &Connection) -> Result<Vec<(Category, i64, Decimal)>> {
    let mut out = Vec::new();
    for cat in Category::ALL {
        let mut stmt = conn.prepare(&format!(
            "SELECT {col} FROM {table}",
            col = cat.value_column(),
            table = cat.table()
        ))?;
        let mut rows = stmt.query([])?;
        let mut count = 0i64;
        let mut total = Decimal::ZERO;
        while let Some(r) = rows.next()? {
            count += 1;
            if let Some(s) = r.get::<_, Option<String>>(0)? {
                total += Decimal::from_str_exact(&s)
                    .with_context(|| format!("Invalid stored value '{}' in {}", s, cat.table()))?;
            }
        }
        out.push((cat, count, total));
    }
    Ok(out)
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let clients: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;

    let data: Vec<Vec<String>> = category_stats(conn)?
        .into_iter()
        .map(|(cat, count, total)| {
            vec![
                cat.label().to_string(),
                count.to_string(),
                format!("{:.2}", total),
            ]
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("Clients: {}", clients);
        println!("{}", pretty_table(&["Category", "Records", "Total"], data));
    }
    Ok(())
}

/// Acquired asset value bucketed by acquisition year, credits excluded.
pub fn acquisitions_by_year(
    conn: &Connection,
    user_id: Option<i64>,
) -> Result<BTreeMap<String, Decimal>> {
    let mut map: BTreeMap<String, Decimal> = BTreeMap::new();
    for cat in Category::ASSETS {
        let mut sql = format!(
            "SELECT substr(acquired_on,1,4) AS year, {col} FROM {table}",
            col = cat.value_column(),
            table = cat.table()
        );
        if user_id.is_some() {
            sql.push_str(" WHERE user_id=?1");
        }
        let mut stmt = conn.prepare(&sql)?;
        let map_row = |r: &rusqlite::Row<'_>| {
            Ok((r.get::<_, String>(0)?, r.get::<_, Option<String>>(1)?))
        };
        let rows = match user_id {
            Some(id) => stmt.query_map(params![id], map_row)?,
            None => stmt.query_map([], map_row)?,
        };
        for row in rows {
            let (year, value_s) = row?;
            let value = match value_s {
                Some(s) => Decimal::from_str_exact(&s)
                    .with_context(|| format!("Invalid stored value '{}' in {}", s, cat.table()))?,
                None => Decimal::ZERO,
            };
            *map.entry(year).or_insert(Decimal::ZERO) += value;
        }
    }
    Ok(map)
}

fn acquisitions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = match sub.get_one::<String>("user") {
        Some(name) => Some(id_for_user(conn, name)?),
        None => None,
    };
    let map = acquisitions_by_year(conn, user_id)?;
    let rows: Vec<Vec<String>> = map
        .into_iter()
        .map(|(year, total)| vec![year, format!("{:.2}", total)])
        .collect();
    println!("{}", pretty_table(&["Year", "Acquired value"], rows));
    Ok(())
}
