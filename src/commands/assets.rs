// Copyright (c) 2025 Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::PatrimoineError;
use crate::models::{Category, HoldingRecord};
use crate::utils::{id_for_user, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set-value", sub)) => set_value(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap().trim().to_string();
    let cat = Category::parse(sub.get_one::<String>("category").unwrap())?;
    let label = sub.get_one::<String>("label").unwrap().trim().to_string();
    let acquired = parse_date(sub.get_one::<String>("acquired").unwrap().trim())?;

    // A holding can be recorded before it is valued; NULL reads as 0.
    let value = match sub.get_one::<String>("value") {
        Some(raw) => {
            let v = parse_decimal(raw.trim())?;
            if v.is_sign_negative() {
                return Err(anyhow!("Value for {} must be non-negative, got {}", cat, v));
            }
            Some(v.to_string())
        }
        None => None,
    };

    let user_id = id_for_user(conn, &user)?;
    conn.execute(
        &format!(
            "INSERT INTO {}(user_id, label, {}, acquired_on) VALUES (?1, ?2, ?3, ?4)",
            cat.table(),
            cat.value_column()
        ),
        params![user_id, label, value, acquired.to_string()],
    )?;
    println!(
        "Recorded {} '{}' for {} ({})",
        cat,
        label,
        user,
        value.as_deref().unwrap_or("unvalued")
    );
    Ok(())
}

pub fn query_rows(
    conn: &Connection,
    user: Option<&str>,
    category: Option<Category>,
) -> Result<Vec<HoldingRecord>> {
    let user_id = match user {
        Some(name) => Some(id_for_user(conn, name)?),
        None => None,
    };
    let cats: Vec<Category> = match category {
        Some(c) => vec![c],
        None => Category::ALL.to_vec(),
    };

    let mut data = Vec::new();
    for cat in cats {
        let mut sql = format!(
            "SELECT r.id, u.name, r.label, r.{col}, r.acquired_on
             FROM {table} r JOIN users u ON r.user_id=u.id",
            col = cat.value_column(),
            table = cat.table()
        );
        if user_id.is_some() {
            sql.push_str(" WHERE r.user_id=?1");
        }
        sql.push_str(" ORDER BY r.acquired_on, r.id");

        let mut stmt = conn.prepare(&sql)?;
        let map_row = |r: &rusqlite::Row<'_>| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, Option<String>>(3)?,
                r.get::<_, String>(4)?,
            ))
        };
        let rows = match user_id {
            Some(id) => stmt.query_map(params![id], map_row)?,
            None => stmt.query_map([], map_row)?,
        };
        for row in rows {
            let (id, user, label, value_s, acquired_s) = row?;
            let value = match value_s {
                Some(s) => {
                    Decimal::from_str_exact(&s).map_err(|_| PatrimoineError::InvalidValue {
                        table: cat.table(),
                        value: s,
                    })?
                }
                None => Decimal::ZERO,
            };
            data.push(HoldingRecord {
                id,
                user,
                category: cat,
                label,
                value,
                acquired_on: parse_date(&acquired_s)?,
            });
        }
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = sub.get_one::<String>("user").map(|s| s.as_str());
    let category = match sub.get_one::<String>("category") {
        Some(s) => Some(Category::parse(s)?),
        None => None,
    };

    let data = query_rows(conn, user, category)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.user.clone(),
                    r.category.to_string(),
                    r.label.clone(),
                    r.value.to_string(),
                    r.acquired_on.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Client", "Category", "Label", "Value", "Acquired"],
                rows,
            )
        );
    }
    Ok(())
}

fn set_value(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let cat = Category::parse(sub.get_one::<String>("category").unwrap())?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let value = parse_decimal(sub.get_one::<String>("value").unwrap().trim())?;
    if value.is_sign_negative() {
        return Err(anyhow!(
            "Value for {} must be non-negative, got {}",
            cat,
            value
        ));
    }

    let changed = conn.execute(
        &format!(
            "UPDATE {} SET {}=?1 WHERE id=?2",
            cat.table(),
            cat.value_column()
        ),
        params![value.to_string(), id],
    )?;
    if changed == 0 {
        return Err(anyhow!("No {} holding with id {}", cat, id));
    }
    println!("Updated {} holding {} to {}", cat, id, value);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let cat = Category::parse(sub.get_one::<String>("category").unwrap())?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let changed = conn.execute(
        &format!("DELETE FROM {} WHERE id=?1", cat.table()),
        params![id],
    )?;
    if changed == 0 {
        return Err(anyhow!("No {} holding with id {}", cat, id));
    }
    println!("Removed {} holding {}", cat, id);
    Ok(())
}
