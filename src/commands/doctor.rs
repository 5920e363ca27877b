// Copyright (c) Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Category;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    for cat in Category::ALL {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, {col} FROM {table} WHERE {col} IS NOT NULL",
            col = cat.value_column(),
            table = cat.table()
        ))?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            let raw: String = r.get(1)?;
            match Decimal::from_str_exact(&raw) {
                Err(_) => {
                    rows.push(vec![
                        "unparsable_value".into(),
                        format!("{} id={} value='{}'", cat.table(), id, raw),
                    ]);
                }
                Ok(v) if v.is_sign_negative() => {
                    rows.push(vec![
                        "negative_value".into(),
                        format!("{} id={} value={}", cat.table(), id, v),
                    ]);
                }
                Ok(_) => {}
            }
        }
    }

    // Orphans should be impossible with foreign keys on, but older databases
    // may have been written without the pragma.
    for cat in Category::ALL {
        let mut stmt = conn.prepare(&format!(
            "SELECT r.id FROM {table} r LEFT JOIN users u ON r.user_id=u.id WHERE u.id IS NULL",
            table = cat.table()
        ))?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            rows.push(vec![
                "orphaned_record".into(),
                format!("{} id={}", cat.table(), id),
            ]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
