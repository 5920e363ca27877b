// Copyright (c) Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let email = sub.get_one::<String>("email").map(|s| s.trim().to_string());
            conn.execute(
                "INSERT INTO users(name, email) VALUES (?1, ?2)",
                params![name, email],
            )?;
            println!("Added client '{}'", name);
        }
        Some(("list", _)) => {
            let mut stmt =
                conn.prepare("SELECT name, email, created_at FROM users ORDER BY name")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, Option<String>>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, e, cr) = row?;
                data.push(vec![n, e.unwrap_or_default(), cr]);
            }
            println!("{}", pretty_table(&["Name", "Email", "Created"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let changed = conn.execute("DELETE FROM users WHERE name=?1", params![name])?;
            if changed == 0 {
                return Err(anyhow!("No client named '{}'", name));
            }
            println!("Removed client '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
