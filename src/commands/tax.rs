// Copyright (c) 2025 Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::patrimoine::Snapshot;
use crate::utils::{fmt_money, id_for_user, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("ifi", sub)) => ifi(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// IFI liability threshold: the tax is only owed above this base.
fn ifi_threshold() -> Decimal {
    Decimal::from(1_300_000i64)
}

/// Banded IFI estimate on a property base. Rates apply from 800k even though
/// liability starts at 1.3M, matching the published scale. Zero below the
/// threshold or for a non-positive base.
pub fn ifi_due(base: Decimal) -> Decimal {
    if base < ifi_threshold() {
        return Decimal::ZERO;
    }
    // (band floor, band ceiling, rate)
    let bands = [
        (800_000i64, 1_300_000i64, Decimal::new(5, 3)),
        (1_300_000, 2_570_000, Decimal::new(7, 3)),
        (2_570_000, 5_000_000, Decimal::new(1, 2)),
        (5_000_000, 10_000_000, Decimal::new(125, 4)),
        (10_000_000, i64::MAX, Decimal::new(15, 3)),
    ];
    let mut due = Decimal::ZERO;
    for (floor, ceiling, rate) in bands {
        let floor = Decimal::from(floor);
        let ceiling = Decimal::from(ceiling);
        if base <= floor {
            break;
        }
        let taxed = base.min(ceiling) - floor;
        due += taxed * rate;
    }
    due
}

#[derive(Serialize)]
struct IfiEstimate {
    immobilier: Decimal,
    credit: Decimal,
    base: Decimal,
    due: Decimal,
}

fn ifi(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = sub.get_one::<String>("user").unwrap();

    let user_id = id_for_user(conn, user)?;
    let snap = Snapshot::compute(conn, Some(user_id))?;

    // Simplified base: declared property minus outstanding credit, floored
    // at zero. Real IFI deductibility rules are out of scope here.
    let base = (snap.immobilier - snap.credit).max(Decimal::ZERO);
    let est = IfiEstimate {
        immobilier: snap.immobilier,
        credit: snap.credit,
        base,
        due: ifi_due(base),
    };

    if !maybe_print_json(json_flag, jsonl_flag, &est)? {
        let rows = vec![
            vec!["Immobilier".into(), fmt_money(&est.immobilier)],
            vec!["Credits".into(), fmt_money(&-est.credit)],
            vec!["Taxable base".into(), fmt_money(&est.base)],
            vec!["Estimated IFI".into(), fmt_money(&est.due)],
        ];
        println!("IFI estimate for {}\n{}", user, pretty_table(&["", "EUR"], rows));
    }
    Ok(())
}
