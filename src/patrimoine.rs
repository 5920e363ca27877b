// Copyright (c) 2025 Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Net-worth aggregation across the six holding tables.
//!
//! A snapshot is recomputed from scratch on every request and never written
//! back. The computation is fail-closed: if any category query fails the
//! whole snapshot is abandoned rather than returning a partial total.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::PatrimoineError;
use crate::models::Category;

/// Derived net-worth figures for one user, or for the whole book when
/// computed without a user filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub immobilier: Decimal,
    pub bancaire: Decimal,
    pub assurance_vie: Decimal,
    pub entreprise: Decimal,
    pub autres: Decimal,
    pub credit: Decimal,
    pub total: Decimal,
}

impl Snapshot {
    /// Compute a snapshot from the holding tables, filtered by `user_id` when
    /// given. A `Some` id must reference an existing user; empty tables yield
    /// an all-zero snapshot.
    pub fn compute(
        conn: &Connection,
        user_id: Option<i64>,
    ) -> Result<Snapshot, PatrimoineError> {
        if let Some(id) = user_id {
            let found: Option<i64> = conn
                .query_row("SELECT id FROM users WHERE id=?1", params![id], |r| {
                    r.get(0)
                })
                .optional()?;
            if found.is_none() {
                return Err(PatrimoineError::UnknownUser(id));
            }
        }

        // The six queries are independent; there is no ordering dependency,
        // so they simply run back to back against disjoint tables.
        let mut totals = [Decimal::ZERO; 6];
        for (slot, cat) in totals.iter_mut().zip(Category::ALL) {
            *slot = category_total(conn, cat, user_id)?;
        }
        let [immobilier, bancaire, assurance_vie, entreprise, autres, credit] = totals;

        Ok(Snapshot {
            immobilier,
            bancaire,
            assurance_vie,
            entreprise,
            autres,
            credit,
            total: immobilier + bancaire + assurance_vie + entreprise + autres - credit,
        })
    }

    pub fn get(&self, cat: Category) -> Decimal {
        match cat {
            Category::Immobilier => self.immobilier,
            Category::Bancaire => self.bancaire,
            Category::AssuranceVie => self.assurance_vie,
            Category::Entreprise => self.entreprise,
            Category::Autres => self.autres,
            Category::Credit => self.credit,
        }
    }

    /// Category share of the total, in percent. Liability shares are signed
    /// negative, so the six shares always sum to 100 for a positive total.
    ///
    /// Policy for degenerate totals: when the total is zero or negative
    /// (credits exceeding assets) every share is 0. With a positive total the
    /// share is unclamped, so a single asset category can exceed 100 when
    /// credit shrinks the denominator. Never NaN or infinite.
    pub fn share(&self, cat: Category) -> Decimal {
        if self.total <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let raw = self.get(cat) / self.total * Decimal::ONE_HUNDRED;
        if cat.is_liability() { -raw } else { raw }
    }

    /// (category, value, share) triples for all six categories, in the
    /// breakdown display order (assets first, credit last).
    pub fn breakdown(&self) -> Vec<(Category, Decimal, Decimal)> {
        Category::ALL
            .into_iter()
            .map(|c| (c, self.get(c), self.share(c)))
            .collect()
    }

    pub fn is_zero(&self) -> bool {
        self.total.is_zero() && Category::ALL.into_iter().all(|c| self.get(c).is_zero())
    }
}

/// Sum one category's value column, NULL rows counting as zero. Values are
/// stored as decimal strings and summed exactly.
fn category_total(
    conn: &Connection,
    cat: Category,
    user_id: Option<i64>,
) -> Result<Decimal, PatrimoineError> {
    // Table and column names come from the static category mapping, never
    // from user input.
    let sql = format!(
        "SELECT {col} FROM {table}",
        col = cat.value_column(),
        table = cat.table()
    );

    let mut total = Decimal::ZERO;
    let mut add = |value: Option<String>| -> Result<(), PatrimoineError> {
        if let Some(s) = value {
            let d = Decimal::from_str_exact(&s).map_err(|_| PatrimoineError::InvalidValue {
                table: cat.table(),
                value: s,
            })?;
            total += d;
        }
        Ok(())
    };

    match user_id {
        Some(id) => {
            let mut stmt = conn.prepare(&format!("{sql} WHERE user_id=?1"))?;
            let mut rows = stmt.query(params![id])?;
            while let Some(r) = rows.next()? {
                add(r.get::<_, Option<String>>(0)?)?;
            }
        }
        None => {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query([])?;
            while let Some(r) = rows.next()? {
                add(r.get::<_, Option<String>>(0)?)?;
            }
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use std::str::FromStr;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        conn.execute("INSERT INTO users(id, name) VALUES (1, 'Dupont')", [])
            .unwrap();
        conn.execute("INSERT INTO users(id, name) VALUES (2, 'Martin')", [])
            .unwrap();
        conn
    }

    fn insert(conn: &Connection, cat: Category, user_id: i64, label: &str, value: &str) {
        conn.execute(
            &format!(
                "INSERT INTO {}(user_id, label, {}, acquired_on) VALUES (?1, ?2, ?3, '2020-01-01')",
                cat.table(),
                cat.value_column()
            ),
            params![user_id, label, value],
        )
        .unwrap();
    }

    #[test]
    fn credit_reduces_total_and_shares_may_exceed_100() {
        let conn = setup_conn();
        insert(&conn, Category::Immobilier, 1, "Appartement Paris", "300000");
        insert(&conn, Category::Bancaire, 1, "Livret A", "50000");
        insert(&conn, Category::Credit, 1, "Pret immobilier", "100000");

        let snap = Snapshot::compute(&conn, Some(1)).unwrap();
        assert_eq!(snap.total, Decimal::from_str("250000").unwrap());
        // Credit shrinks the denominator: 300000 / 250000 = 120%.
        assert_eq!(snap.share(Category::Immobilier), Decimal::from(120));
        assert_eq!(snap.share(Category::Bancaire), Decimal::from(20));
        // The liability share is signed, keeping the sum at 100.
        assert_eq!(snap.share(Category::Credit), Decimal::from(-40));
        let sum: Decimal = Category::ALL.into_iter().map(|c| snap.share(c)).sum();
        assert_eq!(sum, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn empty_book_is_all_zero_with_zero_shares() {
        let conn = setup_conn();
        let snap = Snapshot::compute(&conn, Some(1)).unwrap();
        assert!(snap.is_zero());
        for cat in Category::ALL {
            assert_eq!(snap.share(cat), Decimal::ZERO);
        }
    }

    #[test]
    fn asset_shares_sum_to_100_without_credit() {
        let conn = setup_conn();
        insert(&conn, Category::Immobilier, 1, "Maison", "200000");
        insert(&conn, Category::Bancaire, 1, "Compte courant", "100000");

        let snap = Snapshot::compute(&conn, Some(1)).unwrap();
        assert_eq!(snap.total, Decimal::from(300000));

        let immo = snap.share(Category::Immobilier);
        let bank = snap.share(Category::Bancaire);
        let tol = Decimal::from_str("0.1").unwrap();
        assert!((immo - Decimal::from_str("66.7").unwrap()).abs() < tol);
        assert!((bank - Decimal::from_str("33.3").unwrap()).abs() < tol);
        let sum: Decimal = Category::ASSETS.into_iter().map(|c| snap.share(c)).sum();
        assert!((sum - Decimal::ONE_HUNDRED).abs() < tol);
    }

    #[test]
    fn failing_query_aborts_whole_snapshot() {
        let conn = setup_conn();
        insert(&conn, Category::Immobilier, 1, "Maison", "200000");
        conn.execute_batch("DROP TABLE credits").unwrap();

        let err = Snapshot::compute(&conn, Some(1)).unwrap_err();
        assert!(matches!(err, PatrimoineError::Storage(_)));
    }

    #[test]
    fn negative_total_yields_defined_zero_shares() {
        let conn = setup_conn();
        insert(&conn, Category::Bancaire, 1, "Compte courant", "100000");
        insert(&conn, Category::Credit, 1, "Pret conso", "500000");

        let snap = Snapshot::compute(&conn, Some(1)).unwrap();
        assert_eq!(snap.total, Decimal::from(-400000));
        for cat in Category::ALL {
            assert_eq!(snap.share(cat), Decimal::ZERO);
        }
    }

    #[test]
    fn null_values_count_as_zero() {
        let conn = setup_conn();
        insert(&conn, Category::AssuranceVie, 1, "Contrat Vie+", "75000");
        conn.execute(
            "INSERT INTO assurance_vie(user_id, label, value, acquired_on)
             VALUES (1, 'Contrat sans valorisation', NULL, '2021-06-01')",
            [],
        )
        .unwrap();

        let snap = Snapshot::compute(&conn, Some(1)).unwrap();
        assert_eq!(snap.assurance_vie, Decimal::from(75000));
        assert_eq!(snap.total, Decimal::from(75000));
    }

    #[test]
    fn unknown_user_is_an_error_not_an_empty_snapshot() {
        let conn = setup_conn();
        let err = Snapshot::compute(&conn, Some(99)).unwrap_err();
        assert!(matches!(err, PatrimoineError::UnknownUser(99)));
    }

    #[test]
    fn user_filter_isolates_holdings() {
        let conn = setup_conn();
        insert(&conn, Category::Immobilier, 1, "Maison Dupont", "300000");
        insert(&conn, Category::Immobilier, 2, "Maison Martin", "450000");
        insert(&conn, Category::Credit, 2, "Pret Martin", "150000");

        let dupont = Snapshot::compute(&conn, Some(1)).unwrap();
        assert_eq!(dupont.total, Decimal::from(300000));

        let martin = Snapshot::compute(&conn, Some(2)).unwrap();
        assert_eq!(martin.total, Decimal::from(300000));

        let all = Snapshot::compute(&conn, None).unwrap();
        assert_eq!(all.immobilier, Decimal::from(750000));
        assert_eq!(all.total, Decimal::from(600000));
    }

    #[test]
    fn total_equals_assets_minus_credit() {
        let conn = setup_conn();
        insert(&conn, Category::Immobilier, 1, "Studio", "120000.50");
        insert(&conn, Category::Bancaire, 1, "PEL", "23000.25");
        insert(&conn, Category::AssuranceVie, 1, "AV", "41000");
        insert(&conn, Category::Entreprise, 1, "Parts SARL", "15500.75");
        insert(&conn, Category::Autres, 1, "Oeuvre d'art", "8000");
        insert(&conn, Category::Credit, 1, "Pret", "90000.10");

        let snap = Snapshot::compute(&conn, Some(1)).unwrap();
        let assets: Decimal = Category::ASSETS.into_iter().map(|c| snap.get(c)).sum();
        assert_eq!(snap.total, assets - snap.credit);
        assert_eq!(snap.total, Decimal::from_str("117501.40").unwrap());

        // Signed shares across all six categories close to 100.
        let sum: Decimal = Category::ALL.into_iter().map(|c| snap.share(c)).sum();
        let tol = Decimal::from_str("0.001").unwrap();
        assert!((sum - Decimal::ONE_HUNDRED).abs() < tol, "shares sum to {}", sum);
    }

    #[test]
    fn invalid_stored_value_is_reported_with_table() {
        let conn = setup_conn();
        insert(&conn, Category::Bancaire, 1, "Compte corrompu", "not-a-number");

        let err = Snapshot::compute(&conn, Some(1)).unwrap_err();
        assert!(err.to_string().contains("comptes_bancaires"));
        assert!(err.to_string().contains("not-a-number"));
    }
}
