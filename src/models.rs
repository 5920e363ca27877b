// Copyright (c) 2025 Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PatrimoineError;

/// The six holding categories, each backed by its own table. Credits are the
/// only liability: their column is the outstanding principal and they reduce
/// the net-worth total instead of adding to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Immobilier,
    Bancaire,
    AssuranceVie,
    Entreprise,
    Autres,
    Credit,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Immobilier,
        Category::Bancaire,
        Category::AssuranceVie,
        Category::Entreprise,
        Category::Autres,
        Category::Credit,
    ];

    /// Asset categories only, in the order they appear in breakdowns.
    pub const ASSETS: [Category; 5] = [
        Category::Immobilier,
        Category::Bancaire,
        Category::AssuranceVie,
        Category::Entreprise,
        Category::Autres,
    ];

    pub fn table(self) -> &'static str {
        match self {
            Category::Immobilier => "immobilier",
            Category::Bancaire => "comptes_bancaires",
            Category::AssuranceVie => "assurance_vie",
            Category::Entreprise => "participations_entreprise",
            Category::Autres => "autres_patrimoines",
            Category::Credit => "credits",
        }
    }

    pub fn value_column(self) -> &'static str {
        match self {
            Category::Credit => "capital_restant_du",
            _ => "value",
        }
    }

    pub fn is_liability(self) -> bool {
        matches!(self, Category::Credit)
    }

    /// Human-readable name used in tables and exports.
    pub fn label(self) -> &'static str {
        match self {
            Category::Immobilier => "Immobilier",
            Category::Bancaire => "Comptes bancaires",
            Category::AssuranceVie => "Assurance vie",
            Category::Entreprise => "Participations entreprise",
            Category::Autres => "Autres patrimoines",
            Category::Credit => "Credits",
        }
    }

    /// CLI spelling, also accepted by `parse`.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Immobilier => "immobilier",
            Category::Bancaire => "bancaire",
            Category::AssuranceVie => "assurance-vie",
            Category::Entreprise => "entreprise",
            Category::Autres => "autres",
            Category::Credit => "credit",
        }
    }

    pub fn parse(s: &str) -> Result<Category, PatrimoineError> {
        let norm = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.slug() == norm || c.table() == norm)
            .ok_or_else(|| PatrimoineError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// One row of any of the six holding tables, joined with its owner's name.
/// For credits `value` is the outstanding principal; an unvalued holding
/// reads as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub id: i64,
    pub user: String,
    pub category: Category,
    pub label: String,
    pub value: Decimal,
    pub acquired_on: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_slug_and_table_name() {
        assert_eq!(
            Category::parse("assurance-vie").unwrap(),
            Category::AssuranceVie
        );
        assert_eq!(
            Category::parse("assurance_vie").unwrap(),
            Category::AssuranceVie
        );
        assert_eq!(Category::parse(" CREDIT ").unwrap(), Category::Credit);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = Category::parse("crypto").unwrap_err();
        assert!(err.to_string().contains("crypto"));
    }

    #[test]
    fn credit_maps_to_outstanding_principal() {
        assert_eq!(Category::Credit.value_column(), "capital_restant_du");
        assert!(Category::Credit.is_liability());
        for cat in Category::ASSETS {
            assert_eq!(cat.value_column(), "value");
            assert!(!cat.is_liability());
        }
    }

    #[test]
    fn category_serializes_as_kebab_case() {
        let s = serde_json::to_string(&Category::AssuranceVie).unwrap();
        assert_eq!(s, "\"assurance-vie\"");
    }
}
