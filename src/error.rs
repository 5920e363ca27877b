// Copyright (c) Atelier Patrimoine.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatrimoineError {
    #[error("unknown user id {0}")]
    UnknownUser(i64),

    #[error(
        "unknown category '{0}' (expected immobilier, bancaire, assurance-vie, entreprise, autres or credit)"
    )]
    UnknownCategory(String),

    #[error("invalid stored value '{value}' in table {table}")]
    InvalidValue { table: &'static str, value: String },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}
