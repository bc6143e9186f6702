// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error taxonomy for the ledger core.
//!
//! Every failing operation leaves the in-memory book and the persisted
//! collections as they were before the call.

use thiserror::Error;

pub type KhataResult<T> = Result<T, KhataError>;

#[derive(Debug, Error)]
pub enum KhataError {
    /// Missing required field or a negative amount. Nothing was written.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced account, transaction, variety or expense does not exist.
    #[error("{what} '{id}' not found")]
    NotFound { what: &'static str, id: String },

    /// An import or backup document could not be used.
    #[error("import failed: {0}")]
    Import(String),

    /// The storage backend refused the write or returned unreadable data.
    #[error("storage error: {0}")]
    Persistence(String),
}

impl KhataError {
    pub fn validation(msg: impl Into<String>) -> Self {
        KhataError::Validation(msg.into())
    }

    pub fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        KhataError::NotFound {
            what,
            id: id.into(),
        }
    }

    /// Stable code for front ends that branch on the error class.
    pub fn code(&self) -> &'static str {
        match self {
            KhataError::Validation(_) => "VALIDATION_ERROR",
            KhataError::NotFound { .. } => "NOT_FOUND",
            KhataError::Import(_) => "IMPORT_ERROR",
            KhataError::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }
}

impl From<rusqlite::Error> for KhataError {
    fn from(e: rusqlite::Error) -> Self {
        KhataError::Persistence(e.to_string())
    }
}
