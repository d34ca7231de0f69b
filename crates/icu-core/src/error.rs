//! Simulator error type.
//!
//! Sub-crates define their own error enums and wrap `IcuError` as one
//! `#[from]` variant.
//!
//! | Variant              | Handling                                          |
//! |----------------------|---------------------------------------------------|
//! | `Config`             | fatal, reported by the builder before any step    |
//! | `InvariantViolation` | fatal, aborts the run from inside `Model::step`   |
//! | `DataUnavailable`    | recovered where raised: the day gets zero arrivals |

use thiserror::Error;

use crate::{DepartmentId, PatientId};

#[derive(Debug, Error)]
pub enum IcuError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("calibration data unavailable: {0}")]
    DataUnavailable(String),

    #[error("patient {0} not found")]
    PatientNotFound(PatientId),

    #[error("department {0} not found")]
    DepartmentNotFound(DepartmentId),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `icu-*` crates.
pub type IcuResult<T> = Result<T, IcuError>;
