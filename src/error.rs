//! Error types for the remuneration engine

use thiserror::Error;

/// Errors raised while loading tables, validating parameters or projecting
#[derive(Debug, Error)]
pub enum EngineError {
    /// Position code well formed but not present in the career table
    #[error("unknown career position: {0}")]
    UnknownPosition(String),

    /// Position code that does not parse as `<level>-<grade>`
    #[error("invalid position code {0:?}, expected <roman level>-<grade letter> such as \"II-C\"")]
    InvalidPositionCode(String),

    /// Parameter outside its allowed domain
    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("invalid date {year}-{month:02}")]
    InvalidDate { year: i32, month: u32 },

    #[error("table {0} has no entries")]
    EmptyTable(&'static str),

    /// Bracket bounds or ADE thresholds not strictly increasing
    #[error("table {0} is not sorted by its bound")]
    UnsortedTable(&'static str),

    #[error("unsupported schema version {0}")]
    UnsupportedSchema(u32),

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Reject NaN and negative values for amounts that must be non-negative
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> EngineResult<()> {
    if value.is_nan() || value < 0.0 {
        return Err(EngineError::InvalidParameter { name, value });
    }
    Ok(())
}

/// Reject annual rates that would make a compounding factor non-positive
pub(crate) fn ensure_rate(name: &'static str, value: f64) -> EngineResult<()> {
    if value.is_nan() || value <= -1.0 {
        return Err(EngineError::InvalidParameter { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_accepts_zero() {
        assert!(ensure_non_negative("working_days", 0.0).is_ok());
        assert!(ensure_non_negative("working_days", -1.0).is_err());
        assert!(ensure_non_negative("working_days", f64::NAN).is_err());
    }

    #[test]
    fn test_rate_bounds() {
        assert!(ensure_rate("inflation_rate", -0.5).is_ok());
        assert!(ensure_rate("inflation_rate", -1.0).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = EngineError::UnknownPosition("V-A".to_string());
        assert_eq!(err.to_string(), "unknown career position: V-A");

        let err = EngineError::InvalidParameter { name: "gepi_points", value: -3.0 };
        assert_eq!(err.to_string(), "invalid value for gepi_points: -3");
    }
}
