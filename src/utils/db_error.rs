//! Classification of raw `sqlx` errors.

/// Name of the primary key constraint on `mappings.code`.
pub const MAPPINGS_CODE_CONSTRAINT: &str = "mappings_pkey";

/// Returns `true` if `e` is a unique violation on the mapping code.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(MAPPINGS_CODE_CONSTRAINT) | None)
}

/// Returns `true` if the pool could not hand out a connection in time.
pub fn is_pool_timeout(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::PoolTimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation_on_code(&sqlx::Error::RowNotFound));
        assert!(!is_unique_violation_on_code(&sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn test_pool_timeout_detection() {
        assert!(is_pool_timeout(&sqlx::Error::PoolTimedOut));
        assert!(!is_pool_timeout(&sqlx::Error::RowNotFound));
    }
}
