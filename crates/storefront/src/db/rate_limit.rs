//! Store-backed rate limiting for public write endpoints.
//!
//! Attempts are an append-only `(ip_address, endpoint, attempted_at)` log; a
//! request is permitted while the count of attempts inside the trailing
//! window stays below the endpoint's threshold. Correctness relies on the
//! store's read-after-write consistency - there is no in-memory state and no
//! cross-instance coordination, so concurrent requests may let a borderline
//! attempt through. That is tolerated for these low-traffic form endpoints.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use sqlx::Row;

use super::RepositoryError;

/// Repository over the `rate_limit_attempts` log.
pub struct RateLimitRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RateLimitRepository<'a> {
    /// Create a new rate-limit repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether another request from `ip` against `endpoint` is allowed.
    ///
    /// Returns `true` while fewer than `max_requests` attempts were recorded
    /// in the trailing `window_minutes`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the count query fails. Callers
    /// gating public forms treat that as allowed rather than turning a store
    /// outage into a lockout.
    pub async fn check(
        &self,
        ip: &str,
        endpoint: &str,
        max_requests: i64,
        window_minutes: i64,
    ) -> Result<bool, RepositoryError> {
        let start = window_start(Utc::now(), window_minutes);

        let row = sqlx::query(
            r"
            SELECT COUNT(*) AS attempts
            FROM rate_limit_attempts
            WHERE ip_address = $1
              AND endpoint = $2
              AND attempted_at >= $3
            ",
        )
        .bind(ip)
        .bind(endpoint)
        .bind(start)
        .fetch_one(self.pool)
        .await?;

        let attempts: i64 = row.try_get("attempts")?;
        Ok(attempts < max_requests)
    }

    /// Append an attempt to the log.
    ///
    /// Recording is a separate, explicit step performed only after a request
    /// passes validation, so invalid requests do not consume quota.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record(&self, ip: &str, endpoint: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO rate_limit_attempts (ip_address, endpoint)
            VALUES ($1, $2)
            ",
        )
        .bind(ip)
        .bind(endpoint)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}

/// Start of the trailing window ending at `now`.
fn window_start(now: DateTime<Utc>, window_minutes: i64) -> DateTime<Utc> {
    now - Duration::minutes(window_minutes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_window_start_subtracts_minutes() {
        let now = "2026-08-06T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let start = window_start(now, 60);
        assert_eq!(start, "2026-08-06T11:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_window_start_zero_window() {
        let now = Utc::now();
        assert_eq!(window_start(now, 0), now);
    }
}
