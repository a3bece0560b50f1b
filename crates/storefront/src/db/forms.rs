//! Repository for contact submissions and newsletter subscribers.

use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use nfluential_core::Email;

use super::RepositoryError;
use crate::models::NewContactSubmission;

/// Outcome of a newsletter subscription attempt.
///
/// A duplicate email is a benign outcome, not a failure: the subscriber's
/// intent - being subscribed - is already satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// A new subscriber row was created.
    Subscribed,
    /// The email was already on the list.
    AlreadySubscribed,
}

/// Repository for form persistence.
pub struct FormsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FormsRepository<'a> {
    /// Create a new forms repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a validated contact submission.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_submission(
        &self,
        submission: &NewContactSubmission,
    ) -> Result<Uuid, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO contact_submissions (name, email, subject, message, captcha_answer)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(&submission.name)
        .bind(submission.email.as_str())
        .bind(submission.subject.as_str())
        .bind(&submission.message)
        .bind(&submission.captcha_answer)
        .fetch_one(self.pool)
        .await?;

        Ok(row.try_get::<Uuid, _>("id")?)
    }

    /// Insert a newsletter subscriber, reporting duplicates as a distinct
    /// outcome rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` for failures other than the
    /// unique-email violation.
    pub async fn subscribe(&self, email: &Email) -> Result<SubscribeOutcome, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO newsletter_subscribers (email)
            VALUES ($1)
            ",
        )
        .bind(email.as_str())
        .execute(self.pool)
        .await;

        match result {
            Ok(_) => Ok(SubscribeOutcome::Subscribed),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(SubscribeOutcome::AlreadySubscribed)
            }
            Err(e) => Err(e.into()),
        }
    }
}
