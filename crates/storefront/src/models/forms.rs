//! Models for the public contact and newsletter forms.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nfluential_core::Email;

/// The fixed set of subjects the contact form accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactSubject {
    Collabs,
    Sales,
    Support,
    Advertising,
    Publishing,
    Marketing,
    General,
}

impl ContactSubject {
    /// Parse a subject from its wire value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "collabs" => Some(Self::Collabs),
            "sales" => Some(Self::Sales),
            "support" => Some(Self::Support),
            "advertising" => Some(Self::Advertising),
            "publishing" => Some(Self::Publishing),
            "marketing" => Some(Self::Marketing),
            "general" => Some(Self::General),
            _ => None,
        }
    }

    /// Wire/storage value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collabs => "collabs",
            Self::Sales => "sales",
            Self::Support => "support",
            Self::Advertising => "advertising",
            Self::Publishing => "publishing",
            Self::Marketing => "marketing",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for ContactSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated contact submission ready to persist.
///
/// Immutable once persisted; a submission that fails any field validation is
/// rejected entirely, never partially stored.
#[derive(Debug, Clone)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: Email,
    pub subject: ContactSubject,
    pub message: String,
    pub captcha_answer: String,
}

/// A persisted contact submission.
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    pub subject: ContactSubject,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted newsletter subscriber. Email is the unique key.
#[derive(Debug, Clone)]
pub struct NewsletterSubscriber {
    pub id: Uuid,
    pub email: Email,
    pub subscribed_at: DateTime<Utc>,
}
