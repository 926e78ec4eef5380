//! Adoption applications and their status lifecycle.
//!
//! ```text
//! PENDING ──► APPROVED ──► COMPLETED
//!    │            │
//!    ├──► REJECTED└──► CANCELLED
//!    └──► CANCELLED
//! ```
//!
//! REJECTED, COMPLETED and CANCELLED are terminal.

use super::{cat::Cat, display_or_unknown, user::User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// --- Status ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdoptionStatus {
    #[default]
    Pending,
    Approved,
    Completed,
    Rejected,
    Cancelled,
}

impl AdoptionStatus {
    pub const ALL: [AdoptionStatus; 5] = [
        AdoptionStatus::Pending,
        AdoptionStatus::Approved,
        AdoptionStatus::Completed,
        AdoptionStatus::Rejected,
        AdoptionStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionStatus::Pending => "PENDING",
            AdoptionStatus::Approved => "APPROVED",
            AdoptionStatus::Completed => "COMPLETED",
            AdoptionStatus::Rejected => "REJECTED",
            AdoptionStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AdoptionStatus::Completed | AdoptionStatus::Rejected | AdoptionStatus::Cancelled
        )
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: AdoptionStatus) -> bool {
        use AdoptionStatus::*;
        matches!(
            (self, next),
            (Pending, Approved | Rejected | Cancelled) | (Approved, Completed | Cancelled)
        )
    }
}

impl fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdoptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid adoption status: {s}"))
    }
}

// --- Errors ---

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AdoptionError {
    #[error("Invalid adoption status transition: {from} -> {to}")]
    InvalidTransition {
        from: AdoptionStatus,
        to: AdoptionStatus,
    },
}

// --- Adoption ---

/// Links one adopter to one cat. Both are shared references.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adoption {
    pub id: Option<i64>,
    pub user: Option<Arc<User>>,
    pub cat: Option<Arc<Cat>>,
    pub status: AdoptionStatus,
    pub adoption_date: Option<DateTime<Utc>>,
    pub approved_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    /// Expected to be an ADMIN user; not checked here.
    pub processed_by_admin: Option<Arc<User>>,
    pub tenant_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Adoption {
    /// Opens a PENDING application dated now.
    pub fn new(user: Arc<User>, cat: Arc<Cat>, notes: Option<String>) -> Self {
        Self {
            user: Some(user),
            cat: Some(cat),
            status: AdoptionStatus::Pending,
            adoption_date: Some(Utc::now()),
            notes,
            ..Self::default()
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == AdoptionStatus::Pending
    }

    pub fn is_approved(&self) -> bool {
        self.status == AdoptionStatus::Approved
    }

    pub fn is_completed(&self) -> bool {
        self.status == AdoptionStatus::Completed
    }

    pub fn is_rejected(&self) -> bool {
        self.status == AdoptionStatus::Rejected
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == AdoptionStatus::Cancelled
    }

    /// Pending and approved applications still hold the cat.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            AdoptionStatus::Pending | AdoptionStatus::Approved
        )
    }

    pub fn adopter_name(&self) -> String {
        display_or_unknown(self.user.as_deref().map(User::full_name))
    }

    pub fn cat_name(&self) -> String {
        display_or_unknown(self.cat.as_deref().map(|cat| cat.name.clone()))
    }

    pub fn cat_breed(&self) -> String {
        display_or_unknown(
            self.cat
                .as_deref()
                .and_then(Cat::breed_name)
                .map(str::to_string),
        )
    }

    pub fn days_from_application(&self) -> i64 {
        self.days_from_application_at(Utc::now())
    }

    /// Whole days elapsed since the application, partial days truncated.
    pub fn days_from_application_at(&self, now: DateTime<Utc>) -> i64 {
        self.adoption_date
            .map(|date| (now - date).num_days())
            .unwrap_or(0)
    }

    /// Called by the store before the first insert.
    pub fn on_create(&mut self) {
        let now = Utc::now();
        self.created_at = Some(now);
        self.updated_at = Some(now);
        if self.adoption_date.is_none() {
            self.adoption_date = Some(now);
        }
    }

    /// Called by the store before every subsequent write.
    pub fn on_update(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Moves the application to `next`, stamping the approval and completion
    /// dates so they stay consistent with the status.
    pub fn transition_to(
        &mut self,
        next: AdoptionStatus,
        at: DateTime<Utc>,
    ) -> Result<(), AdoptionError> {
        if !self.status.can_transition_to(next) {
            return Err(AdoptionError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        match next {
            AdoptionStatus::Approved => self.approved_date = Some(at),
            AdoptionStatus::Completed => {
                self.approved_date.get_or_insert(at);
                self.completed_date = Some(at);
            }
            AdoptionStatus::Pending | AdoptionStatus::Rejected | AdoptionStatus::Cancelled => {}
        }
        self.status = next;
        self.updated_at = Some(at);
        Ok(())
    }

    pub fn approve(
        &mut self,
        admin: Arc<User>,
        admin_notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), AdoptionError> {
        self.transition_to(AdoptionStatus::Approved, at)?;
        self.processed_by_admin = Some(admin);
        self.admin_notes = admin_notes;
        Ok(())
    }

    pub fn reject(
        &mut self,
        admin: Arc<User>,
        admin_notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), AdoptionError> {
        self.transition_to(AdoptionStatus::Rejected, at)?;
        self.processed_by_admin = Some(admin);
        self.admin_notes = admin_notes;
        Ok(())
    }

    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<(), AdoptionError> {
        self.transition_to(AdoptionStatus::Completed, at)
    }

    pub fn cancel(&mut self, at: DateTime<Utc>) -> Result<(), AdoptionError> {
        self.transition_to(AdoptionStatus::Cancelled, at)
    }
}

// Rendering of a missing value in the summary line
const ABSENT: &str = "null";

impl fmt::Display for Adoption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id.map_or_else(|| ABSENT.to_string(), |id| id.to_string());
        let user = self
            .user
            .as_deref()
            .map_or_else(|| ABSENT.to_string(), User::full_name);
        let cat = self.cat.as_deref().map_or(ABSENT, |cat| cat.name.as_str());
        let date = self
            .adoption_date
            .map_or_else(|| ABSENT.to_string(), |d| d.to_rfc3339());
        write!(
            f,
            "Adoption(id={id}, user={user}, cat={cat}, status={}, adoption_date={date})",
            self.status
        )
    }
}
