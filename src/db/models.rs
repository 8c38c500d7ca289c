use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::status::{PaperStatus, PaymentStatus, UnknownStatus};

/// Account reference used to address notifications and label exports.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Paper {
    pub id: Uuid,
    /// Conference paper number, e.g. `PAP-20260801-1a2b3c4d`.
    pub reference: String,
    pub title: String,
    pub abstract_text: String,
    pub subject_area: String,
    /// Free-text author list as printed in the program.
    pub authors: String,
    pub owner_id: Uuid,
    pub status: PaperStatus,
    pub reviewer: Option<String>,
    pub review_comments: Option<String>,
    pub review_complete: bool,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approval_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub paper_id: Option<Uuid>,
    pub amount: Decimal,
    pub currency: String,
    /// Participant type, e.g. `student`, `academic`, `industry`.
    pub category: String,
    pub transaction_reference: Option<String>,
    pub proof_url: String,
    pub status: PaymentStatus,
    pub verification_notes: Option<String>,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum CommitteeCategory {
    Organizing,
    Technical,
    Advisory,
}

impl CommitteeCategory {
    pub const fn label(self) -> &'static str {
        match self {
            CommitteeCategory::Organizing => "organizing",
            CommitteeCategory::Technical => "technical",
            CommitteeCategory::Advisory => "advisory",
        }
    }
}

impl fmt::Display for CommitteeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CommitteeCategory {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "organizing" => Ok(CommitteeCategory::Organizing),
            "technical" => Ok(CommitteeCategory::Technical),
            "advisory" => Ok(CommitteeCategory::Advisory),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Data-only directory entity, no workflow. Ordering is a plain integer
/// sort key with no uniqueness.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CommitteeMember {
    pub id: Uuid,
    pub name: String,
    pub designation: String,
    pub affiliation: String,
    pub email: String,
    pub category: CommitteeCategory,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Speaker {
    pub id: Uuid,
    pub name: String,
    pub designation: String,
    pub affiliation: String,
    pub email: String,
    pub talk_title: String,
    pub talk_abstract: Option<String>,
    pub image_url: Option<String>,
    pub display_order: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
