pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use service::ReviewService;

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::models::CommitteeCategory;
use crate::status::{PaperStatus, PaymentStatus};

/// Admin decision on a pending submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionDecision {
    Approve,
    Reject,
}

impl SubmissionDecision {
    pub fn target(self) -> PaperStatus {
        match self {
            SubmissionDecision::Approve => PaperStatus::Submitted,
            SubmissionDecision::Reject => PaperStatus::Rejected,
        }
    }
}

/// Admin decision on a pending payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentDecision {
    Verify,
    Reject,
}

impl PaymentDecision {
    pub fn target(self) -> PaymentStatus {
        match self {
            PaymentDecision::Verify => PaymentStatus::Verified,
            PaymentDecision::Reject => PaymentStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaperDraft {
    pub title: String,
    #[serde(default)]
    pub abstract_text: String,
    #[serde(default)]
    pub subject_area: String,
    #[serde(default)]
    pub authors: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentDraft {
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    #[serde(default)]
    pub transaction_reference: Option<String>,
    pub proof_url: String,
    #[serde(default)]
    pub paper_id: Option<Uuid>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberDraft {
    pub name: String,
    #[serde(default)]
    pub designation: String,
    pub affiliation: String,
    pub email: String,
    pub category: CommitteeCategory,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeakerDraft {
    pub name: String,
    #[serde(default)]
    pub designation: String,
    pub affiliation: String,
    pub email: String,
    #[serde(default)]
    pub talk_title: String,
    #[serde(default)]
    pub talk_abstract: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Field-level edit. Absent fields are left as stored; `status` is parsed
/// against the enum and may jump anywhere (the escape hatch is logged, not
/// blocked).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaperPatch {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub subject_area: Option<String>,
    pub authors: Option<String>,
    pub status: Option<String>,
    pub reviewer: Option<String>,
    pub review_comments: Option<String>,
    pub review_complete: Option<bool>,
    pub approval_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaymentPatch {
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub transaction_reference: Option<String>,
    pub proof_url: Option<String>,
    pub status: Option<String>,
    pub verification_notes: Option<String>,
    pub paper_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub affiliation: Option<String>,
    pub email: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SpeakerPatch {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub affiliation: Option<String>,
    pub email: Option<String>,
    pub talk_title: Option<String>,
    pub talk_abstract: Option<String>,
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
    pub active: Option<bool>,
}
