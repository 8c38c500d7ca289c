use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Paper lifecycle status. `pending_approval` to `submitted` is the admin
/// approval gate and is separate from the peer-review outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PaperStatus {
    PendingApproval,
    Submitted,
    UnderReview,
    Accepted,
    Rejected,
}

impl PaperStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PaperStatus::PendingApproval => "pending_approval",
            PaperStatus::Submitted => "submitted",
            PaperStatus::UnderReview => "under_review",
            PaperStatus::Accepted => "accepted",
            PaperStatus::Rejected => "rejected",
        }
    }

    /// Canonical admin transitions. Repeating the current status is allowed
    /// so a second identical decision stays idempotent.
    pub fn transition_allowed(from: PaperStatus, to: PaperStatus) -> bool {
        from == to
            || matches!(
                (from, to),
                (PaperStatus::PendingApproval, PaperStatus::Submitted)
                    | (PaperStatus::PendingApproval, PaperStatus::Rejected)
            )
    }
}

impl fmt::Display for PaperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaperStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "pending_approval" => Ok(PaperStatus::PendingApproval),
            "submitted" => Ok(PaperStatus::Submitted),
            "under_review" => Ok(PaperStatus::UnderReview),
            "accepted" => Ok(PaperStatus::Accepted),
            "rejected" => Ok(PaperStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Registration payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Rejected,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Verified => "verified",
            PaymentStatus::Rejected => "rejected",
        }
    }

    /// Canonical admin transitions. There is no path back to `pending`.
    pub fn transition_allowed(from: PaymentStatus, to: PaymentStatus) -> bool {
        from == to
            || matches!(
                (from, to),
                (PaymentStatus::Pending, PaymentStatus::Verified)
                    | (PaymentStatus::Pending, PaymentStatus::Rejected)
            )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "pending" => Ok(PaymentStatus::Pending),
            "verified" => Ok(PaymentStatus::Verified),
            "rejected" => Ok(PaymentStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown status `{0}`")]
pub struct UnknownStatus(pub String);

/// List restriction taken from the `status` query parameter. Absent or
/// `"all"` means no restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S: FromStr> StatusFilter<S> {
    pub fn parse(raw: Option<&str>) -> Result<Self, S::Err> {
        match raw {
            None | Some("") | Some("all") => Ok(StatusFilter::All),
            Some(label) => label.parse().map(StatusFilter::Only),
        }
    }
}

impl<S: PartialEq + Copy> StatusFilter<S> {
    pub fn matches(&self, status: S) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}
