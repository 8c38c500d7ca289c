use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{CommitteeCategory, CommitteeMember, Paper, Payment, Speaker, User};
use crate::status::{PaperStatus, PaymentStatus, StatusFilter};

/// Error enumeration for store failures. Row absence is not an error here;
/// fetches return `Option` and the service decides what absence means.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction so the workflow can be exercised in isolation.
/// List results come back creation-time descending, ties broken by id.
#[async_trait]
pub trait PaperStore: Send + Sync {
    async fn insert_paper(&self, paper: Paper) -> Result<Paper, StoreError>;
    async fn fetch_paper(&self, id: Uuid) -> Result<Option<Paper>, StoreError>;
    async fn update_paper(&self, paper: &Paper) -> Result<(), StoreError>;
    async fn delete_paper(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn list_papers(
        &self,
        filter: StatusFilter<PaperStatus>,
        owner: Option<Uuid>,
    ) -> Result<Vec<Paper>, StoreError>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn insert_payment(&self, payment: Payment) -> Result<Payment, StoreError>;
    async fn fetch_payment(&self, id: Uuid) -> Result<Option<Payment>, StoreError>;
    async fn update_payment(&self, payment: &Payment) -> Result<(), StoreError>;
    async fn delete_payment(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn list_payments(
        &self,
        filter: StatusFilter<PaymentStatus>,
        owner: Option<Uuid>,
    ) -> Result<Vec<Payment>, StoreError>;
}

/// Committee members and speakers share one seam; both are plain CRUD with
/// `display_order` then id ordering.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn insert_member(&self, member: CommitteeMember) -> Result<CommitteeMember, StoreError>;
    async fn fetch_member(&self, id: Uuid) -> Result<Option<CommitteeMember>, StoreError>;
    async fn update_member(&self, member: &CommitteeMember) -> Result<(), StoreError>;
    async fn delete_member(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn list_members(
        &self,
        category: Option<CommitteeCategory>,
    ) -> Result<Vec<CommitteeMember>, StoreError>;

    async fn insert_speaker(&self, speaker: Speaker) -> Result<Speaker, StoreError>;
    async fn fetch_speaker(&self, id: Uuid) -> Result<Option<Speaker>, StoreError>;
    async fn update_speaker(&self, speaker: &Speaker) -> Result<(), StoreError>;
    async fn delete_speaker(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn list_speakers(&self) -> Result<Vec<Speaker>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn fetch_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

/// Everything the review service needs from persistence.
pub trait Store: PaperStore + PaymentStore + DirectoryStore + UserStore {}

impl<T: PaperStore + PaymentStore + DirectoryStore + UserStore> Store for T {}
