use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use crate::config::Config;
use crate::db::models::{CommitteeCategory, CommitteeMember, Paper, Payment, Speaker, User};
use crate::identity::Caller;
use crate::notify::{Email, Notifier, NotifyError};
use crate::review::store::{
    DirectoryStore, PaperStore, PaymentStore, StoreError, UserStore,
};
use crate::review::{MemberDraft, PaperDraft, PaymentDraft, ReviewService, SpeakerDraft};
use crate::state::AppState;
use crate::status::{PaperStatus, PaymentStatus, StatusFilter};

/// In-memory store mirroring the Postgres ordering rules. `fail_writes`
/// turns every mutation into an unavailable-store error so persistence
/// failures can be provoked.
#[derive(Default)]
pub(super) struct MemoryStore {
    papers: Mutex<Vec<Paper>>,
    payments: Mutex<Vec<Payment>>,
    members: Mutex<Vec<CommitteeMember>>,
    speakers: Mutex<Vec<Speaker>>,
    users: Mutex<Vec<User>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub(super) fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::Relaxed);
    }

    pub(super) fn add_user(&self, full_name: &str, email: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.users
            .lock()
            .expect("store mutex poisoned")
            .push(user.clone());
        user
    }

    pub(super) fn paper_count(&self) -> usize {
        self.papers.lock().expect("store mutex poisoned").len()
    }

    fn write_guard(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            Err(StoreError::Unavailable("database offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PaperStore for MemoryStore {
    async fn insert_paper(&self, paper: Paper) -> Result<Paper, StoreError> {
        self.write_guard()?;
        self.papers
            .lock()
            .expect("store mutex poisoned")
            .push(paper.clone());
        Ok(paper)
    }

    async fn fetch_paper(&self, id: Uuid) -> Result<Option<Paper>, StoreError> {
        let papers = self.papers.lock().expect("store mutex poisoned");
        Ok(papers.iter().find(|p| p.id == id).cloned())
    }

    async fn update_paper(&self, paper: &Paper) -> Result<(), StoreError> {
        self.write_guard()?;
        let mut papers = self.papers.lock().expect("store mutex poisoned");
        if let Some(stored) = papers.iter_mut().find(|p| p.id == paper.id) {
            *stored = paper.clone();
        }
        Ok(())
    }

    async fn delete_paper(&self, id: Uuid) -> Result<bool, StoreError> {
        self.write_guard()?;
        let mut papers = self.papers.lock().expect("store mutex poisoned");
        let before = papers.len();
        papers.retain(|p| p.id != id);
        Ok(papers.len() < before)
    }

    async fn list_papers(
        &self,
        filter: StatusFilter<PaperStatus>,
        owner: Option<Uuid>,
    ) -> Result<Vec<Paper>, StoreError> {
        let papers = self.papers.lock().expect("store mutex poisoned");
        let mut matched: Vec<Paper> = papers
            .iter()
            .filter(|p| filter.matches(p.status))
            .filter(|p| owner.map_or(true, |o| p.owner_id == o))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matched)
    }
}

#[async_trait]
impl PaymentStore for MemoryStore {
    async fn insert_payment(&self, payment: Payment) -> Result<Payment, StoreError> {
        self.write_guard()?;
        self.payments
            .lock()
            .expect("store mutex poisoned")
            .push(payment.clone());
        Ok(payment)
    }

    async fn fetch_payment(&self, id: Uuid) -> Result<Option<Payment>, StoreError> {
        let payments = self.payments.lock().expect("store mutex poisoned");
        Ok(payments.iter().find(|p| p.id == id).cloned())
    }

    async fn update_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        self.write_guard()?;
        let mut payments = self.payments.lock().expect("store mutex poisoned");
        if let Some(stored) = payments.iter_mut().find(|p| p.id == payment.id) {
            *stored = payment.clone();
        }
        Ok(())
    }

    async fn delete_payment(&self, id: Uuid) -> Result<bool, StoreError> {
        self.write_guard()?;
        let mut payments = self.payments.lock().expect("store mutex poisoned");
        let before = payments.len();
        payments.retain(|p| p.id != id);
        Ok(payments.len() < before)
    }

    async fn list_payments(
        &self,
        filter: StatusFilter<PaymentStatus>,
        owner: Option<Uuid>,
    ) -> Result<Vec<Payment>, StoreError> {
        let payments = self.payments.lock().expect("store mutex poisoned");
        let mut matched: Vec<Payment> = payments
            .iter()
            .filter(|p| filter.matches(p.status))
            .filter(|p| owner.map_or(true, |o| p.owner_id == o))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matched)
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn insert_member(&self, member: CommitteeMember) -> Result<CommitteeMember, StoreError> {
        self.write_guard()?;
        self.members
            .lock()
            .expect("store mutex poisoned")
            .push(member.clone());
        Ok(member)
    }

    async fn fetch_member(&self, id: Uuid) -> Result<Option<CommitteeMember>, StoreError> {
        let members = self.members.lock().expect("store mutex poisoned");
        Ok(members.iter().find(|m| m.id == id).cloned())
    }

    async fn update_member(&self, member: &CommitteeMember) -> Result<(), StoreError> {
        self.write_guard()?;
        let mut members = self.members.lock().expect("store mutex poisoned");
        if let Some(stored) = members.iter_mut().find(|m| m.id == member.id) {
            *stored = member.clone();
        }
        Ok(())
    }

    async fn delete_member(&self, id: Uuid) -> Result<bool, StoreError> {
        self.write_guard()?;
        let mut members = self.members.lock().expect("store mutex poisoned");
        let before = members.len();
        members.retain(|m| m.id != id);
        Ok(members.len() < before)
    }

    async fn list_members(
        &self,
        category: Option<CommitteeCategory>,
    ) -> Result<Vec<CommitteeMember>, StoreError> {
        let members = self.members.lock().expect("store mutex poisoned");
        let mut matched: Vec<CommitteeMember> = members
            .iter()
            .filter(|m| category.map_or(true, |c| m.category == c))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.display_order.cmp(&b.display_order).then(a.id.cmp(&b.id)));
        Ok(matched)
    }

    async fn insert_speaker(&self, speaker: Speaker) -> Result<Speaker, StoreError> {
        self.write_guard()?;
        self.speakers
            .lock()
            .expect("store mutex poisoned")
            .push(speaker.clone());
        Ok(speaker)
    }

    async fn fetch_speaker(&self, id: Uuid) -> Result<Option<Speaker>, StoreError> {
        let speakers = self.speakers.lock().expect("store mutex poisoned");
        Ok(speakers.iter().find(|s| s.id == id).cloned())
    }

    async fn update_speaker(&self, speaker: &Speaker) -> Result<(), StoreError> {
        self.write_guard()?;
        let mut speakers = self.speakers.lock().expect("store mutex poisoned");
        if let Some(stored) = speakers.iter_mut().find(|s| s.id == speaker.id) {
            *stored = speaker.clone();
        }
        Ok(())
    }

    async fn delete_speaker(&self, id: Uuid) -> Result<bool, StoreError> {
        self.write_guard()?;
        let mut speakers = self.speakers.lock().expect("store mutex poisoned");
        let before = speakers.len();
        speakers.retain(|s| s.id != id);
        Ok(speakers.len() < before)
    }

    async fn list_speakers(&self) -> Result<Vec<Speaker>, StoreError> {
        let speakers = self.speakers.lock().expect("store mutex poisoned");
        let mut all: Vec<Speaker> = speakers.clone();
        all.sort_by(|a, b| a.display_order.cmp(&b.display_order).then(a.id.cmp(&b.id)));
        Ok(all)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn fetch_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().expect("store mutex poisoned");
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    sent: Mutex<Vec<Email>>,
}

impl RecordingNotifier {
    pub(super) fn sent(&self) -> Vec<Email> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, email: Email) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(email);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _email: Email) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay unreachable".to_string()))
    }
}

pub(super) fn build_service() -> (
    ReviewService<MemoryStore, RecordingNotifier>,
    Arc<MemoryStore>,
    Arc<RecordingNotifier>,
) {
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = ReviewService::new(store.clone(), notifier.clone());
    (service, store, notifier)
}

pub(super) fn admin() -> Caller {
    Caller::admin(Uuid::new_v4())
}

pub(super) fn paper_draft(title: &str) -> PaperDraft {
    PaperDraft {
        title: title.to_string(),
        abstract_text: "We study an open problem.".to_string(),
        subject_area: "Distributed Systems".to_string(),
        authors: "A. Author, B. Coauthor".to_string(),
    }
}

pub(super) fn payment_draft(amount: i64, currency: &str) -> PaymentDraft {
    PaymentDraft {
        amount: Decimal::from(amount),
        currency: currency.to_string(),
        category: "participant".to_string(),
        transaction_reference: Some("TXN-991".to_string()),
        proof_url: "/uploads/ab12cd34_receipt.pdf".to_string(),
        paper_id: None,
    }
}

pub(super) fn member_draft(name: &str, order: i32) -> MemberDraft {
    MemberDraft {
        name: name.to_string(),
        designation: "Professor".to_string(),
        affiliation: "Example University".to_string(),
        email: "member@example.edu".to_string(),
        category: CommitteeCategory::Technical,
        image_url: None,
        display_order: order,
        active: true,
    }
}

pub(super) fn speaker_draft(name: &str) -> SpeakerDraft {
    SpeakerDraft {
        name: name.to_string(),
        designation: "Chief Scientist".to_string(),
        affiliation: "Example Labs".to_string(),
        email: "speaker@example.org".to_string(),
        talk_title: "Keynote".to_string(),
        talk_abstract: None,
        image_url: None,
        display_order: 0,
        active: true,
    }
}

pub(super) fn test_config() -> Arc<Config> {
    Arc::new(Config {
        database_url: String::new(),
        mail_api_url: "http://localhost:0/send".to_string(),
        mail_api_key: "test-key".to_string(),
        mail_sender: "no-reply@confera.org".to_string(),
        upload_folder: std::env::temp_dir(),
        host: "127.0.0.1".to_string(),
        port: 0,
    })
}

pub(super) fn build_router() -> (
    axum::Router,
    Arc<MemoryStore>,
    Arc<RecordingNotifier>,
) {
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let state = Arc::new(AppState {
        service: ReviewService::new(store.clone(), notifier.clone()),
        config: test_config(),
    });
    (crate::routes::app_router(state), store, notifier)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
