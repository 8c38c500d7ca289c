use chrono::Utc;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::models::{CommitteeCategory, CommitteeMember, Paper, Payment, Speaker, User};
use crate::error::WorkflowError;
use crate::identity::Caller;
use crate::notify::templates::{
    MailTemplate, PAYMENT_REJECTED, PAYMENT_VERIFIED, SUBMISSION_APPROVED, SUBMISSION_REJECTED,
};
use crate::notify::{Email, Notifier};
use crate::status::{PaperStatus, PaymentStatus, StatusFilter};
use crate::storage;

use super::store::Store;
use super::{
    MemberDraft, MemberPatch, PaperDraft, PaperPatch, PaymentDecision, PaymentDraft, PaymentPatch,
    SpeakerDraft, SpeakerPatch, SubmissionDecision,
};

/// The review workflow over a store and a notifier. Every operation takes
/// the caller explicitly; nothing here reads ambient session state.
///
/// Decisions persist first and notify after. A failed send never rolls back
/// or fails the decision.
pub struct ReviewService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> ReviewService<S, N>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self { store, notifier }
    }

    // --- papers ---

    /// Author-side create. New papers always start at `pending_approval`.
    pub async fn submit_paper(
        &self,
        caller: &Caller,
        draft: PaperDraft,
    ) -> Result<Paper, WorkflowError> {
        require_field("title", &draft.title)?;

        let paper = Paper {
            id: Uuid::new_v4(),
            reference: storage::generate_paper_reference(),
            title: draft.title.trim().to_string(),
            abstract_text: draft.abstract_text,
            subject_area: draft.subject_area,
            authors: draft.authors,
            owner_id: caller.user_id,
            status: PaperStatus::PendingApproval,
            reviewer: None,
            review_comments: None,
            review_complete: false,
            approved_by: None,
            approved_at: None,
            approval_notes: None,
            created_at: Utc::now(),
        };

        Ok(self.store.insert_paper(paper).await?)
    }

    /// Admin approval gate: `pending_approval` to `submitted` or `rejected`.
    /// Re-deciding an already-decided paper is applied without error, so a
    /// repeated decision stays idempotent.
    pub async fn decide_submission(
        &self,
        caller: &Caller,
        paper_id: Uuid,
        decision: SubmissionDecision,
        notes: Option<String>,
    ) -> Result<Paper, WorkflowError> {
        caller.require_admin()?;

        let mut paper = self
            .store
            .fetch_paper(paper_id)
            .await?
            .ok_or(WorkflowError::NotFound("paper"))?;

        let target = decision.target();
        if !PaperStatus::transition_allowed(paper.status, target) {
            log_offtable("paper", paper.id, paper.status, target, caller);
        }

        paper.status = target;
        paper.approved_by = Some(caller.user_id);
        paper.approved_at = Some(Utc::now());
        paper.approval_notes = notes;

        self.store.update_paper(&paper).await?;

        let template = match decision {
            SubmissionDecision::Approve => &SUBMISSION_APPROVED,
            SubmissionDecision::Reject => &SUBMISSION_REJECTED,
        };
        let reason = paper.approval_notes.clone().unwrap_or_default();
        self.notify_owner(
            paper.owner_id,
            template,
            &[
                ("title", paper.title.as_str()),
                ("reference", paper.reference.as_str()),
                ("reason", reason.as_str()),
            ],
        )
        .await;

        Ok(paper)
    }

    /// Admin escape hatch: any field, any status value. Off-table status
    /// jumps are logged through the same predicate the decision path uses.
    pub async fn edit_paper(
        &self,
        caller: &Caller,
        paper_id: Uuid,
        patch: PaperPatch,
    ) -> Result<Paper, WorkflowError> {
        caller.require_admin()?;

        let mut paper = self
            .store
            .fetch_paper(paper_id)
            .await?
            .ok_or(WorkflowError::NotFound("paper"))?;

        if let Some(title) = patch.title {
            require_field("title", &title)?;
            paper.title = title.trim().to_string();
        }
        if let Some(abstract_text) = patch.abstract_text {
            paper.abstract_text = abstract_text;
        }
        if let Some(subject_area) = patch.subject_area {
            paper.subject_area = subject_area;
        }
        if let Some(authors) = patch.authors {
            paper.authors = authors;
        }
        if let Some(raw) = patch.status {
            let next: PaperStatus = raw.parse()?;
            if !PaperStatus::transition_allowed(paper.status, next) {
                log_offtable("paper", paper.id, paper.status, next, caller);
            }
            paper.status = next;
        }
        if let Some(reviewer) = patch.reviewer {
            paper.reviewer = Some(reviewer);
        }
        if let Some(comments) = patch.review_comments {
            paper.review_comments = Some(comments);
        }
        if let Some(complete) = patch.review_complete {
            paper.review_complete = complete;
        }
        if let Some(notes) = patch.approval_notes {
            paper.approval_notes = Some(notes);
        }

        self.store.update_paper(&paper).await?;
        Ok(paper)
    }

    pub async fn delete_paper(&self, caller: &Caller, paper_id: Uuid) -> Result<(), WorkflowError> {
        caller.require_admin()?;
        if self.store.delete_paper(paper_id).await? {
            Ok(())
        } else {
            Err(WorkflowError::NotFound("paper"))
        }
    }

    pub async fn get_paper(&self, caller: &Caller, paper_id: Uuid) -> Result<Paper, WorkflowError> {
        let paper = self
            .store
            .fetch_paper(paper_id)
            .await?
            .ok_or(WorkflowError::NotFound("paper"))?;
        if !caller.may_view(paper.owner_id) {
            return Err(WorkflowError::Unauthorized);
        }
        Ok(paper)
    }

    pub async fn list_papers(
        &self,
        caller: &Caller,
        filter: StatusFilter<PaperStatus>,
    ) -> Result<Vec<Paper>, WorkflowError> {
        caller.require_admin()?;
        Ok(self.store.list_papers(filter, None).await?)
    }

    pub async fn my_papers(&self, caller: &Caller) -> Result<Vec<Paper>, WorkflowError> {
        Ok(self
            .store
            .list_papers(StatusFilter::All, Some(caller.user_id))
            .await?)
    }

    // --- payments ---

    /// Author-side create. The proof file must already sit in blob storage;
    /// only its URL is recorded here.
    pub async fn register_payment(
        &self,
        caller: &Caller,
        draft: PaymentDraft,
    ) -> Result<Payment, WorkflowError> {
        if draft.amount <= Decimal::ZERO {
            return Err(WorkflowError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }
        require_field("currency", &draft.currency)?;
        require_field("proof_url", &draft.proof_url)?;

        let payment = Payment {
            id: Uuid::new_v4(),
            owner_id: caller.user_id,
            paper_id: draft.paper_id,
            amount: draft.amount,
            currency: draft.currency.trim().to_uppercase(),
            category: draft.category,
            transaction_reference: draft.transaction_reference,
            proof_url: draft.proof_url,
            status: PaymentStatus::Pending,
            verification_notes: None,
            decided_by: None,
            decided_at: None,
            created_at: Utc::now(),
        };

        Ok(self.store.insert_payment(payment).await?)
    }

    /// Admin verify/reject. Notes are stored whatever the decision; absent
    /// notes persist as NULL and never fail the call.
    pub async fn decide_payment(
        &self,
        caller: &Caller,
        payment_id: Uuid,
        decision: PaymentDecision,
        notes: Option<String>,
    ) -> Result<Payment, WorkflowError> {
        caller.require_admin()?;

        let mut payment = self
            .store
            .fetch_payment(payment_id)
            .await?
            .ok_or(WorkflowError::NotFound("payment"))?;

        let target = decision.target();
        if !PaymentStatus::transition_allowed(payment.status, target) {
            log_offtable("payment", payment.id, payment.status, target, caller);
        }

        payment.status = target;
        payment.verification_notes = notes;
        payment.decided_by = Some(caller.user_id);
        payment.decided_at = Some(Utc::now());

        self.store.update_payment(&payment).await?;

        let template = match decision {
            PaymentDecision::Verify => &PAYMENT_VERIFIED,
            PaymentDecision::Reject => &PAYMENT_REJECTED,
        };
        let amount = format!("{} {}", payment.amount, payment.currency);
        let transaction = payment
            .transaction_reference
            .clone()
            .unwrap_or_else(|| "-".to_string());
        let reason = payment.verification_notes.clone().unwrap_or_default();
        self.notify_owner(
            payment.owner_id,
            template,
            &[
                ("amount", amount.as_str()),
                ("transaction_id", transaction.as_str()),
                ("reason", reason.as_str()),
            ],
        )
        .await;

        Ok(payment)
    }

    pub async fn edit_payment(
        &self,
        caller: &Caller,
        payment_id: Uuid,
        patch: PaymentPatch,
    ) -> Result<Payment, WorkflowError> {
        caller.require_admin()?;

        let mut payment = self
            .store
            .fetch_payment(payment_id)
            .await?
            .ok_or(WorkflowError::NotFound("payment"))?;

        if let Some(amount) = patch.amount {
            if amount <= Decimal::ZERO {
                return Err(WorkflowError::Validation(
                    "amount must be greater than zero".to_string(),
                ));
            }
            payment.amount = amount;
        }
        if let Some(currency) = patch.currency {
            require_field("currency", &currency)?;
            payment.currency = currency.trim().to_uppercase();
        }
        if let Some(category) = patch.category {
            payment.category = category;
        }
        if let Some(reference) = patch.transaction_reference {
            payment.transaction_reference = Some(reference);
        }
        if let Some(proof_url) = patch.proof_url {
            require_field("proof_url", &proof_url)?;
            payment.proof_url = proof_url;
        }
        if let Some(raw) = patch.status {
            let next: PaymentStatus = raw.parse()?;
            if !PaymentStatus::transition_allowed(payment.status, next) {
                log_offtable("payment", payment.id, payment.status, next, caller);
            }
            payment.status = next;
        }
        if let Some(notes) = patch.verification_notes {
            payment.verification_notes = Some(notes);
        }
        if let Some(paper_id) = patch.paper_id {
            payment.paper_id = Some(paper_id);
        }

        self.store.update_payment(&payment).await?;
        Ok(payment)
    }

    pub async fn delete_payment(
        &self,
        caller: &Caller,
        payment_id: Uuid,
    ) -> Result<(), WorkflowError> {
        caller.require_admin()?;
        if self.store.delete_payment(payment_id).await? {
            Ok(())
        } else {
            Err(WorkflowError::NotFound("payment"))
        }
    }

    pub async fn get_payment(
        &self,
        caller: &Caller,
        payment_id: Uuid,
    ) -> Result<Payment, WorkflowError> {
        let payment = self
            .store
            .fetch_payment(payment_id)
            .await?
            .ok_or(WorkflowError::NotFound("payment"))?;
        if !caller.may_view(payment.owner_id) {
            return Err(WorkflowError::Unauthorized);
        }
        Ok(payment)
    }

    pub async fn list_payments(
        &self,
        caller: &Caller,
        filter: StatusFilter<PaymentStatus>,
    ) -> Result<Vec<Payment>, WorkflowError> {
        caller.require_admin()?;
        Ok(self.store.list_payments(filter, None).await?)
    }

    pub async fn my_payments(&self, caller: &Caller) -> Result<Vec<Payment>, WorkflowError> {
        Ok(self
            .store
            .list_payments(StatusFilter::All, Some(caller.user_id))
            .await?)
    }

    /// Payments joined with their owner accounts, for the CSV export.
    pub async fn payments_with_owners(
        &self,
        caller: &Caller,
    ) -> Result<Vec<(Payment, Option<User>)>, WorkflowError> {
        caller.require_admin()?;
        let payments = self.store.list_payments(StatusFilter::All, None).await?;
        let mut rows = Vec::with_capacity(payments.len());
        for payment in payments {
            let owner = self.store.fetch_user(payment.owner_id).await?;
            rows.push((payment, owner));
        }
        Ok(rows)
    }

    // --- committee ---

    pub async fn create_member(
        &self,
        caller: &Caller,
        draft: MemberDraft,
    ) -> Result<CommitteeMember, WorkflowError> {
        caller.require_admin()?;
        require_field("name", &draft.name)?;
        require_field("affiliation", &draft.affiliation)?;
        require_email(&draft.email)?;

        let member = CommitteeMember {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            designation: draft.designation,
            affiliation: draft.affiliation,
            email: draft.email,
            category: draft.category,
            image_url: draft.image_url,
            display_order: draft.display_order,
            active: draft.active,
            created_at: Utc::now(),
        };

        Ok(self.store.insert_member(member).await?)
    }

    pub async fn edit_member(
        &self,
        caller: &Caller,
        member_id: Uuid,
        patch: MemberPatch,
    ) -> Result<CommitteeMember, WorkflowError> {
        caller.require_admin()?;

        let mut member = self
            .store
            .fetch_member(member_id)
            .await?
            .ok_or(WorkflowError::NotFound("committee member"))?;

        if let Some(name) = patch.name {
            require_field("name", &name)?;
            member.name = name.trim().to_string();
        }
        if let Some(designation) = patch.designation {
            member.designation = designation;
        }
        if let Some(affiliation) = patch.affiliation {
            require_field("affiliation", &affiliation)?;
            member.affiliation = affiliation;
        }
        if let Some(email) = patch.email {
            require_email(&email)?;
            member.email = email;
        }
        if let Some(raw) = patch.category {
            member.category = raw.parse::<CommitteeCategory>()?;
        }
        if let Some(image_url) = patch.image_url {
            member.image_url = Some(image_url);
        }
        if let Some(order) = patch.display_order {
            member.display_order = order;
        }
        if let Some(active) = patch.active {
            member.active = active;
        }

        self.store.update_member(&member).await?;
        Ok(member)
    }

    pub async fn delete_member(
        &self,
        caller: &Caller,
        member_id: Uuid,
    ) -> Result<(), WorkflowError> {
        caller.require_admin()?;
        if self.store.delete_member(member_id).await? {
            Ok(())
        } else {
            Err(WorkflowError::NotFound("committee member"))
        }
    }

    /// Public listing, ordered by `display_order` then id.
    pub async fn list_committee(
        &self,
        category: Option<CommitteeCategory>,
    ) -> Result<Vec<CommitteeMember>, WorkflowError> {
        Ok(self.store.list_members(category).await?)
    }

    // --- speakers ---

    pub async fn create_speaker(
        &self,
        caller: &Caller,
        draft: SpeakerDraft,
    ) -> Result<Speaker, WorkflowError> {
        caller.require_admin()?;
        require_field("name", &draft.name)?;
        require_field("affiliation", &draft.affiliation)?;
        require_email(&draft.email)?;

        let speaker = Speaker {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            designation: draft.designation,
            affiliation: draft.affiliation,
            email: draft.email,
            talk_title: draft.talk_title,
            talk_abstract: draft.talk_abstract,
            image_url: draft.image_url,
            display_order: draft.display_order,
            active: draft.active,
            created_at: Utc::now(),
        };

        Ok(self.store.insert_speaker(speaker).await?)
    }

    pub async fn edit_speaker(
        &self,
        caller: &Caller,
        speaker_id: Uuid,
        patch: SpeakerPatch,
    ) -> Result<Speaker, WorkflowError> {
        caller.require_admin()?;

        let mut speaker = self
            .store
            .fetch_speaker(speaker_id)
            .await?
            .ok_or(WorkflowError::NotFound("speaker"))?;

        if let Some(name) = patch.name {
            require_field("name", &name)?;
            speaker.name = name.trim().to_string();
        }
        if let Some(designation) = patch.designation {
            speaker.designation = designation;
        }
        if let Some(affiliation) = patch.affiliation {
            require_field("affiliation", &affiliation)?;
            speaker.affiliation = affiliation;
        }
        if let Some(email) = patch.email {
            require_email(&email)?;
            speaker.email = email;
        }
        if let Some(talk_title) = patch.talk_title {
            speaker.talk_title = talk_title;
        }
        if let Some(talk_abstract) = patch.talk_abstract {
            speaker.talk_abstract = Some(talk_abstract);
        }
        if let Some(image_url) = patch.image_url {
            speaker.image_url = Some(image_url);
        }
        if let Some(order) = patch.display_order {
            speaker.display_order = order;
        }
        if let Some(active) = patch.active {
            speaker.active = active;
        }

        self.store.update_speaker(&speaker).await?;
        Ok(speaker)
    }

    pub async fn delete_speaker(
        &self,
        caller: &Caller,
        speaker_id: Uuid,
    ) -> Result<(), WorkflowError> {
        caller.require_admin()?;
        if self.store.delete_speaker(speaker_id).await? {
            Ok(())
        } else {
            Err(WorkflowError::NotFound("speaker"))
        }
    }

    pub async fn list_speakers(&self) -> Result<Vec<Speaker>, WorkflowError> {
        Ok(self.store.list_speakers().await?)
    }

    // --- notification ---

    /// Best effort, at most once. Lookup or send failures are logged and
    /// swallowed; the decision already persisted.
    async fn notify_owner(&self, owner_id: Uuid, template: &MailTemplate, vars: &[(&str, &str)]) {
        let user = match self.store.fetch_user(owner_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(owner = %owner_id, "owner account missing, notification skipped");
                return;
            }
            Err(e) => {
                tracing::warn!(owner = %owner_id, error = %e, "owner lookup failed, notification skipped");
                return;
            }
        };

        let mut all = vars.to_vec();
        all.push(("name", user.full_name.as_str()));
        let (subject, body) = template.render(&all);

        if let Err(e) = self
            .notifier
            .send(Email {
                to: user.email.clone(),
                subject,
                body,
            })
            .await
        {
            tracing::warn!(owner = %owner_id, to = %user.email, error = %e, "notification send failed");
        }
    }
}

fn require_field(name: &str, value: &str) -> Result<(), WorkflowError> {
    if value.trim().is_empty() {
        Err(WorkflowError::Validation(format!("{name} is required")))
    } else {
        Ok(())
    }
}

fn require_email(value: &str) -> Result<(), WorkflowError> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(WorkflowError::Validation(format!(
            "`{value}` is not a valid email address"
        )))
    }
}

fn log_offtable(
    kind: &str,
    id: Uuid,
    from: impl Display,
    to: impl Display,
    caller: &Caller,
) {
    tracing::warn!(
        %id,
        from = %from,
        to = %to,
        caller = %caller.user_id,
        "{kind} status change outside the canonical transition table"
    );
}
