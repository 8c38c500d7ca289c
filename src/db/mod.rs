pub mod models;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::review::store::{
    DirectoryStore, PaperStore, PaymentStore, StoreError, UserStore,
};
use crate::status::{PaperStatus, PaymentStatus, StatusFilter};
use models::{CommitteeCategory, CommitteeMember, Paper, Payment, Speaker, User};

pub type DbPool = Arc<PgPool>;

pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(Arc::new(pool))
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Postgres-backed store. Status columns are plain TEXT; the enums in
/// `crate::status` are the only constraint on their values.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaperStore for PgStore {
    async fn insert_paper(&self, paper: Paper) -> Result<Paper, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO papers (id, reference, title, abstract_text, subject_area, authors,
                                owner_id, status, reviewer, review_comments, review_complete,
                                approved_by, approved_at, approval_notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(paper.id)
        .bind(&paper.reference)
        .bind(&paper.title)
        .bind(&paper.abstract_text)
        .bind(&paper.subject_area)
        .bind(&paper.authors)
        .bind(paper.owner_id)
        .bind(paper.status)
        .bind(&paper.reviewer)
        .bind(&paper.review_comments)
        .bind(paper.review_complete)
        .bind(paper.approved_by)
        .bind(paper.approved_at)
        .bind(&paper.approval_notes)
        .bind(paper.created_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(paper)
    }

    async fn fetch_paper(&self, id: Uuid) -> Result<Option<Paper>, StoreError> {
        let paper = sqlx::query_as::<_, Paper>("SELECT * FROM papers WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        Ok(paper)
    }

    async fn update_paper(&self, paper: &Paper) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE papers
            SET title = $2, abstract_text = $3, subject_area = $4, authors = $5,
                status = $6, reviewer = $7, review_comments = $8, review_complete = $9,
                approved_by = $10, approved_at = $11, approval_notes = $12
            WHERE id = $1
            "#,
        )
        .bind(paper.id)
        .bind(&paper.title)
        .bind(&paper.abstract_text)
        .bind(&paper.subject_area)
        .bind(&paper.authors)
        .bind(paper.status)
        .bind(&paper.reviewer)
        .bind(&paper.review_comments)
        .bind(paper.review_complete)
        .bind(paper.approved_by)
        .bind(paper.approved_at)
        .bind(&paper.approval_notes)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn delete_paper(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM papers WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_papers(
        &self,
        filter: StatusFilter<PaperStatus>,
        owner: Option<Uuid>,
    ) -> Result<Vec<Paper>, StoreError> {
        let status = match filter {
            StatusFilter::All => None,
            StatusFilter::Only(s) => Some(s.label()),
        };
        let papers = sqlx::query_as::<_, Paper>(
            r#"
            SELECT * FROM papers
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR owner_id = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(status)
        .bind(owner)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(papers)
    }
}

#[async_trait]
impl PaymentStore for PgStore {
    async fn insert_payment(&self, payment: Payment) -> Result<Payment, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO payments (id, owner_id, paper_id, amount, currency, category,
                                  transaction_reference, proof_url, status,
                                  verification_notes, decided_by, decided_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(payment.id)
        .bind(payment.owner_id)
        .bind(payment.paper_id)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.category)
        .bind(&payment.transaction_reference)
        .bind(&payment.proof_url)
        .bind(payment.status)
        .bind(&payment.verification_notes)
        .bind(payment.decided_by)
        .bind(payment.decided_at)
        .bind(payment.created_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(payment)
    }

    async fn fetch_payment(&self, id: Uuid) -> Result<Option<Payment>, StoreError> {
        let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        Ok(payment)
    }

    async fn update_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE payments
            SET paper_id = $2, amount = $3, currency = $4, category = $5,
                transaction_reference = $6, proof_url = $7, status = $8,
                verification_notes = $9, decided_by = $10, decided_at = $11
            WHERE id = $1
            "#,
        )
        .bind(payment.id)
        .bind(payment.paper_id)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.category)
        .bind(&payment.transaction_reference)
        .bind(&payment.proof_url)
        .bind(payment.status)
        .bind(&payment.verification_notes)
        .bind(payment.decided_by)
        .bind(payment.decided_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn delete_payment(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_payments(
        &self,
        filter: StatusFilter<PaymentStatus>,
        owner: Option<Uuid>,
    ) -> Result<Vec<Payment>, StoreError> {
        let status = match filter {
            StatusFilter::All => None,
            StatusFilter::Only(s) => Some(s.label()),
        };
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR owner_id = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(status)
        .bind(owner)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(payments)
    }
}

#[async_trait]
impl DirectoryStore for PgStore {
    async fn insert_member(&self, member: CommitteeMember) -> Result<CommitteeMember, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO committee_members (id, name, designation, affiliation, email,
                                           category, image_url, display_order, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(member.id)
        .bind(&member.name)
        .bind(&member.designation)
        .bind(&member.affiliation)
        .bind(&member.email)
        .bind(member.category)
        .bind(&member.image_url)
        .bind(member.display_order)
        .bind(member.active)
        .bind(member.created_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(member)
    }

    async fn fetch_member(&self, id: Uuid) -> Result<Option<CommitteeMember>, StoreError> {
        let member =
            sqlx::query_as::<_, CommitteeMember>("SELECT * FROM committee_members WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;
        Ok(member)
    }

    async fn update_member(&self, member: &CommitteeMember) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE committee_members
            SET name = $2, designation = $3, affiliation = $4, email = $5,
                category = $6, image_url = $7, display_order = $8, active = $9
            WHERE id = $1
            "#,
        )
        .bind(member.id)
        .bind(&member.name)
        .bind(&member.designation)
        .bind(&member.affiliation)
        .bind(&member.email)
        .bind(member.category)
        .bind(&member.image_url)
        .bind(member.display_order)
        .bind(member.active)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn delete_member(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM committee_members WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_members(
        &self,
        category: Option<CommitteeCategory>,
    ) -> Result<Vec<CommitteeMember>, StoreError> {
        let category = category.map(|c| c.label());
        let members = sqlx::query_as::<_, CommitteeMember>(
            r#"
            SELECT * FROM committee_members
            WHERE ($1::text IS NULL OR category = $1)
            ORDER BY display_order, id
            "#,
        )
        .bind(category)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(members)
    }

    async fn insert_speaker(&self, speaker: Speaker) -> Result<Speaker, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO speakers (id, name, designation, affiliation, email, talk_title,
                                  talk_abstract, image_url, display_order, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(speaker.id)
        .bind(&speaker.name)
        .bind(&speaker.designation)
        .bind(&speaker.affiliation)
        .bind(&speaker.email)
        .bind(&speaker.talk_title)
        .bind(&speaker.talk_abstract)
        .bind(&speaker.image_url)
        .bind(speaker.display_order)
        .bind(speaker.active)
        .bind(speaker.created_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(speaker)
    }

    async fn fetch_speaker(&self, id: Uuid) -> Result<Option<Speaker>, StoreError> {
        let speaker = sqlx::query_as::<_, Speaker>("SELECT * FROM speakers WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        Ok(speaker)
    }

    async fn update_speaker(&self, speaker: &Speaker) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE speakers
            SET name = $2, designation = $3, affiliation = $4, email = $5,
                talk_title = $6, talk_abstract = $7, image_url = $8,
                display_order = $9, active = $10
            WHERE id = $1
            "#,
        )
        .bind(speaker.id)
        .bind(&speaker.name)
        .bind(&speaker.designation)
        .bind(&speaker.affiliation)
        .bind(&speaker.email)
        .bind(&speaker.talk_title)
        .bind(&speaker.talk_abstract)
        .bind(&speaker.image_url)
        .bind(speaker.display_order)
        .bind(speaker.active)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn delete_speaker(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM speakers WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_speakers(&self) -> Result<Vec<Speaker>, StoreError> {
        let speakers = sqlx::query_as::<_, Speaker>(
            "SELECT * FROM speakers ORDER BY display_order, id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(speakers)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn fetch_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        Ok(user)
    }
}
