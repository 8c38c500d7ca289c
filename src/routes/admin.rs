use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::io::Write;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::models::{CommitteeCategory, CommitteeMember, Paper, Payment, Speaker};
use crate::error::WorkflowError;
use crate::identity::Caller;
use crate::notify::Notifier;
use crate::review::store::{Store, StoreError};
use crate::review::{
    MemberDraft, MemberPatch, PaperPatch, PaymentDecision, PaymentPatch, SpeakerDraft,
    SpeakerPatch, SubmissionDecision,
};
use crate::state::AppState;
use crate::status::StatusFilter;
use crate::storage;

#[derive(Deserialize)]
pub(crate) struct StatusQuery {
    status: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct CategoryQuery {
    pub(crate) category: Option<String>,
}

// --- papers ---

pub(crate) async fn list_papers<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<Paper>>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let filter = StatusFilter::parse(query.status.as_deref())?;
    Ok(Json(state.service.list_papers(&caller, filter).await?))
}

pub(crate) async fn edit_paper<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(patch): Json<PaperPatch>,
) -> Result<Json<Paper>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    Ok(Json(state.service.edit_paper(&caller, id, patch).await?))
}

pub(crate) async fn delete_paper<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    state.service.delete_paper(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub(crate) struct SubmissionDecisionBody {
    status: String,
    #[serde(default)]
    approval_notes: Option<String>,
}

pub(crate) async fn decide_submission<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<SubmissionDecisionBody>,
) -> Result<Json<Paper>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let decision = match body.status.as_str() {
        "submitted" => SubmissionDecision::Approve,
        "rejected" => SubmissionDecision::Reject,
        other => {
            return Err(WorkflowError::Validation(format!(
                "decision must be `submitted` or `rejected`, got `{other}`"
            )))
        }
    };
    let paper = state
        .service
        .decide_submission(&caller, id, decision, body.approval_notes)
        .await?;
    Ok(Json(paper))
}

// --- payments ---

pub(crate) async fn list_payments<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<Payment>>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let filter = StatusFilter::parse(query.status.as_deref())?;
    Ok(Json(state.service.list_payments(&caller, filter).await?))
}

#[derive(Deserialize)]
pub(crate) struct PaymentDecisionBody {
    status: String,
    #[serde(default)]
    verification_notes: Option<String>,
}

pub(crate) async fn decide_payment<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(body): Json<PaymentDecisionBody>,
) -> Result<Json<Payment>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let decision = match body.status.as_str() {
        "verified" => PaymentDecision::Verify,
        "rejected" => PaymentDecision::Reject,
        other => {
            return Err(WorkflowError::Validation(format!(
                "decision must be `verified` or `rejected`, got `{other}`"
            )))
        }
    };
    let payment = state
        .service
        .decide_payment(&caller, id, decision, body.verification_notes)
        .await?;
    Ok(Json(payment))
}

pub(crate) async fn edit_payment<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(patch): Json<PaymentPatch>,
) -> Result<Json<Payment>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    Ok(Json(state.service.edit_payment(&caller, id, patch).await?))
}

pub(crate) async fn delete_payment<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    state.service.delete_payment(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn download_proof<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<axum::response::Response, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let payment = state.service.get_payment(&caller, id).await?;

    let path = storage::proof_path(&state.config.upload_folder, &payment.proof_url)
        .filter(|p| p.exists())
        .ok_or(WorkflowError::NotFound("proof file"))?;

    let content = std::fs::read(&path)
        .map_err(|e| WorkflowError::Persistence(StoreError::Unavailable(e.to_string())))?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("proof")
        .to_string();
    let mime = mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or("application/octet-stream");

    Ok(axum::response::Response::builder()
        .header("Content-Type", mime)
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(axum::body::Body::from(content))
        .unwrap())
}

pub(crate) async fn download_proofs_zip<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
) -> Result<axum::response::Response, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let payments = state.service.list_payments(&caller, StatusFilter::All).await?;

    let mut zip_data = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut zip_data));
        let options = zip::write::SimpleFileOptions::default().unix_permissions(0o644);

        for payment in &payments {
            let Some(path) = storage::proof_path(&state.config.upload_folder, &payment.proof_url)
            else {
                continue;
            };
            if !path.exists() {
                continue;
            }
            if let Ok(content) = std::fs::read(&path) {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("proof")
                    .to_string();
                let _ = zip.start_file(format!("{}_{}", payment.id, name), options);
                let _ = zip.write_all(&content);
            }
        }

        let _ = zip.finish();
    }

    Ok(axum::response::Response::builder()
        .header("Content-Type", "application/zip")
        .header(
            "Content-Disposition",
            "attachment; filename=\"payment_proofs.zip\"",
        )
        .body(axum::body::Body::from(zip_data))
        .unwrap())
}

pub(crate) async fn export_payments_csv<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
) -> Result<axum::response::Response, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let rows = state.service.payments_with_owners(&caller).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    let _ = writer.write_record([
        "id",
        "owner_name",
        "owner_email",
        "amount",
        "currency",
        "category",
        "status",
        "transaction_reference",
        "created_at",
    ]);
    for (payment, owner) in &rows {
        let _ = writer.write_record([
            payment.id.to_string(),
            owner.as_ref().map(|u| u.full_name.clone()).unwrap_or_default(),
            owner.as_ref().map(|u| u.email.clone()).unwrap_or_default(),
            payment.amount.to_string(),
            payment.currency.clone(),
            payment.category.clone(),
            payment.status.to_string(),
            payment.transaction_reference.clone().unwrap_or_default(),
            payment.created_at.to_rfc3339(),
        ]);
    }
    let data = writer.into_inner().unwrap_or_default();

    Ok(axum::response::Response::builder()
        .header("Content-Type", "text/csv")
        .header(
            "Content-Disposition",
            "attachment; filename=\"payments.csv\"",
        )
        .body(axum::body::Body::from(data))
        .unwrap())
}

// --- committee ---

pub(crate) async fn list_committee<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<CommitteeMember>>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    caller.require_admin()?;
    let category = query
        .category
        .as_deref()
        .map(str::parse::<CommitteeCategory>)
        .transpose()?;
    Ok(Json(state.service.list_committee(category).await?))
}

pub(crate) async fn create_member<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Json(draft): Json<MemberDraft>,
) -> Result<(StatusCode, Json<CommitteeMember>), WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let member = state.service.create_member(&caller, draft).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub(crate) async fn edit_member<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(patch): Json<MemberPatch>,
) -> Result<Json<CommitteeMember>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    Ok(Json(state.service.edit_member(&caller, id, patch).await?))
}

pub(crate) async fn delete_member<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    state.service.delete_member(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- speakers ---

pub(crate) async fn list_speakers<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
) -> Result<Json<Vec<Speaker>>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    caller.require_admin()?;
    Ok(Json(state.service.list_speakers().await?))
}

pub(crate) async fn create_speaker<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Json(draft): Json<SpeakerDraft>,
) -> Result<(StatusCode, Json<Speaker>), WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let speaker = state.service.create_speaker(&caller, draft).await?;
    Ok((StatusCode::CREATED, Json(speaker)))
}

pub(crate) async fn edit_speaker<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(patch): Json<SpeakerPatch>,
) -> Result<Json<Speaker>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    Ok(Json(state.service.edit_speaker(&caller, id, patch).await?))
}

pub(crate) async fn delete_speaker<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    state.service.delete_speaker(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
