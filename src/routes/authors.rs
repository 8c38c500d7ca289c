use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use crate::db::models::{Paper, Payment};
use crate::error::WorkflowError;
use crate::identity::Caller;
use crate::notify::Notifier;
use crate::review::store::{Store, StoreError};
use crate::review::{PaperDraft, PaymentDraft};
use crate::state::AppState;
use crate::storage;

pub(crate) async fn my_papers<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
) -> Result<Json<Vec<Paper>>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    Ok(Json(state.service.my_papers(&caller).await?))
}

pub(crate) async fn create_paper<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Json(draft): Json<PaperDraft>,
) -> Result<(StatusCode, Json<Paper>), WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let paper = state.service.submit_paper(&caller, draft).await?;
    Ok((StatusCode::CREATED, Json(paper)))
}

pub(crate) async fn my_payments<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
) -> Result<Json<Vec<Payment>>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    Ok(Json(state.service.my_payments(&caller).await?))
}

pub(crate) async fn create_payment<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    caller: Caller,
    Json(draft): Json<PaymentDraft>,
) -> Result<(StatusCode, Json<Payment>), WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let payment = state.service.register_payment(&caller, draft).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Multipart proof upload. Stores the file and hands back the URL the
/// payment record should reference.
pub(crate) async fn upload_proof<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    _caller: Caller,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let mut proof_data: Option<Vec<u8>> = None;
    let mut filename = String::new();

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name().unwrap_or("") == "proof" {
            filename = field.file_name().unwrap_or("proof.pdf").to_string();
            if let Ok(data) = field.bytes().await {
                proof_data = Some(data.to_vec());
            }
        }
    }

    let proof_data = match proof_data {
        Some(d) if !d.is_empty() => d,
        _ => {
            return Err(WorkflowError::Validation(
                "a `proof` file field is required".to_string(),
            ))
        }
    };

    if !storage::is_allowed_proof(&filename) {
        return Err(WorkflowError::Validation(
            "proof must be a pdf, png or jpeg file".to_string(),
        ));
    }

    let url = storage::save_proof(&state.config.upload_folder, &filename, &proof_data)
        .map_err(|e| WorkflowError::Persistence(StoreError::Unavailable(e.to_string())))?;

    Ok(Json(json!({ "url": url })))
}
