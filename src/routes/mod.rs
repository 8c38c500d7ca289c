pub mod admin;
pub mod authors;
pub mod pages;

use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;

use crate::notify::Notifier;
use crate::review::store::Store;
use crate::state::AppState;

pub fn app_router<S, N>(state: Arc<AppState<S, N>>) -> Router
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/", get(pages::index::<S, N>))
        .route("/committee", get(pages::committee_page::<S, N>))
        .route("/speakers", get(pages::speakers_page::<S, N>))
        // admin back-office
        .route("/api/admin/papers", get(admin::list_papers::<S, N>))
        .route(
            "/api/admin/papers/:id",
            axum::routing::patch(admin::edit_paper::<S, N>).delete(admin::delete_paper::<S, N>),
        )
        .route(
            "/api/admin/submissions/:id",
            put(admin::decide_submission::<S, N>),
        )
        .route("/api/admin/payments", get(admin::list_payments::<S, N>))
        .route(
            "/api/admin/payments/proofs.zip",
            get(admin::download_proofs_zip::<S, N>),
        )
        .route(
            "/api/admin/payments/:id",
            put(admin::decide_payment::<S, N>)
                .patch(admin::edit_payment::<S, N>)
                .delete(admin::delete_payment::<S, N>),
        )
        .route(
            "/api/admin/payments/:id/proof",
            get(admin::download_proof::<S, N>),
        )
        .route(
            "/api/admin/export/payments.csv",
            get(admin::export_payments_csv::<S, N>),
        )
        .route(
            "/api/admin/committee",
            get(admin::list_committee::<S, N>).post(admin::create_member::<S, N>),
        )
        .route(
            "/api/admin/committee/:id",
            axum::routing::patch(admin::edit_member::<S, N>).delete(admin::delete_member::<S, N>),
        )
        .route(
            "/api/admin/speakers",
            get(admin::list_speakers::<S, N>).post(admin::create_speaker::<S, N>),
        )
        .route(
            "/api/admin/speakers/:id",
            axum::routing::patch(admin::edit_speaker::<S, N>).delete(admin::delete_speaker::<S, N>),
        )
        // author dashboard
        .route(
            "/api/authors/papers",
            get(authors::my_papers::<S, N>).post(authors::create_paper::<S, N>),
        )
        .route(
            "/api/authors/payments",
            get(authors::my_payments::<S, N>).post(authors::create_payment::<S, N>),
        )
        .route("/api/authors/uploads", post(authors::upload_proof::<S, N>))
        .with_state(state)
}
