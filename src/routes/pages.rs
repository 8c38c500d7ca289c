use axum::extract::{Query, State};
use axum::response::Html;
use std::sync::Arc;
use tera::Context;

use crate::db::models::CommitteeCategory;
use crate::error::WorkflowError;
use crate::notify::Notifier;
use crate::review::store::Store;
use crate::routes::admin::CategoryQuery;
use crate::state::AppState;

pub(crate) async fn index<S, N>(State(_state): State<Arc<AppState<S, N>>>) -> Html<String>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    render("index.html", Context::new())
}

pub(crate) async fn committee_page<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Html<String>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let category = query
        .category
        .as_deref()
        .map(str::parse::<CommitteeCategory>)
        .transpose()?;

    let mut members = state.service.list_committee(category).await?;
    members.retain(|m| m.active);

    let mut ctx = Context::new();
    ctx.insert("members", &members);
    Ok(render("committee.html", ctx))
}

pub(crate) async fn speakers_page<S, N>(
    State(state): State<Arc<AppState<S, N>>>,
) -> Result<Html<String>, WorkflowError>
where
    S: Store + 'static,
    N: Notifier + 'static,
{
    let mut speakers = state.service.list_speakers().await?;
    speakers.retain(|s| s.active);

    let mut ctx = Context::new();
    ctx.insert("speakers", &speakers);
    Ok(render("speakers.html", ctx))
}

fn render(name: &str, ctx: Context) -> Html<String> {
    let rendered = crate::templates::get_tera()
        .render(name, &ctx)
        .unwrap_or_else(|_| format!("Template error: {}", name));
    Html(rendered)
}
