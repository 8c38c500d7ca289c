use crate::config::Config;
use crate::review::ReviewService;
use std::sync::Arc;

pub struct AppState<S, N> {
    pub service: ReviewService<S, N>,
    pub config: Arc<Config>,
}
