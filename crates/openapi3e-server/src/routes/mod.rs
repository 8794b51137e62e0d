pub mod spec;

use crate::state::AppState;
use axum::Router;

pub fn create_router(state: AppState) -> Router {
    Router::new().merge(spec::routes()).with_state(state)
}
