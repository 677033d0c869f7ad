use std::sync::Arc;

use warp::{Filter, Rejection};

use crate::AppState;

pub fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Rejection> + Clone {
    warp::any().map(move || state.clone()).boxed()
}
