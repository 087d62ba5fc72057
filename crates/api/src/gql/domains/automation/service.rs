use crate::engine::{AutoFillEngine, AutoFillReport};
use crate::error::AppError;
use crate::state::AppState;

/// Run an auto-fill pass under the assignment lock.
pub async fn auto_fill(state: &AppState) -> Result<AutoFillReport, AppError> {
    let _guard = state.lock().await;
    Ok(AutoFillEngine::new(state.store.clone()).run().await?)
}

/// Same pass against the current state, with nothing written.
pub async fn auto_fill_preview(state: &AppState) -> Result<AutoFillReport, AppError> {
    let _guard = state.lock().await;
    Ok(AutoFillEngine::new(state.store.clone()).preview().await?)
}
