//! The endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::redirect_with_notice, endpoints};

use super::core::delete_expense;

/// The state needed for the delete expense endpoint.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete the expense with `expense_id` and redirect to the listing page.
///
/// Deleting an ID with no matching row still redirects with the notice, the
/// same as deleting an existing expense.
pub async fn get_delete_expense(
    State(state): State<DeleteExpenseState>,
    Path(expense_id): Path<i64>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_expense(expense_id, &connection)?;

    Ok(redirect_with_notice(endpoints::VIEW, "Deleted").into_response())
}
