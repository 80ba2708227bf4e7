//! The CSV download of the full expense table.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error};

use super::{
    core::Expense,
    query::{ExpenseFilter, format_date, query_expenses},
};

/// The state needed for the CSV export endpoint.
#[derive(Debug, Clone)]
pub struct ExportCsvState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportCsvState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Download every expense as a CSV file, newest date first.
pub async fn get_export_csv(State(state): State<ExportCsvState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = query_expenses(&ExpenseFilter::default(), &connection)?;

    let csv_data = write_expenses_csv(&expenses)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"expenses.csv\"",
            ),
        ],
        csv_data,
    )
        .into_response())
}

fn write_expenses_csv(expenses: &[Expense]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(["ID", "Item", "Amount", "Date", "Category"])?;

    for expense in expenses {
        writer.write_record([
            expense.id.to_string(),
            expense.item.clone(),
            expense.amount.to_string(),
            format_date(expense.date),
            expense.category.clone(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}
