/*! Database schema initialization. */

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, expense::create_expense_table, recurring::create_recurring_table,
    settings::create_settings_table,
};

/// Create the application tables if they do not exist yet.
///
/// Safe to call on every startup, including against a database that has
/// already been initialized.
///
/// # Errors
/// Returns an error if the schema cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_expense_table(&transaction)?;
    create_recurring_table(&transaction)?;
    create_settings_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
