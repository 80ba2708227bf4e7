//! Defines the core data model and database queries for expenses.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// A single spending record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: i64,
    /// What the money was spent on.
    pub item: String,
    /// The amount of money spent.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
    /// The category the expense belongs to.
    pub category: String,
}

/// The data needed to create an [Expense].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// What the money was spent on.
    pub item: String,
    /// The amount of money spent.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
    /// The category the expense belongs to.
    pub category: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                category TEXT NOT NULL
                )",
        (),
    )?;

    // Queried by the listing, summary and chart pages.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
        (),
    )?;

    Ok(())
}

/// Create a new expense in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO expense (item, amount, date, category)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, item, amount, date, category",
        )?
        .query_one(
            (
                new_expense.item,
                new_expense.amount,
                new_expense.date,
                new_expense.category,
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expense(id: i64, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare("SELECT id, item, amount, date, category FROM expense WHERE id = :id")?
        .query_one(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// Overwrite the expense with `expense.id` with the other fields of `expense`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `expense.id` does not refer to a valid expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(expense: &Expense, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expense SET item = ?1, amount = ?2, date = ?3, category = ?4 WHERE id = ?5",
        (
            &expense.item,
            expense.amount,
            expense.date,
            &expense.category,
            expense.id,
        ),
    )?;

    if rows_affected == 0 {
        Err(Error::NotFound)
    } else {
        Ok(())
    }
}

/// Delete the expense with `id`, if it exists.
///
/// Deleting an ID with no matching row is not an error.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_expense(id: i64, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM expense WHERE id = ?1", (id,))?;

    Ok(())
}

/// Delete every expense.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_all_expenses(connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM expense", ())?;

    Ok(())
}

/// The most recent expenses, newest date first, at most `limit` of them.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn recent_expenses(limit: u32, connection: &Connection) -> Result<Vec<Expense>, Error> {
    let expenses = connection
        .prepare(
            "SELECT id, item, amount, date, category FROM expense
             ORDER BY date DESC, id DESC LIMIT :limit",
        )?
        .query_map(&[(":limit", &limit)], map_expense_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(expenses)
}

/// The sum of all expense amounts, or zero for an empty table.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn total_spent(connection: &Connection) -> Result<f64, Error> {
    connection
        .query_row("SELECT COALESCE(SUM(amount), 0) FROM expense", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// The distinct categories in use, sorted alphabetically.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn distinct_categories(connection: &Connection) -> Result<Vec<String>, Error> {
    let categories = connection
        .prepare("SELECT DISTINCT category FROM expense ORDER BY category")?
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(categories)
}

/// Map a database row to an Expense.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let item = row.get(1)?;
    let amount = row.get(2)?;
    let date = row.get(3)?;
    let category = row.get(4)?;

    Ok(Expense {
        id,
        item,
        amount,
        date,
        category,
    })
}

// ============================================================================
// TESTS
// ============================================================================
