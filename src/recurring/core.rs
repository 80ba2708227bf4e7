//! Defines the core data model and database queries for recurring charge templates.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// How often a recurring charge repeats.
///
/// Only monthly repetition is supported. The column still stores a label so
/// other frequencies can be added without a schema change, and unrecognised
/// labels are read back as monthly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Repeats once a month on the same day, clamped to shorter months.
    #[default]
    Monthly,
}

impl Frequency {
    /// The label stored in the database and used in form values.
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
        }
    }
}

impl ToSql for Frequency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Frequency {
    fn column_result(_: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(Frequency::Monthly)
    }
}

/// A template that materializes an expense every month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTemplate {
    /// The ID of the template.
    pub id: i64,
    /// What the recurring charge is for.
    pub item: String,
    /// The amount charged each month.
    pub amount: f64,
    /// The date of the first charge.
    pub start_date: Date,
    /// How often the charge repeats.
    pub frequency: Frequency,
    /// The date of the most recently materialized charge, or `None` if no
    /// charge has been materialized yet.
    pub last_applied: Option<Date>,
    /// The category assigned to materialized expenses.
    pub category: String,
}

/// The data needed to create a [RecurringTemplate].
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecurringTemplate {
    /// What the recurring charge is for.
    pub item: String,
    /// The amount charged each month.
    pub amount: f64,
    /// The date of the first charge.
    pub start_date: Date,
    /// How often the charge repeats.
    pub frequency: Frequency,
    /// The category assigned to materialized expenses.
    pub category: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the recurring template table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_recurring_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS recurring (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item TEXT NOT NULL,
                amount REAL NOT NULL,
                start_date TEXT NOT NULL,
                freq TEXT NOT NULL,
                last_applied TEXT,
                category TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create a new recurring template in the database.
///
/// The template starts with no materialized charges.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_recurring(
    template: NewRecurringTemplate,
    connection: &Connection,
) -> Result<RecurringTemplate, Error> {
    let template = connection
        .prepare(
            "INSERT INTO recurring (item, amount, start_date, freq, last_applied, category)
             VALUES (?1, ?2, ?3, ?4, NULL, ?5)
             RETURNING id, item, amount, start_date, freq, last_applied, category",
        )?
        .query_one(
            (
                template.item,
                template.amount,
                template.start_date,
                template.frequency,
                template.category,
            ),
            map_recurring_row,
        )?;

    Ok(template)
}

/// Every recurring template, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_all_recurring(connection: &Connection) -> Result<Vec<RecurringTemplate>, Error> {
    let templates = connection
        .prepare(
            "SELECT id, item, amount, start_date, freq, last_applied, category
             FROM recurring ORDER BY id DESC",
        )?
        .query_map([], map_recurring_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(templates)
}

/// Record that the template with `id` has been materialized up to `date`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid template,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn set_last_applied(id: i64, date: Date, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE recurring SET last_applied = ?1 WHERE id = ?2",
        (date, id),
    )?;

    if rows_affected == 0 {
        Err(Error::NotFound)
    } else {
        Ok(())
    }
}

/// Delete the recurring template with `id`, if it exists.
///
/// Deleting an ID with no matching row is not an error. Expenses already
/// materialized from the template are kept.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_recurring(id: i64, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM recurring WHERE id = ?1", (id,))?;

    Ok(())
}

/// Delete every recurring template.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_all_recurring(connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM recurring", ())?;

    Ok(())
}

/// Map a database row to a RecurringTemplate.
pub fn map_recurring_row(row: &Row) -> Result<RecurringTemplate, rusqlite::Error> {
    let id = row.get(0)?;
    let item = row.get(1)?;
    let amount = row.get(2)?;
    let start_date = row.get(3)?;
    let frequency = row.get(4)?;
    let last_applied = row.get(5)?;
    let category = row.get(6)?;

    Ok(RecurringTemplate {
        id,
        item,
        amount,
        start_date,
        frequency,
        last_applied,
        category,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{Error, db::initialize};

    use super::{
        Frequency, NewRecurringTemplate, create_recurring, delete_all_recurring, delete_recurring,
        get_all_recurring, set_last_applied,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_template(item: &str, start_date: time::Date) -> NewRecurringTemplate {
        NewRecurringTemplate {
            item: item.to_owned(),
            amount: 100.0,
            start_date,
            frequency: Frequency::Monthly,
            category: "Bills".to_owned(),
        }
    }

    #[test]
    fn create_starts_with_no_last_applied() {
        let conn = get_test_connection();

        let template =
            create_recurring(new_template("Rent", date!(2023 - 01 - 15)), &conn).unwrap();

        assert_eq!(template.item, "Rent");
        assert_eq!(template.start_date, date!(2023 - 01 - 15));
        assert_eq!(template.last_applied, None);
        assert_eq!(template.frequency, Frequency::Monthly);
    }

    #[test]
    fn listing_is_newest_first() {
        let conn = get_test_connection();
        create_recurring(new_template("Rent", date!(2023 - 01 - 15)), &conn).unwrap();
        create_recurring(new_template("Gym", date!(2023 - 02 - 01)), &conn).unwrap();

        let templates = get_all_recurring(&conn).unwrap();

        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].item, "Gym");
        assert_eq!(templates[1].item, "Rent");
    }

    #[test]
    fn set_last_applied_round_trips() {
        let conn = get_test_connection();
        let template =
            create_recurring(new_template("Rent", date!(2023 - 01 - 15)), &conn).unwrap();

        set_last_applied(template.id, date!(2023 - 02 - 15), &conn).unwrap();

        let templates = get_all_recurring(&conn).unwrap();
        assert_eq!(templates[0].last_applied, Some(date!(2023 - 02 - 15)));
    }

    #[test]
    fn set_last_applied_missing_id_is_not_found() {
        let conn = get_test_connection();

        let result = set_last_applied(999, date!(2023 - 02 - 15), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_is_silent_for_missing_id() {
        let conn = get_test_connection();

        delete_recurring(999, &conn).expect("delete of missing id should succeed");
    }

    #[test]
    fn delete_all_leaves_empty_table() {
        let conn = get_test_connection();
        create_recurring(new_template("Rent", date!(2023 - 01 - 15)), &conn).unwrap();

        delete_all_recurring(&conn).unwrap();

        assert!(get_all_recurring(&conn).unwrap().is_empty());
    }

    #[test]
    fn unknown_frequency_label_reads_as_monthly() {
        let conn = get_test_connection();
        conn.execute(
            "INSERT INTO recurring (item, amount, start_date, freq, last_applied, category)
             VALUES ('Rent', 100.0, '2023-01-15', 'fortnightly', NULL, 'Bills')",
            (),
        )
        .unwrap();

        let templates = get_all_recurring(&conn).unwrap();

        assert_eq!(templates[0].frequency, Frequency::Monthly);
    }
}
