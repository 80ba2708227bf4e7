//! The key-value settings table and the typed view over it.

use rusqlite::{Connection, OptionalExtension};

use crate::Error;

/// Create the settings table, a simple key-value store.
pub fn create_settings_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT
        )",
        (),
    )?;

    Ok(())
}

const BUDGET_KEY: &str = "budget";

/// Get the stored monthly budget.
///
/// Returns `None` when no budget has been set or the stored value does not
/// parse as a number.
pub fn get_budget(connection: &Connection) -> Result<Option<f64>, Error> {
    let value: Option<String> = connection
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            (BUDGET_KEY,),
            |row| row.get(0),
        )
        .optional()?;

    Ok(value.and_then(|raw| raw.parse::<f64>().ok()))
}

/// Store the budget, replacing any previous value.
pub fn set_budget(budget: f64, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
        (BUDGET_KEY, budget.to_string()),
    )?;

    Ok(())
}

#[cfg(test)]
mod settings_tests {
    use rusqlite::Connection;

    use super::{create_settings_table, get_budget, set_budget};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().expect("could not open database");
        create_settings_table(&connection).expect("could not create settings table");

        connection
    }

    #[test]
    fn budget_defaults_to_none() {
        let connection = get_test_connection();

        assert_eq!(get_budget(&connection).unwrap(), None);
    }

    #[test]
    fn set_and_get_budget() {
        let connection = get_test_connection();

        set_budget(500.0, &connection).unwrap();

        assert_eq!(get_budget(&connection).unwrap(), Some(500.0));
    }

    #[test]
    fn set_budget_replaces_previous_value() {
        let connection = get_test_connection();

        set_budget(500.0, &connection).unwrap();
        set_budget(750.5, &connection).unwrap();

        assert_eq!(get_budget(&connection).unwrap(), Some(750.5));
    }

    #[test]
    fn unparseable_budget_is_none() {
        let connection = get_test_connection();

        connection
            .execute(
                "INSERT OR REPLACE INTO settings (key, value) VALUES ('budget', 'lots')",
                (),
            )
            .unwrap();

        assert_eq!(get_budget(&connection).unwrap(), None);
    }
}
