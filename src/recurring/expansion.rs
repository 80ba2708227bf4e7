//! Materializing due recurring charges into the expense table.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use time::Date;

use crate::{
    Error,
    expense::{NewExpense, create_expense},
    timezone,
};

use super::{
    core::{get_all_recurring, set_last_applied},
    schedule::add_one_month,
};

/// Materialize every recurring charge that is due on or before `as_of`.
///
/// For each template, charges are generated one month apart starting one
/// month after the later of its start date and its last materialized charge.
/// The start date itself is never materialized. Returns the number of
/// expenses created.
///
/// The whole catch-up runs in a single immediate transaction, so concurrent
/// requests cannot materialize the same charge twice and a failure part-way
/// through leaves the database unchanged.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn apply_recurring(as_of: Date, connection: &Connection) -> Result<u32, Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let mut created = 0;

    for template in get_all_recurring(&transaction)? {
        let mut anchor = template.last_applied.unwrap_or(template.start_date);

        if anchor > as_of {
            continue;
        }

        let mut next = add_one_month(anchor);

        while next <= as_of {
            create_expense(
                NewExpense {
                    item: template.item.clone(),
                    amount: template.amount,
                    date: next,
                    category: template.category.clone(),
                },
                &transaction,
            )?;

            created += 1;
            anchor = next;
            next = add_one_month(anchor);
        }

        if Some(anchor) != template.last_applied {
            set_last_applied(template.id, anchor, &transaction)?;
        }
    }

    if created > 0 {
        tracing::info!("materialized {created} recurring expense(s)");
    }

    transaction.commit()?;

    Ok(created)
}

/// Materialize recurring charges due up to today in the given timezone.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidTimezone] if `local_timezone` is not a canonical timezone string,
/// - or [Error::SqlError] if there is an SQL error.
pub fn catch_up_recurring(local_timezone: &str, connection: &Connection) -> Result<u32, Error> {
    let today = timezone::today_in(local_timezone)
        .ok_or_else(|| Error::InvalidTimezone(local_timezone.to_owned()))?;

    apply_recurring(today, connection)
}
