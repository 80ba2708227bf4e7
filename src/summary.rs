//! The monthly and category spending summary page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::NoticeParams,
    endpoints,
    html::{base, format_currency},
    navigation::NavBar,
    recurring::catch_up_recurring,
};

/// Spending per calendar month, oldest month first.
///
/// Months are `YYYY-MM` labels taken from the expense dates.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn monthly_totals(connection: &Connection) -> Result<Vec<(String, f64)>, Error> {
    let totals = connection
        .prepare(
            "SELECT substr(date, 1, 7) AS month, SUM(amount) FROM expense
             GROUP BY month ORDER BY month ASC",
        )?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(totals)
}

/// Spending per category, largest total first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn category_totals(connection: &Connection) -> Result<Vec<(String, f64)>, Error> {
    let totals = connection
        .prepare(
            "SELECT category, SUM(amount) FROM expense
             GROUP BY category ORDER BY SUM(amount) DESC",
        )?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(totals)
}

/// The state needed for the summary page.
#[derive(Debug, Clone)]
pub struct SummaryPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// A canonical timezone string used to resolve today's date.
    pub local_timezone: String,
}

impl FromRef<AppState> for SummaryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the monthly and category summary.
///
/// Any due recurring charges are materialized first so the totals include
/// them.
pub async fn get_summary_page(
    State(state): State<SummaryPageState>,
    Query(notice): Query<NoticeParams>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    catch_up_recurring(&state.local_timezone, &connection)?;

    let monthly = monthly_totals(&connection)?;
    let by_category = category_totals(&connection)?;

    Ok(render_summary_page(&monthly, &by_category, notice).into_response())
}

fn render_summary_page(
    monthly: &[(String, f64)],
    by_category: &[(String, f64)],
    notice: NoticeParams,
) -> Markup {
    let content = html!(
        (NavBar::new(endpoints::SUMMARY).into_html())

        main class="container"
        {
            (notice.into_html())

            div class="card"
            {
                h2 { "Monthly Summary" }

                (totals_table("Month", monthly.iter().rev()))
            }

            div class="card"
            {
                h2 { "Spending by Category" }

                (totals_table("Category", by_category.iter()))
            }
        }
    );

    base("Summary", &[], &content)
}

fn totals_table<'a>(
    label: &str,
    rows: impl Iterator<Item = &'a (String, f64)> + Clone,
) -> Markup {
    html!(
        @if rows.clone().next().is_none() {
            p class="muted" { "Nothing recorded yet." }
        } @else {
            table
            {
                thead
                {
                    tr
                    {
                        th { (label) }
                        th { "Total" }
                    }
                }

                tbody
                {
                    @for (name, total) in rows {
                        tr
                        {
                            td { (name) }
                            td { (format_currency(*total)) }
                        }
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod summary_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        alert::NoticeParams,
        db::initialize,
        expense::{NewExpense, create_expense},
    };

    use super::{SummaryPageState, category_totals, get_summary_page, monthly_totals};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        for (item, amount, date, category) in [
            ("Coffee", 4.5, date!(2025 - 09 - 28), "Food"),
            ("Groceries", 60.0, date!(2025 - 10 - 03), "Food"),
            ("Train ticket", 12.0, date!(2025 - 10 - 02), "Travel"),
        ] {
            create_expense(
                NewExpense {
                    item: item.to_owned(),
                    amount,
                    date,
                    category: category.to_owned(),
                },
                &conn,
            )
            .unwrap();
        }

        conn
    }

    #[test]
    fn monthly_totals_group_by_calendar_month() {
        let conn = get_test_connection();

        let totals = monthly_totals(&conn).unwrap();

        assert_eq!(
            totals,
            vec![
                ("2025-09".to_owned(), 4.5),
                ("2025-10".to_owned(), 72.0),
            ]
        );
    }

    #[test]
    fn category_totals_are_largest_first() {
        let conn = get_test_connection();

        let totals = category_totals(&conn).unwrap();

        assert_eq!(
            totals,
            vec![("Food".to_owned(), 64.5), ("Travel".to_owned(), 12.0)]
        );
    }

    #[tokio::test]
    async fn get_returns_ok() {
        let state = SummaryPageState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_summary_page(State(state), Query(NoticeParams::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
