//! The dashboard: lifetime total and the most recent expenses.

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
    expense::{Expense, format_date, recent_expenses, total_spent},
    html::{base, format_currency},
    navigation::NavBar,
    recurring::catch_up_recurring,
};

/// How many recent expenses the dashboard lists.
const RECENT_EXPENSE_COUNT: u32 = 5;

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// A canonical timezone string used to resolve today's date.
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the dashboard.
///
/// Any due recurring charges are materialized first so the total and recent
/// list include them.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(notice): Query<NoticeParams>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    catch_up_recurring(&state.local_timezone, &connection)?;

    let total = total_spent(&connection)?;
    let recent = recent_expenses(RECENT_EXPENSE_COUNT, &connection)?;

    Ok(render_dashboard(total, &recent, notice).into_response())
}

fn render_dashboard(total: f64, recent: &[Expense], notice: NoticeParams) -> Markup {
    let content = html!(
        (NavBar::new(endpoints::ROOT).into_html())

        main class="container"
        {
            (notice.into_html())

            div class="card"
            {
                h2 { "Total Spent" }

                p style="font-size:2rem;font-weight:800;margin:0"
                {
                    (format_currency(total))
                }
            }

            div class="card"
            {
                h2 { "Recent Expenses" }

                @if recent.is_empty() {
                    p class="muted"
                    {
                        "Nothing recorded yet. "
                        a href=(endpoints::ADD) { "Add your first expense" }
                        "."
                    }
                } @else {
                    table
                    {
                        thead
                        {
                            tr
                            {
                                th { "Item" }
                                th { "Amount" }
                                th { "Date" }
                                th { "Category" }
                            }
                        }

                        tbody
                        {
                            @for expense in recent {
                                tr
                                {
                                    td { (expense.item) }
                                    td { (format_currency(expense.amount)) }
                                    td { (format_date(expense.date)) }
                                    td { (expense.category) }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Dashboard", &[], &content)
}

#[cfg(test)]
mod dashboard_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        alert::NoticeParams,
        db::initialize,
        expense::{NewExpense, create_expense},
        recurring::{Frequency, NewRecurringTemplate, create_recurring},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_test_state() -> DashboardState {
        let connection = Connection::open_in_memory().expect("could not open database");
        initialize(&connection).expect("could not initialize database");

        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn get_returns_ok() {
        let state = get_test_state();

        let response = get_dashboard_page(State(state), Query(NoticeParams::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn visiting_the_dashboard_materializes_due_recurring_charges() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_expense(
                NewExpense {
                    item: "Coffee".to_owned(),
                    amount: 4.5,
                    date: date!(2023 - 01 - 02),
                    category: "Food".to_owned(),
                },
                &connection,
            )
            .unwrap();
            create_recurring(
                NewRecurringTemplate {
                    item: "Rent".to_owned(),
                    amount: 1200.0,
                    start_date: date!(2023 - 01 - 15),
                    frequency: Frequency::Monthly,
                    category: "Bills".to_owned(),
                },
                &connection,
            )
            .unwrap();
        }

        get_dashboard_page(State(state.clone()), Query(NoticeParams::default()))
            .await
            .unwrap();

        let connection = state.db_connection.lock().unwrap();
        let total: f64 = connection
            .query_row("SELECT SUM(amount) FROM expense", [], |row| row.get(0))
            .unwrap();

        // The coffee plus at least one materialized rent charge.
        assert!(total >= 1204.5);
    }
}
