//! The expense listing page with filtering, sorting and summary statistics.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::NoticeParams,
    endpoints,
    html::{base, format_currency},
    navigation::NavBar,
    recurring::catch_up_recurring,
};

use super::{
    add::category_options,
    core::Expense,
    query::{ExpenseFilter, ExpenseStats, SortKey, format_date, parse_date_param, query_expenses},
};

/// The state needed for the expense listing page.
#[derive(Debug, Clone)]
pub struct ViewPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// A canonical timezone string used to resolve today's date.
    pub local_timezone: String,
}

impl FromRef<AppState> for ViewPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters accepted by the expense listing page.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    /// Substring to search item names for.
    pub q: Option<String>,
    /// Category to restrict the listing to.
    pub category: Option<String>,
    /// Earliest date to include, as `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Latest date to include, as `YYYY-MM-DD`.
    pub to: Option<String>,
    /// The sort order.
    pub sort: Option<String>,
    /// A success notice carried over a redirect.
    pub notice: Option<String>,
    /// An error message carried over a redirect.
    pub error: Option<String>,
}

impl ViewParams {
    fn into_filter_and_notice(self) -> (ExpenseFilter, NoticeParams) {
        let non_empty = |value: Option<String>| {
            value
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let filter = ExpenseFilter {
            query: non_empty(self.q),
            category: non_empty(self.category),
            from: self.from.as_deref().and_then(parse_date_param),
            to: self.to.as_deref().and_then(parse_date_param),
            sort: self
                .sort
                .as_deref()
                .map(SortKey::from_query_value)
                .unwrap_or_default(),
        };

        let notice = NoticeParams {
            notice: self.notice,
            error: self.error,
        };

        (filter, notice)
    }
}

/// Display the filtered expense listing.
///
/// Any due recurring charges are materialized before the listing is queried,
/// so the page always includes up-to-date recurring expenses.
pub async fn get_view_page(
    State(state): State<ViewPageState>,
    Query(params): Query<ViewParams>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    catch_up_recurring(&state.local_timezone, &connection)?;

    let (filter, notice) = params.into_filter_and_notice();
    let expenses = query_expenses(&filter, &connection)?;
    let stats = ExpenseStats::from_expenses(&expenses);
    let categories = category_options(&connection)?;

    Ok(render_view_page(&expenses, &stats, &filter, &categories, notice).into_response())
}

fn render_view_page(
    expenses: &[Expense],
    stats: &ExpenseStats,
    filter: &ExpenseFilter,
    categories: &[String],
    notice: NoticeParams,
) -> Markup {
    let sort_options = [
        (SortKey::DateDesc, "Date (newest first)"),
        (SortKey::DateAsc, "Date (oldest first)"),
        (SortKey::AmountDesc, "Amount (high to low)"),
        (SortKey::AmountAsc, "Amount (low to high)"),
    ];

    let content = html!(
        (NavBar::new(endpoints::VIEW).into_html())

        main class="container"
        {
            div class="card"
            {
                h2 { "Expenses" }

                (notice.into_html())

                form class="inline" method="get" action=(endpoints::VIEW)
                {
                    div
                    {
                        label for="q" { "Search" }
                        input
                            type="text"
                            id="q"
                            name="q"
                            placeholder="Item name"
                            value=[filter.query.as_deref()];
                    }

                    div
                    {
                        label for="category" { "Category" }
                        select id="category" name="category"
                        {
                            option value="" { "All categories" }

                            @for category in categories {
                                option
                                    value=(category)
                                    selected[filter.category.as_deref() == Some(category)]
                                {
                                    (category)
                                }
                            }
                        }
                    }

                    div
                    {
                        label for="from" { "From" }
                        input
                            type="date"
                            id="from"
                            name="from"
                            value=[filter.from.map(format_date)];
                    }

                    div
                    {
                        label for="to" { "To" }
                        input type="date" id="to" name="to" value=[filter.to.map(format_date)];
                    }

                    div
                    {
                        label for="sort" { "Sort" }
                        select id="sort" name="sort"
                        {
                            @for (key, description) in sort_options {
                                option
                                    value=(key.as_query_value())
                                    selected[filter.sort == key]
                                {
                                    (description)
                                }
                            }
                        }
                    }

                    button class="btn" type="submit" { "Apply" }
                }

                div class="stats"
                {
                    (stat_card("Total", format_currency(stats.total)))
                    (stat_card("Highest", format_currency(stats.highest)))
                    (stat_card("Lowest", format_currency(stats.lowest)))
                    (stat_card("Average", format_currency(stats.average)))
                }

                @if expenses.is_empty() {
                    p class="muted" { "No expenses match your filters." }
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
                                th { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for expense in expenses {
                                tr
                                {
                                    td { (expense.item) }
                                    td { (format_currency(expense.amount)) }
                                    td { (format_date(expense.date)) }
                                    td { (expense.category) }
                                    td
                                    {
                                        a
                                            href=(endpoints::format_endpoint(endpoints::EDIT, expense.id))
                                        {
                                            "Edit"
                                        }
                                        " · "
                                        a
                                            class="danger"
                                            href=(endpoints::format_endpoint(endpoints::DELETE, expense.id))
                                        {
                                            "Delete"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("View Expenses", &[], &content)
}

fn stat_card(label: &str, value: String) -> Markup {
    html!(
        div class="stat"
        {
            div class="small" { (label) }
            div class="value" { (value) }
        }
    )
}

#[cfg(test)]
mod view_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        expense::{NewExpense, create_expense},
    };

    use super::{ViewPageState, ViewParams, get_view_page};

    fn get_test_state() -> ViewPageState {
        let connection = Connection::open_in_memory().expect("could not open database");
        initialize(&connection).expect("could not initialize database");

        for (item, amount, date, category) in [
            ("Coffee", 4.5, date!(2025 - 10 - 01), "Food"),
            ("Train ticket", 12.0, date!(2025 - 10 - 02), "Travel"),
        ] {
            create_expense(
                NewExpense {
                    item: item.to_owned(),
                    amount,
                    date,
                    category: category.to_owned(),
                },
                &connection,
            )
            .expect("could not create expense");
        }

        ViewPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn get_returns_ok() {
        let state = get_test_state();

        let response = get_view_page(State(state), Query(ViewParams::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_filter_params_are_ignored() {
        let state = get_test_state();
        let params = ViewParams {
            q: Some("".to_owned()),
            category: Some("  ".to_owned()),
            from: Some("not a date".to_owned()),
            ..Default::default()
        };

        let response = get_view_page(State(state), Query(params)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let mut state = get_test_state();
        state.local_timezone = "Middle/Nowhere".to_owned();

        let result = get_view_page(State(state), Query(ViewParams::default())).await;

        assert!(matches!(result, Err(crate::Error::InvalidTimezone(_))));
    }
}
