//! The page and endpoints for managing recurring charge templates.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::{NoticeParams, redirect_with_error, redirect_with_notice},
    category, endpoints,
    expense::{format_date, parse_date_param},
    html::{base, format_currency},
    money::parse_amount_lenient,
    navigation::NavBar,
    timezone,
};

use super::core::{
    Frequency, NewRecurringTemplate, RecurringTemplate, create_recurring, delete_recurring,
    get_all_recurring,
};

/// The state needed for the recurring template page.
#[derive(Debug, Clone)]
pub struct RecurringPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// A canonical timezone string used to resolve today's date.
    pub local_timezone: String,
}

impl FromRef<AppState> for RecurringPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the recurring template listing and the form for adding one.
pub async fn get_recurring_page(
    State(state): State<RecurringPageState>,
    Query(notice): Query<NoticeParams>,
) -> Result<Response, Error> {
    let today = timezone::today_in(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezone(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let templates = get_all_recurring(&connection)?;

    Ok(render_recurring_page(&templates, format_date(today), notice).into_response())
}

fn render_recurring_page(
    templates: &[RecurringTemplate],
    today: String,
    notice: NoticeParams,
) -> Markup {
    let content = html!(
        (NavBar::new(endpoints::RECURRING).into_html())

        main class="container"
        {
            div class="card"
            {
                h2 { "Recurring Expenses" }

                (notice.into_html())

                p class="muted"
                {
                    "Each template adds an expense every month, starting one month after "
                    "its start date. Removing a template keeps the expenses it has "
                    "already added."
                }

                form class="inline" method="post" action=(endpoints::RECURRING)
                {
                    div
                    {
                        label for="item" { "Item" }
                        input type="text" id="item" name="item" placeholder="e.g. Rent";
                    }

                    div
                    {
                        label for="amount" { "Amount" }
                        input
                            type="number"
                            step="0.01"
                            min="0"
                            id="amount"
                            name="amount"
                            placeholder="0.00";
                    }

                    div
                    {
                        label for="start_date" { "Start date" }
                        input type="date" id="start_date" name="start_date" value=(today);
                    }

                    div
                    {
                        label for="freq" { "Frequency" }
                        select id="freq" name="freq"
                        {
                            option value=(Frequency::Monthly.as_str()) { "Monthly" }
                        }
                    }

                    div
                    {
                        label for="category" { "Category" }
                        input type="text" id="category" name="category" placeholder="Other";
                    }

                    button class="btn" type="submit" { "Add Recurring" }
                }

                @if templates.is_empty() {
                    p class="muted" { "No recurring expenses yet." }
                } @else {
                    table
                    {
                        thead
                        {
                            tr
                            {
                                th { "Item" }
                                th { "Amount" }
                                th { "Start date" }
                                th { "Last applied" }
                                th { "Category" }
                                th { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for template in templates {
                                tr
                                {
                                    td { (template.item) }
                                    td { (format_currency(template.amount)) }
                                    td { (format_date(template.start_date)) }
                                    td
                                    {
                                        @match template.last_applied {
                                            Some(date) => { (format_date(date)) }
                                            None => { span class="muted" { "never" } }
                                        }
                                    }
                                    td { (template.category) }
                                    td
                                    {
                                        a
                                            class="danger"
                                            href=(endpoints::format_endpoint(endpoints::REC_REMOVE, template.id))
                                        {
                                            "Remove"
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

    base("Recurring Expenses", &[], &content)
}

/// The form data for creating a recurring template.
#[derive(Debug, Deserialize)]
pub struct RecurringForm {
    /// What the recurring charge is for.
    pub item: Option<String>,
    /// The amount charged each month, as entered.
    pub amount: Option<String>,
    /// The date of the first charge, as entered.
    pub start_date: Option<String>,
    /// How often the charge repeats. Currently always monthly.
    pub freq: Option<String>,
    /// The category assigned to materialized expenses.
    pub category: Option<String>,
}

/// Create a recurring template and redirect back to the recurring page.
///
/// A missing item name redirects back with an error message. Every other
/// field is coerced the same way as when adding an expense.
pub async fn post_recurring(
    State(state): State<RecurringPageState>,
    Form(form): Form<RecurringForm>,
) -> Result<Response, Error> {
    let item = form.item.as_deref().unwrap_or_default().trim().to_owned();

    if item.is_empty() {
        return Ok(
            redirect_with_error(endpoints::RECURRING, "Please enter an item name").into_response(),
        );
    }

    let today = timezone::today_in(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezone(state.local_timezone.clone()))?;

    let template = NewRecurringTemplate {
        item,
        amount: parse_amount_lenient(form.amount.as_deref().unwrap_or_default()),
        start_date: form
            .start_date
            .as_deref()
            .and_then(parse_date_param)
            .unwrap_or(today),
        frequency: Frequency::default(),
        category: category::normalize(form.category.as_deref().unwrap_or_default()),
    };

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    create_recurring(template, &connection)?;

    Ok(redirect_with_notice(endpoints::RECURRING, "Recurring saved").into_response())
}

/// Delete the recurring template with `recurring_id` and redirect back to the
/// recurring page.
///
/// Expenses already materialized from the template are kept. Removing an ID
/// with no matching row still redirects with the notice.
pub async fn get_remove_recurring(
    State(state): State<RecurringPageState>,
    Path(recurring_id): Path<i64>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_recurring(recurring_id, &connection)?;

    Ok(redirect_with_notice(endpoints::RECURRING, "Recurring removed").into_response())
}

#[cfg(test)]
mod recurring_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        alert::NoticeParams,
        db::initialize,
        recurring::{Frequency, NewRecurringTemplate, create_recurring, get_all_recurring},
    };

    use super::{
        RecurringForm, RecurringPageState, get_recurring_page, get_remove_recurring,
        post_recurring,
    };

    fn get_test_state() -> RecurringPageState {
        let connection = Connection::open_in_memory().expect("could not open database");
        initialize(&connection).expect("could not initialize database");

        RecurringPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn get_returns_ok() {
        let state = get_test_state();

        let response = get_recurring_page(State(state), Query(NoticeParams::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn post_creates_template_and_redirects() {
        let state = get_test_state();

        let form = RecurringForm {
            item: Some("Rent".to_owned()),
            amount: Some("1200".to_owned()),
            start_date: Some("2023-01-15".to_owned()),
            freq: Some("monthly".to_owned()),
            category: Some("Bills".to_owned()),
        };

        let response = post_recurring(State(state.clone()), Form(form)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        let templates = get_all_recurring(&connection).unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].item, "Rent");
        assert_eq!(templates[0].amount, 1200.0);
        assert_eq!(templates[0].start_date, date!(2023 - 01 - 15));
        assert_eq!(templates[0].last_applied, None);
    }

    #[tokio::test]
    async fn post_without_item_redirects_back_with_error() {
        let state = get_test_state();

        let form = RecurringForm {
            item: None,
            amount: Some("1200".to_owned()),
            start_date: None,
            freq: None,
            category: None,
        };

        let response = post_recurring(State(state.clone()), Form(form)).await.unwrap();

        let location = response
            .headers()
            .get("location")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert_eq!(location, "/recurring?error=Please+enter+an+item+name");

        let connection = state.db_connection.lock().unwrap();
        assert!(get_all_recurring(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_deletes_template_and_redirects() {
        let state = get_test_state();
        let template_id = {
            let connection = state.db_connection.lock().unwrap();
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
            .unwrap()
            .id
        };

        let response = get_remove_recurring(State(state.clone()), Path(template_id))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        assert!(get_all_recurring(&connection).unwrap().is_empty());
    }
}
