//! The page and endpoint for recording a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::{NoticeParams, redirect_with_error, redirect_with_notice},
    category::{self, BUILT_IN_CATEGORIES},
    endpoints,
    html::base,
    money::parse_amount_lenient,
    navigation::NavBar,
    timezone,
};

use super::{
    core::{NewExpense, create_expense, distinct_categories},
    query::{format_date, parse_date_param},
};

/// The state needed for the add expense page.
#[derive(Debug, Clone)]
pub struct AddPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// A canonical timezone string used to resolve today's date.
    pub local_timezone: String,
}

impl FromRef<AppState> for AddPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The categories offered in the category drop-down: the built-in labels
/// followed by any other labels already in use.
pub fn category_options(connection: &Connection) -> Result<Vec<String>, Error> {
    let mut options: Vec<String> = BUILT_IN_CATEGORIES
        .iter()
        .map(|category| category.to_string())
        .collect();

    for category in distinct_categories(connection)? {
        if !options.contains(&category) {
            options.push(category);
        }
    }

    Ok(options)
}

/// Display the form for recording a new expense.
pub async fn get_add_page(
    State(state): State<AddPageState>,
    Query(notice): Query<NoticeParams>,
) -> Result<Response, Error> {
    let today = timezone::today_in(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezone(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = category_options(&connection)?;

    Ok(render_add_page(&categories, format_date(today), notice).into_response())
}

fn render_add_page(categories: &[String], today: String, notice: NoticeParams) -> Markup {
    let content = html!(
        (NavBar::new(endpoints::ADD).into_html())

        main class="container"
        {
            div class="card"
            {
                h2 { "Add Expense" }

                (notice.into_html())

                form class="stacked" method="post" action=(endpoints::ADD)
                {
                    label for="item" { "Item" }
                    input type="text" id="item" name="item" placeholder="e.g. Coffee" autofocus;

                    label for="amount" { "Amount" }
                    input
                        type="number"
                        step="0.01"
                        min="0"
                        id="amount"
                        name="amount"
                        placeholder="0.00";

                    label for="date" { "Date" }
                    input type="date" id="date" name="date" value=(today);

                    label for="category" { "Category" }
                    select id="category" name="category"
                    {
                        @for category in categories {
                            option value=(category) { (category) }
                        }
                    }

                    button class="btn" type="submit" { "Add Expense" }
                }
            }
        }
    );

    base("Add Expense", &[], &content)
}

/// The form data for recording an expense.
#[derive(Debug, Deserialize)]
pub struct AddExpenseForm {
    /// What the money was spent on.
    pub item: Option<String>,
    /// The amount of money spent, as entered.
    pub amount: Option<String>,
    /// When the money was spent, as entered.
    pub date: Option<String>,
    /// The category the expense belongs to.
    pub category: Option<String>,
}

/// Record a new expense and redirect to the listing page.
///
/// A missing item name redirects back to the form with an error message.
/// Every other field is coerced: junk amounts become zero, junk dates become
/// today and a blank category becomes the default.
pub async fn post_add_expense(
    State(state): State<AddPageState>,
    Form(form): Form<AddExpenseForm>,
) -> Result<Response, Error> {
    let item = form.item.as_deref().unwrap_or_default().trim().to_owned();

    if item.is_empty() {
        return Ok(redirect_with_error(endpoints::ADD, "Please enter an item name").into_response());
    }

    let today = timezone::today_in(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezone(state.local_timezone.clone()))?;

    let amount = parse_amount_lenient(form.amount.as_deref().unwrap_or_default());
    let date = form
        .date
        .as_deref()
        .and_then(parse_date_param)
        .unwrap_or(today);
    let category = category::normalize(form.category.as_deref().unwrap_or_default());

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    create_expense(
        NewExpense {
            item,
            amount,
            date,
            category,
        },
        &connection,
    )?;

    Ok(redirect_with_notice(endpoints::VIEW, "Expense added").into_response())
}
