//! The page and endpoint for editing an existing expense.

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
    alert::{NoticeParams, redirect_with_notice},
    category, endpoints,
    html::base,
    money::parse_amount_lenient,
    navigation::NavBar,
    timezone,
};

use super::{
    add::category_options,
    core::{Expense, get_expense, update_expense},
    query::{format_date, parse_date_param},
};

/// The state needed for the edit expense page.
#[derive(Debug, Clone)]
pub struct EditPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// A canonical timezone string used to resolve today's date.
    pub local_timezone: String,
}

impl FromRef<AppState> for EditPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the form for editing the expense with `expense_id`.
///
/// Responds with the 404 page if the expense does not exist.
pub async fn get_edit_page(
    State(state): State<EditPageState>,
    Path(expense_id): Path<i64>,
    Query(notice): Query<NoticeParams>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, &connection)?;
    let categories = category_options(&connection)?;

    Ok(render_edit_page(&expense, &categories, notice).into_response())
}

fn render_edit_page(expense: &Expense, categories: &[String], notice: NoticeParams) -> Markup {
    let form_action = endpoints::format_endpoint(endpoints::EDIT, expense.id);
    let has_custom_category = !categories.contains(&expense.category);

    let content = html!(
        (NavBar::new(endpoints::VIEW).into_html())

        main class="container"
        {
            div class="card"
            {
                h2 { "Edit Expense" }

                (notice.into_html())

                form class="stacked" method="post" action=(form_action)
                {
                    label for="item" { "Item" }
                    input type="text" id="item" name="item" value=(expense.item);

                    label for="amount" { "Amount" }
                    input
                        type="number"
                        step="0.01"
                        min="0"
                        id="amount"
                        name="amount"
                        value=(expense.amount);

                    label for="date" { "Date" }
                    input type="date" id="date" name="date" value=(format_date(expense.date));

                    label for="category" { "Category" }
                    select id="category" name="category"
                    {
                        @for category in categories {
                            option
                                value=(category)
                                selected[*category == expense.category]
                            {
                                (category)
                            }
                        }

                        @if has_custom_category {
                            option value=(expense.category) selected { (expense.category) }
                        }
                    }

                    button class="btn" type="submit" { "Save Changes" }
                }

                a href=(endpoints::VIEW) class="nav-btn" { "Back to expenses" }
            }
        }
    );

    base("Edit Expense", &[], &content)
}

/// The form data for editing an expense.
#[derive(Debug, Deserialize)]
pub struct EditExpenseForm {
    /// What the money was spent on.
    pub item: Option<String>,
    /// The amount of money spent, as entered.
    pub amount: Option<String>,
    /// When the money was spent, as entered.
    pub date: Option<String>,
    /// The category the expense belongs to.
    pub category: Option<String>,
}

/// Overwrite the expense with `expense_id` and redirect to the listing page.
///
/// Responds with the 404 page if the expense does not exist. Fields are
/// coerced the same way as when adding an expense, except that a blank item
/// name keeps the existing one.
pub async fn post_edit_expense(
    State(state): State<EditPageState>,
    Path(expense_id): Path<i64>,
    Form(form): Form<EditExpenseForm>,
) -> Result<Response, Error> {
    let today = timezone::today_in(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezone(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let existing = get_expense(expense_id, &connection)?;

    let item = match form.item.as_deref().map(str::trim) {
        Some(item) if !item.is_empty() => item.to_owned(),
        _ => existing.item,
    };

    let updated = Expense {
        id: expense_id,
        item,
        amount: parse_amount_lenient(form.amount.as_deref().unwrap_or_default()),
        date: form
            .date
            .as_deref()
            .and_then(parse_date_param)
            .unwrap_or(today),
        category: category::normalize(form.category.as_deref().unwrap_or_default()),
    };

    update_expense(&updated, &connection)?;

    Ok(redirect_with_notice(endpoints::VIEW, "Updated").into_response())
}
