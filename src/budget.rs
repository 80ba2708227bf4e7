//! The budget page: set a spending budget and compare it to the lifetime total.

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
    alert::{NoticeParams, redirect_with_notice},
    endpoints,
    expense::total_spent,
    html::{base, format_currency},
    money::{parse_amount_lenient, round2},
    navigation::NavBar,
};

/// How current spending compares to the stored budget.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    /// The stored budget, if any.
    pub budget: Option<f64>,
    /// The lifetime spending total.
    pub total: f64,
    /// How far over budget spending is, if it is over.
    pub overspend: Option<f64>,
    /// Spending as a percentage of the budget.
    pub progress_percent: Option<f64>,
}

impl BudgetStatus {
    /// Compare `total` spending against `budget`.
    pub fn new(budget: Option<f64>, total: f64) -> Self {
        let total = round2(total);

        let overspend = budget
            .filter(|budget| total > *budget)
            .map(|budget| round2(total - budget));

        let progress_percent = budget
            .filter(|budget| *budget > 0.0)
            .map(|budget| round2(total / budget * 100.0));

        Self {
            budget,
            total,
            overspend,
            progress_percent,
        }
    }

    /// Load the stored budget and the lifetime total from the database.
    pub fn fetch(connection: &Connection) -> Result<Self, Error> {
        let budget = crate::settings::get_budget(connection)?;
        let total = total_spent(connection)?;

        Ok(Self::new(budget, total))
    }

    /// The status lines shown on the budget and charts pages.
    pub fn into_html(self) -> Markup {
        html!(
            @match self.budget {
                Some(budget) => {
                    p {
                        "Budget: " strong { (format_currency(budget)) }
                        " · Spent: " strong { (format_currency(self.total)) }
                    }

                    @if let Some(overspend) = self.overspend {
                        p class="danger" { "Over budget by " (format_currency(overspend)) "!" }
                    } @else {
                        p { "You are within budget." }
                    }

                    @if let Some(progress_percent) = self.progress_percent {
                        p class="muted" { "Progress: " (progress_percent) "% of budget used" }
                    }
                }
                None => { p class="muted" { "No budget set yet." } }
            }
        )
    }
}

/// The state needed for the budget page.
#[derive(Debug, Clone)]
pub struct BudgetPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the budget page.
pub async fn get_budget_page(
    State(state): State<BudgetPageState>,
    Query(notice): Query<NoticeParams>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let status = BudgetStatus::fetch(&connection)?;

    Ok(render_budget_page(status, notice).into_response())
}

fn render_budget_page(status: BudgetStatus, notice: NoticeParams) -> Markup {
    let budget_field_value = status.budget.map(|budget| budget.to_string());

    let content = html!(
        (NavBar::new(endpoints::BUDGET).into_html())

        main class="container"
        {
            div class="card"
            {
                h2 { "Budget" }

                (notice.into_html())

                (status.into_html())

                form class="inline" method="post" action=(endpoints::BUDGET)
                {
                    div
                    {
                        label for="budget" { "Budget amount" }
                        input
                            type="number"
                            step="0.01"
                            min="0"
                            id="budget"
                            name="budget"
                            value=[budget_field_value];
                    }

                    button class="btn" type="submit" { "Save Budget" }
                }

                p class="small"
                {
                    "The budget is compared against your total recorded spending."
                }
            }
        }
    );

    base("Budget", &[], &content)
}

/// The form data for setting the budget.
#[derive(Debug, Deserialize)]
pub struct BudgetForm {
    /// The budget amount as entered by the user.
    pub budget: Option<String>,
}

/// Store the submitted budget and redirect to the charts page, where the
/// updated budget status is shown.
pub async fn post_budget(
    State(state): State<BudgetPageState>,
    Form(form): Form<BudgetForm>,
) -> Result<Response, Error> {
    let budget = parse_amount_lenient(form.budget.as_deref().unwrap_or_default());

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    crate::settings::set_budget(budget, &connection)?;

    Ok(redirect_with_notice(endpoints::CHARTS, "Budget saved").into_response())
}
