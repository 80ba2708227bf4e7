//! Application router configuration.

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
    routing::get,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::redirect_with_notice,
    budget::{get_budget_page, post_budget},
    charts::get_charts_page,
    dashboard::get_dashboard_page,
    endpoints,
    expense::{
        delete_all_expenses, get_add_page, get_delete_expense, get_edit_page, get_export_csv,
        get_view_page, post_add_expense, post_edit_expense,
    },
    not_found::get_404_not_found,
    recurring::{
        delete_all_recurring, get_recurring_page, get_remove_recurring, post_recurring,
    },
    summary::get_summary_page,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_dashboard_page))
        .route(endpoints::ADD, get(get_add_page).post(post_add_expense))
        .route(endpoints::VIEW, get(get_view_page))
        .route(endpoints::EDIT, get(get_edit_page).post(post_edit_expense))
        .route(endpoints::DELETE, get(get_delete_expense))
        .route(endpoints::SUMMARY, get(get_summary_page))
        .route(endpoints::CHARTS, get(get_charts_page))
        .route(endpoints::EXPORT_CSV, get(get_export_csv))
        .route(endpoints::BUDGET, get(get_budget_page).post(post_budget))
        .route(endpoints::CLEAR_ALL, get(get_clear_all))
        .route(
            endpoints::RECURRING,
            get(get_recurring_page).post(post_recurring),
        )
        .route(endpoints::REC_REMOVE, get(get_remove_recurring))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The state needed for the clear all endpoint.
#[derive(Debug, Clone)]
struct ClearAllState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ClearAllState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete every expense and recurring template, then redirect to the
/// dashboard.
///
/// The stored budget is kept.
async fn get_clear_all(State(state): State<ClearAllState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_all_expenses(&connection)?;
    delete_all_recurring(&connection)?;

    tracing::info!("cleared all expenses and recurring templates");

    Ok(redirect_with_notice(endpoints::ROOT, "All data cleared").into_response())
}

#[cfg(test)]
mod router_tests {
    use std::sync::{Arc, Mutex};

    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        AppState, endpoints,
        expense::{NewExpense, create_expense},
        recurring::{Frequency, NewRecurringTemplate, create_recurring, get_all_recurring},
        routing::build_router,
    };

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("could not open database");
        let state = AppState::new(connection, "Etc/UTC")
            .expect("could not create app state");

        TestServer::new(build_router(state))
    }

    fn get_test_server_with_state() -> (TestServer, AppState) {
        let connection = Connection::open_in_memory().expect("could not open database");
        let state = AppState::new(connection, "Etc/UTC")
            .expect("could not create app state");

        let server = TestServer::new(build_router(state.clone()));

        (server, state)
    }

    #[tokio::test]
    async fn page_routes_return_ok() {
        let server = get_test_server();

        for endpoint in [
            endpoints::ROOT,
            endpoints::ADD,
            endpoints::VIEW,
            endpoints::SUMMARY,
            endpoints::CHARTS,
            endpoints::BUDGET,
            endpoints::RECURRING,
        ] {
            let response = server.get(endpoint).await;

            response.assert_status_ok();
        }
    }

    #[tokio::test]
    async fn unknown_route_returns_not_found_page() {
        let server = get_test_server();

        let response = server.get("/no/such/page").await;

        response.assert_status_not_found();
        assert!(response.text().contains("404"));
    }

    #[tokio::test]
    async fn add_expense_end_to_end() {
        let (server, _) = get_test_server_with_state();

        let response = server
            .post(endpoints::ADD)
            .form(&[
                ("item", "Coffee"),
                ("amount", "4.50"),
                ("date", "2025-10-05"),
                ("category", "Food"),
            ])
            .await;

        response.assert_status_see_other();

        let listing = server.get(endpoints::VIEW).await;
        listing.assert_status_ok();

        let document = Html::parse_document(&listing.text());
        let cell_selector = Selector::parse("td").unwrap();
        let cells: Vec<String> = document
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>())
            .collect();

        assert!(cells.iter().any(|cell| cell == "Coffee"));
        assert!(cells.iter().any(|cell| cell == "$4.50"));
    }

    #[tokio::test]
    async fn notice_banner_is_rendered_after_redirect() {
        let server = get_test_server();

        let response = server
            .get(endpoints::VIEW)
            .add_query_param("notice", "Expense added")
            .await;

        let document = Html::parse_document(&response.text());
        let alert_selector = Selector::parse(".alert.success").unwrap();
        let alert = document
            .select(&alert_selector)
            .next()
            .expect("the notice banner should be rendered");

        assert_eq!(alert.text().collect::<String>(), "Expense added");
    }

    #[tokio::test]
    async fn clear_all_removes_expenses_and_templates() {
        let (server, state) = get_test_server_with_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_expense(
                NewExpense {
                    item: "Coffee".to_owned(),
                    amount: 4.5,
                    date: date!(2025 - 10 - 05),
                    category: "Food".to_owned(),
                },
                &connection,
            )
            .unwrap();
            create_recurring(
                NewRecurringTemplate {
                    item: "Rent".to_owned(),
                    amount: 1200.0,
                    start_date: date!(2025 - 01 - 15),
                    frequency: Frequency::Monthly,
                    category: "Bills".to_owned(),
                },
                &connection,
            )
            .unwrap();
        }

        let response = server.get(endpoints::CLEAR_ALL).await;
        response.assert_status_see_other();

        let connection = state.db_connection.lock().unwrap();
        let expense_count: i64 = connection
            .query_row("SELECT COUNT(1) FROM expense", [], |row| row.get(0))
            .unwrap();
        assert_eq!(expense_count, 0);
        assert!(get_all_recurring(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn export_csv_downloads_attachment() {
        let server = get_test_server();

        let response = server.get(endpoints::EXPORT_CSV).await;

        response.assert_status_ok();
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"expenses.csv\""
        );
    }
}
