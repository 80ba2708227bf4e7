//! The route URIs.
//!
//! For endpoints that take a parameter, e.g., '/edit/{expense_id}', use [format_endpoint].

/// The dashboard, showing the lifetime total and the most recent expenses.
pub const ROOT: &str = "/";
/// The page and endpoint for creating an expense.
pub const ADD: &str = "/add";
/// The filtered expense listing.
pub const VIEW: &str = "/view";
/// The page and endpoint for editing an existing expense.
pub const EDIT: &str = "/edit/{expense_id}";
/// The endpoint for deleting an expense.
pub const DELETE: &str = "/delete/{expense_id}";
/// The monthly and category summary page.
pub const SUMMARY: &str = "/summary";
/// The charts page.
pub const CHARTS: &str = "/charts";
/// The CSV download of the full expense table.
pub const EXPORT_CSV: &str = "/export_csv";
/// The page and endpoint for setting the budget.
pub const BUDGET: &str = "/budget";
/// The endpoint for deleting all expenses and recurring templates.
pub const CLEAR_ALL: &str = "/clear_all";
/// The page and endpoint for managing recurring templates.
pub const RECURRING: &str = "/recurring";
/// The endpoint for removing a recurring template.
pub const REC_REMOVE: &str = "/rec_remove/{recurring_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/edit/{expense_id}', '{expense_id}' is
/// the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
