//! Defines the template and helper for the page to display for an internal server error.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Render the 500 error page with the given `description` and suggested `fix`.
pub fn render_internal_server_error(description: &str, fix: &str) -> Response {
    let page = error_view("Internal Server Error", "500", description, fix);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(page.into_string()),
    )
        .into_response()
}

#[cfg(test)]
mod internal_server_error_tests {
    use axum::http::StatusCode;

    use super::render_internal_server_error;

    #[test]
    fn returns_internal_server_error_status() {
        let response = render_internal_server_error(
            "Sorry, something went wrong.",
            "Try again later or check the server logs.",
        );

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
