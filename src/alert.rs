//! One-shot notice and error banners carried across redirects.
//!
//! Handlers that mutate data redirect back to a page with a `notice` or
//! `error` query parameter. The target page deserializes [NoticeParams] and
//! renders the matching banner.

use axum::{http::Uri, response::Redirect};
use maud::{Markup, html};
use serde::Deserialize;

/// The `notice` and `error` query parameters shared by every page.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeParams {
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl NoticeParams {
    /// Render the banner for whichever parameter is set, or nothing.
    pub fn into_html(self) -> Markup {
        html!(
            @if let Some(message) = self.notice {
                div class="alert success" { (message) }
            }

            @if let Some(message) = self.error {
                div class="alert error" { (message) }
            }
        )
    }
}

/// Redirect to `endpoint` with a success notice attached.
pub fn redirect_with_notice(endpoint: &str, message: &str) -> Redirect {
    redirect_with_param(endpoint, "notice", message)
}

/// Redirect to `endpoint` with an error message attached.
pub fn redirect_with_error(endpoint: &str, message: &str) -> Redirect {
    redirect_with_param(endpoint, "error", message)
}

fn redirect_with_param(endpoint: &str, param: &str, message: &str) -> Redirect {
    let encoded_message: String = message
        .chars()
        .map(|c| match c {
            ' ' => '+',
            other => other,
        })
        .collect();

    let uri = format!("{endpoint}?{param}={encoded_message}");

    debug_assert!(uri.parse::<Uri>().is_ok());

    Redirect::to(&uri)
}
