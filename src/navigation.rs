//! This file defines the templates and a convenience function for creating the navigation bar.

use maud::{Markup, html};

use crate::endpoints;

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let class = if self.is_current {
            "nav-btn current"
        } else {
            "nav-btn"
        };

        html!( a href=(self.url) class=(class) { (self.title) } )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let make_link = |url, title| Link {
            url,
            title,
            is_current: active_endpoint == url,
        };

        let links = vec![
            make_link(endpoints::ROOT, "Home"),
            make_link(endpoints::ADD, "Add Expense"),
            make_link(endpoints::VIEW, "View Expenses"),
            make_link(endpoints::SUMMARY, "Summary"),
            make_link(endpoints::CHARTS, "Charts"),
            make_link(endpoints::EXPORT_CSV, "Export CSV"),
            make_link(endpoints::BUDGET, "Budget"),
            make_link(endpoints::RECURRING, "Recurring"),
            make_link(endpoints::CLEAR_ALL, "Clear All"),
        ];

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html!(
            header class="site"
            {
                div class="wrap"
                {
                    h1 style="margin:0" { "💸 Spendlog" }

                    p style="margin:4px 0 0;opacity:0.9" { "Smart, simple spending records" }

                    nav class="site"
                    {
                        @for link in self.links.into_iter() {
                            (link.into_html())
                        }
                    }
                }
            }
        )
    }
}
