//! Shared maud templates and display formatting.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

/// The stylesheet inlined into every page.
const BASE_STYLES: &str = r#"
:root { --accent: #6C5CE7; --accent-2: #00B894; --muted: #718096; }
* { box-sizing: border-box; }
body {
    font-family: system-ui, sans-serif; margin: 0; color: #222;
    background: linear-gradient(135deg, #f6f8ff, #eaf6f1);
}
header.site {
    background: linear-gradient(90deg, var(--accent), var(--accent-2));
    color: #fff; padding: 18px 0;
}
.wrap { max-width: 1100px; margin: 0 auto; padding: 0 20px; }
main.container { max-width: 1100px; margin: 20px auto 40px; padding: 0 20px; }
nav.site { margin-top: 12px; display: flex; gap: 8px; flex-wrap: wrap; }
.nav-btn {
    background: #ffffffcc; padding: 8px 12px; border-radius: 10px; color: #111;
    text-decoration: none; font-weight: 600;
}
.nav-btn.current { outline: 2px solid #fff; }
.card {
    background: #ffffffcc; padding: 18px; border-radius: 12px;
    box-shadow: 0 10px 30px rgba(2, 6, 23, 0.06); margin-bottom: 18px;
}
.stats { display: flex; gap: 12px; flex-wrap: wrap; margin-top: 14px; }
.stat {
    background: #fff; padding: 12px; border-radius: 10px; min-width: 140px;
    box-shadow: 0 6px 18px rgba(0, 0, 0, 0.04);
}
.stat .value { font-weight: 800; }
table { width: 100%; border-collapse: collapse; margin-top: 14px; }
th, td { padding: 10px; text-align: left; border-bottom: 1px solid #f1f3f6; }
th { background: #fafafa; }
form.stacked label, form.inline label { display: block; font-size: 0.9rem; color: var(--muted); }
form input, form select {
    width: 100%; padding: 9px; border-radius: 8px; border: 1px solid #e6e9ef; margin: 6px 0 12px;
}
form.inline { display: flex; gap: 8px; flex-wrap: wrap; align-items: flex-end; }
form.inline input, form.inline select { width: auto; margin: 6px 0; }
button.btn {
    background: var(--accent); color: #fff; padding: 10px 14px; border-radius: 10px;
    border: 0; font-weight: 700; cursor: pointer;
}
.muted { color: var(--muted); font-size: 0.95rem; }
.small { font-size: 0.9rem; color: var(--muted); }
.danger { color: #e74c3c; font-weight: 700; }
.alert { padding: 12px 16px; border-radius: 10px; margin-bottom: 14px; }
.alert.success { background: #e6f9f0; color: #0b6e4f; }
.alert.error { background: #fdecea; color: #b71c1c; }
.chart-panel { min-height: 360px; }
footer.site { text-align: center; padding: 18px; color: #6b7280; }
"#;

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

/// The base page layout. Page content (including the navigation bar) goes in
/// `content`; extra scripts for the head go in `head_elements`.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Spendlog" }

                style { (PreEscaped(BASE_STYLES)) }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body
            {
                (content)

                footer class="site" { "Spendlog — smart, simple spending records" }
            }
        }
    }
}

/// A full-page error view used for 404 and 500 responses.
pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        main class="container"
        {
            div class="card" style="text-align:center"
            {
                h1 style="font-size:3.5rem;color:var(--accent);margin-bottom:0" { (header) }

                p style="font-size:1.4rem;font-weight:700" { (description) }

                p class="muted" { (fix) }

                a href="/" class="nav-btn" { "Back to the dashboard" }
            }
        }
    );

    base(title, &[], &content)
}

pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

#[cfg(test)]
mod format_currency_tests {
    use super::format_currency;

    #[test]
    fn formats_two_decimal_places() {
        assert_eq!(format_currency(4.5), "$4.50");
        assert_eq!(format_currency(12.34), "$12.34");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn formats_thousands() {
        assert_eq!(format_currency(1000.0), "$1,000.00");
    }
}
