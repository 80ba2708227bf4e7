//! Chart generation and rendering for the charts page.
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a corresponding HTML container and JavaScript initialization
//! code.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisType, ItemStyle, JsFunction, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::NoticeParams,
    budget::BudgetStatus,
    endpoints,
    html::{HeadElement, base},
    navigation::NavBar,
    recurring::catch_up_recurring,
    summary::{category_totals, monthly_totals},
};

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A chart with its HTML container ID and ECharts configuration.
struct ChartPanel {
    /// The HTML element ID to use for the chart (kebab-case)
    id: &'static str,
    /// The ECharts configuration as a JSON string
    options: String,
}

/// The state needed for the charts page.
#[derive(Debug, Clone)]
pub struct ChartsPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// A canonical timezone string used to resolve today's date.
    pub local_timezone: String,
}

impl FromRef<AppState> for ChartsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the spending charts.
///
/// Any due recurring charges are materialized first so the charts include
/// them.
pub async fn get_charts_page(
    State(state): State<ChartsPageState>,
    Query(notice): Query<NoticeParams>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    catch_up_recurring(&state.local_timezone, &connection)?;

    let by_category = category_totals(&connection)?;
    let monthly = monthly_totals(&connection)?;
    let budget_status = BudgetStatus::fetch(&connection)?;

    let charts = vec![
        ChartPanel {
            id: "category-pie-chart",
            options: category_pie_chart(&by_category).to_string(),
        },
        ChartPanel {
            id: "monthly-bar-chart",
            options: monthly_bar_chart(&monthly).to_string(),
        },
    ];

    Ok(render_charts_page(&charts, budget_status, notice).into_response())
}

fn render_charts_page(
    charts: &[ChartPanel],
    budget_status: BudgetStatus,
    notice: NoticeParams,
) -> Markup {
    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_CDN.to_owned()),
        charts_script(charts),
    ];

    let content = html!(
        (NavBar::new(endpoints::CHARTS).into_html())

        main class="container"
        {
            (notice.into_html())

            div class="card"
            {
                h2 { "Charts" }

                (budget_status.into_html())
            }

            (charts_view(charts))
        }
    );

    base("Charts", &head_elements, &content)
}

/// Renders the HTML containers for the charts.
fn charts_view(charts: &[ChartPanel]) -> Markup {
    html!(
        section id="charts"
        {
            @for chart in charts {
                div class="card chart-panel" id=(chart.id) {}
            }
        }
    )
}

/// Generates JavaScript initialization code for the charts.
///
/// Creates a script that initializes ECharts instances with responsive
/// resizing once the page has loaded.
fn charts_script(charts: &[ChartPanel]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn category_pie_chart(category_totals: &[(String, f64)]) -> Chart {
    let data: Vec<(f64, &str)> = category_totals
        .iter()
        .map(|(category, total)| (*total, category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Spending by Category"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["0%", "65%"])
                .item_style(ItemStyle::new().border_radius(4))
                .data(data),
        )
}

fn monthly_bar_chart(monthly_totals: &[(String, f64)]) -> Chart {
    let labels: Vec<String> = monthly_totals.iter().map(|(month, _)| month.clone()).collect();
    let values: Vec<f64> = monthly_totals.iter().map(|(_, total)| *total).collect();

    Chart::new()
        .title(Title::new().text("Monthly Spending"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Total").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

#[cfg(test)]
mod charts_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        alert::NoticeParams,
        db::initialize,
        expense::{NewExpense, create_expense},
    };

    use super::{ChartsPageState, category_pie_chart, get_charts_page, monthly_bar_chart};

    #[test]
    fn chart_options_are_valid_json() {
        let category_totals = vec![("Food".to_owned(), 64.5), ("Travel".to_owned(), 12.0)];
        let monthly_totals = vec![("2025-09".to_owned(), 4.5), ("2025-10".to_owned(), 72.0)];

        for options in [
            category_pie_chart(&category_totals).to_string(),
            monthly_bar_chart(&monthly_totals).to_string(),
        ] {
            serde_json::from_str::<serde_json::Value>(&options)
                .expect("chart options should be valid JSON");
        }
    }

    #[tokio::test]
    async fn get_returns_ok() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
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

        let state = ChartsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_charts_page(State(state), Query(NoticeParams::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
