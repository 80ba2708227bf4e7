//! Filtering, sorting and statistics for the expense listing.

use rusqlite::{Connection, ToSql, params_from_iter};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

use super::core::{Expense, map_expense_row};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` query parameter, ignoring anything unparseable.
pub fn parse_date_param(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), DATE_FORMAT).ok()
}

/// Format a date as `YYYY-MM-DD` for display and form fields.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// The sort orders accepted by the expense listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first. The default.
    #[default]
    DateDesc,
    /// Oldest first.
    DateAsc,
    /// Largest amount first.
    AmountDesc,
    /// Smallest amount first.
    AmountAsc,
}

impl SortKey {
    /// Parse a `sort` query parameter, falling back to the default for
    /// unrecognised values.
    pub fn from_query_value(raw: &str) -> Self {
        match raw {
            "date_asc" => SortKey::DateAsc,
            "amt_desc" => SortKey::AmountDesc,
            "amt_asc" => SortKey::AmountAsc,
            _ => SortKey::DateDesc,
        }
    }

    /// The value used in the `sort` query parameter and the sort drop-down.
    pub fn as_query_value(self) -> &'static str {
        match self {
            SortKey::DateDesc => "date_desc",
            SortKey::DateAsc => "date_asc",
            SortKey::AmountDesc => "amt_desc",
            SortKey::AmountAsc => "amt_asc",
        }
    }

    fn order_by_clause(self) -> &'static str {
        match self {
            SortKey::DateDesc => "date DESC, id DESC",
            SortKey::DateAsc => "date ASC, id ASC",
            SortKey::AmountDesc => "amount DESC, id DESC",
            SortKey::AmountAsc => "amount ASC, id ASC",
        }
    }
}

/// The filters applied to the expense listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// Case-insensitive substring match on the item name.
    pub query: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Earliest date to include.
    pub from: Option<Date>,
    /// Latest date to include.
    pub to: Option<Date>,
    /// The sort order.
    pub sort: SortKey,
}

/// The expenses matching `filter`, in the filter's sort order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn query_expenses(filter: &ExpenseFilter, connection: &Connection) -> Result<Vec<Expense>, Error> {
    let mut sql = "SELECT id, item, amount, date, category FROM expense WHERE 1=1".to_owned();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(query) = &filter.query {
        sql.push_str(&format!(" AND item LIKE ?{}", params.len() + 1));
        params.push(Box::new(format!("%{query}%")));
    }

    if let Some(category) = &filter.category {
        sql.push_str(&format!(" AND category = ?{}", params.len() + 1));
        params.push(Box::new(category.clone()));
    }

    if let Some(from) = filter.from {
        sql.push_str(&format!(" AND date >= ?{}", params.len() + 1));
        params.push(Box::new(from));
    }

    if let Some(to) = filter.to {
        sql.push_str(&format!(" AND date <= ?{}", params.len() + 1));
        params.push(Box::new(to));
    }

    sql.push_str(" ORDER BY ");
    sql.push_str(filter.sort.order_by_clause());

    let expenses = connection
        .prepare(&sql)?
        .query_map(
            params_from_iter(params.iter().map(|param| param.as_ref())),
            map_expense_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(expenses)
}

/// Summary statistics over a set of expenses.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseStats {
    /// The sum of the amounts.
    pub total: f64,
    /// The largest single amount.
    pub highest: f64,
    /// The smallest single amount.
    pub lowest: f64,
    /// The mean amount.
    pub average: f64,
}

impl ExpenseStats {
    /// Compute statistics over `expenses`. All fields are zero for an empty
    /// slice.
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        if expenses.is_empty() {
            return Self::default();
        }

        let total: f64 = expenses.iter().map(|expense| expense.amount).sum();
        let highest = expenses
            .iter()
            .map(|expense| expense.amount)
            .fold(f64::MIN, f64::max);
        let lowest = expenses
            .iter()
            .map(|expense| expense.amount)
            .fold(f64::MAX, f64::min);
        let average = total / expenses.len() as f64;

        Self {
            total,
            highest,
            lowest,
            average,
        }
    }
}

#[cfg(test)]
mod query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        expense::{NewExpense, create_expense},
    };

    use super::{ExpenseFilter, ExpenseStats, SortKey, parse_date_param, query_expenses};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        for (item, amount, date, category) in [
            ("Coffee", 4.5, date!(2025 - 10 - 01), "Food"),
            ("Train ticket", 12.0, date!(2025 - 10 - 02), "Travel"),
            ("Groceries", 60.25, date!(2025 - 10 - 03), "Food"),
            ("Cinema", 18.0, date!(2025 - 09 - 20), "Entertainment"),
        ] {
            create_expense(
                NewExpense {
                    item: item.to_owned(),
                    amount,
                    date,
                    category: category.to_owned(),
                },
                &conn,
            )
            .unwrap();
        }

        conn
    }

    #[test]
    fn no_filter_returns_everything_newest_first() {
        let conn = get_test_connection();

        let expenses = query_expenses(&ExpenseFilter::default(), &conn).unwrap();

        assert_eq!(expenses.len(), 4);
        assert_eq!(expenses[0].item, "Groceries");
        assert_eq!(expenses[3].item, "Cinema");
    }

    #[test]
    fn category_filter_returns_only_matching() {
        let conn = get_test_connection();
        let filter = ExpenseFilter {
            category: Some("Food".to_owned()),
            ..Default::default()
        };

        let expenses = query_expenses(&filter, &conn).unwrap();

        assert_eq!(expenses.len(), 2);
        assert!(expenses.iter().all(|expense| expense.category == "Food"));
    }

    #[test]
    fn item_search_is_substring_match() {
        let conn = get_test_connection();
        let filter = ExpenseFilter {
            query: Some("ticket".to_owned()),
            ..Default::default()
        };

        let expenses = query_expenses(&filter, &conn).unwrap();

        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].item, "Train ticket");
    }

    #[test]
    fn date_range_is_inclusive() {
        let conn = get_test_connection();
        let filter = ExpenseFilter {
            from: Some(date!(2025 - 10 - 01)),
            to: Some(date!(2025 - 10 - 02)),
            ..Default::default()
        };

        let expenses = query_expenses(&filter, &conn).unwrap();

        assert_eq!(expenses.len(), 2);
    }

    #[test]
    fn amount_ascending_is_non_decreasing() {
        let conn = get_test_connection();
        let filter = ExpenseFilter {
            sort: SortKey::AmountAsc,
            ..Default::default()
        };

        let expenses = query_expenses(&filter, &conn).unwrap();

        let amounts: Vec<f64> = expenses.iter().map(|expense| expense.amount).collect();
        assert!(amounts.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn stats_over_expenses() {
        let conn = get_test_connection();
        let expenses = query_expenses(&ExpenseFilter::default(), &conn).unwrap();

        let stats = ExpenseStats::from_expenses(&expenses);

        assert_eq!(stats.total, 94.75);
        assert_eq!(stats.highest, 60.25);
        assert_eq!(stats.lowest, 4.5);
        assert_eq!(stats.average, 94.75 / 4.0);
    }

    #[test]
    fn stats_over_nothing_are_zero() {
        let stats = ExpenseStats::from_expenses(&[]);

        assert_eq!(stats, ExpenseStats::default());
    }

    #[test]
    fn sort_key_round_trips_through_query_value() {
        for key in [
            SortKey::DateDesc,
            SortKey::DateAsc,
            SortKey::AmountDesc,
            SortKey::AmountAsc,
        ] {
            assert_eq!(SortKey::from_query_value(key.as_query_value()), key);
        }
    }

    #[test]
    fn unknown_sort_value_falls_back_to_default() {
        assert_eq!(SortKey::from_query_value("sideways"), SortKey::DateDesc);
    }

    #[test]
    fn date_param_parsing() {
        assert_eq!(parse_date_param("2025-10-01"), Some(date!(2025 - 10 - 01)));
        assert_eq!(parse_date_param(" 2025-10-01 "), Some(date!(2025 - 10 - 01)));
        assert_eq!(parse_date_param("01/10/2025"), None);
        assert_eq!(parse_date_param(""), None);
    }
}
