//! Recording, browsing, editing and exporting expenses.

mod add;
mod core;
mod delete;
mod edit;
mod export;
mod list;
mod query;

pub use add::{AddPageState, category_options, get_add_page, post_add_expense};
pub use core::{
    Expense, NewExpense, create_expense, create_expense_table, delete_all_expenses, delete_expense,
    distinct_categories, get_expense, recent_expenses, total_spent, update_expense,
};
pub use delete::{DeleteExpenseState, get_delete_expense};
pub use edit::{EditPageState, get_edit_page, post_edit_expense};
pub use export::{ExportCsvState, get_export_csv};
pub use list::{ViewPageState, get_view_page};
pub use query::{
    ExpenseFilter, ExpenseStats, SortKey, format_date, parse_date_param, query_expenses,
};
