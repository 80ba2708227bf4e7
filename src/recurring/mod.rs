//! Recurring monthly charges and their materialization into expenses.

mod core;
mod expansion;
mod page;
mod schedule;

pub use core::{
    Frequency, NewRecurringTemplate, RecurringTemplate, create_recurring, create_recurring_table,
    delete_all_recurring, delete_recurring, get_all_recurring, set_last_applied,
};
pub use expansion::{apply_recurring, catch_up_recurring};
pub use page::{
    RecurringPageState, get_recurring_page, get_remove_recurring, post_recurring,
};
pub use schedule::add_one_month;
