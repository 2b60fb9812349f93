use engine::{Balance, Category, EntryDate};
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};

/// Label of the quick reply that starts category creation from the picker.
pub(crate) const NEW_CATEGORY_OPTION: &str = "/new_category";

/// Entries of the main menu keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MenuItem {
    AddIncome,
    AddExpense,
    ShowInfo,
    PeriodTotals,
}

impl MenuItem {
    pub(crate) const ALL: [MenuItem; 4] = [
        MenuItem::AddIncome,
        MenuItem::AddExpense,
        MenuItem::ShowInfo,
        MenuItem::PeriodTotals,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            MenuItem::AddIncome => "Add income",
            MenuItem::AddExpense => "Add expense",
            MenuItem::ShowInfo => "Show info",
            MenuItem::PeriodTotals => "Period totals",
        }
    }

    pub(crate) fn from_label(text: &str) -> Option<MenuItem> {
        Self::ALL.into_iter().find(|item| item.label() == text.trim())
    }
}

/// Keyboard attached to an outgoing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Keyboard {
    /// Leave whatever keyboard the client shows.
    Keep,
    Menu,
    Options(Vec<String>),
    Remove,
}

impl Keyboard {
    pub(crate) fn markup(&self) -> Option<ReplyMarkup> {
        match self {
            Keyboard::Keep => None,
            Keyboard::Menu => {
                let rows = MenuItem::ALL
                    .chunks(2)
                    .map(|row| {
                        row.iter()
                            .map(|item| KeyboardButton::new(item.label()))
                            .collect()
                    })
                    .collect::<Vec<Vec<_>>>();
                Some(KeyboardMarkup::new(rows).resize_keyboard().into())
            }
            Keyboard::Options(options) => {
                let rows = options
                    .chunks(2)
                    .map(|row| row.iter().map(KeyboardButton::new).collect())
                    .collect::<Vec<Vec<_>>>();
                Some(
                    KeyboardMarkup::new(rows)
                        .resize_keyboard()
                        .one_time_keyboard()
                        .into(),
                )
            }
            Keyboard::Remove => Some(KeyboardRemove::new().into()),
        }
    }
}

/// One outgoing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    pub(crate) fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Keep,
        }
    }

    pub(crate) fn with_menu(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Menu,
        }
    }

    pub(crate) fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }
}

pub(crate) fn category_picker(categories: &[Category]) -> Keyboard {
    let mut options: Vec<String> = categories.iter().map(|c| c.name.clone()).collect();
    options.push(NEW_CATEGORY_OPTION.to_string());
    Keyboard::Options(options)
}

pub(crate) fn render_total_balance(balance: &Balance) -> String {
    format!(
        "Total income: {}\nTotal expense: {}\nBalance: {}",
        balance.income.rounded(),
        balance.expense.rounded(),
        balance.total().rounded()
    )
}

pub(crate) fn render_period_balance(start: &EntryDate, end: &EntryDate, balance: &Balance) -> String {
    format!(
        "From {start} to {end}\nIncome: {}\nExpense: {}\nBalance: {}",
        balance.income.rounded(),
        balance.expense.rounded(),
        balance.total().rounded()
    )
}
