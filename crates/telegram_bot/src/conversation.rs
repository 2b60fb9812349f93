//! Conversation flow.
//!
//! Every inbound text is routed, in order, to: a slash command, a main menu
//! label (unless the pending step takes free text, such as a description), the
//! step the chat's [`DialogState`] is waiting for, or a hint. The
//! result is a [`Transition`]: the replies to send and the state that replaces
//! the current one. Nothing here talks to Telegram, so flows are tested against
//! an in-memory database.

use engine::{Category, DatePolicy, Engine, EngineError, EntryDate, Money, User};

use crate::{
    commands::{Command, help_text, parse_command},
    state::DialogState,
    ui::{self, Keyboard, MenuItem, Reply},
};

const TRY_LATER: &str = "Something went wrong, please try again later.";
const NOT_REGISTERED: &str = "You are not registered yet. Send /start first.";
const INVALID_AMOUNT: &str = "The amount must be a positive number, e.g. 1500 or 12.50. Try again.";
const INVALID_DATE: &str = "The date must be in YYYY-MM-DD format. Try again.";

/// Who sent the message.
#[derive(Clone, Debug)]
pub(crate) struct Sender {
    /// Chat identifier, the natural key of a user.
    pub chat_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Transition {
    pub replies: Vec<Reply>,
    pub next: DialogState,
}

impl Transition {
    fn stay(reply: Reply, next: DialogState) -> Self {
        Self {
            replies: vec![reply],
            next,
        }
    }

    fn idle(reply: Reply) -> Self {
        Self::stay(reply, DialogState::Idle)
    }
}

type StepResult = Result<Transition, EngineError>;

#[derive(Clone, Debug)]
pub(crate) struct Conversation {
    engine: Engine,
    dates: DatePolicy,
}

impl Conversation {
    pub(crate) fn new(engine: Engine, dates: DatePolicy) -> Self {
        Self { engine, dates }
    }

    /// Handles one inbound text message.
    ///
    /// Never fails: storage errors are logged and turned into an apology, and
    /// the chat goes back to idle.
    pub(crate) async fn handle(&self, sender: &Sender, state: DialogState, text: &str) -> Transition {
        let menu_item = if state.takes_free_text() {
            None
        } else {
            MenuItem::from_label(text)
        };

        let result = if let Some(cmd) = parse_command(text) {
            self.command(sender, &state, cmd).await
        } else if let Some(item) = menu_item {
            self.menu(sender, item).await
        } else {
            self.step(sender, state, text).await
        };

        match result {
            Ok(transition) => transition,
            Err(err) => {
                tracing::error!(chat_id = sender.chat_id, "conversation step failed: {err}");
                Transition::idle(Reply::with_menu(TRY_LATER))
            }
        }
    }

    async fn command(&self, sender: &Sender, state: &DialogState, cmd: Command) -> StepResult {
        match cmd {
            Command::Start => {
                let registration = self.register(sender).await?;
                let text = if registration.is_new() {
                    "Hi! I will help you keep track of your finances. \
                     Send /menu to see all available commands."
                } else {
                    "You are already registered. \
                     Use \"Show info\" to see your balance or /menu to see all available commands."
                };
                Ok(Transition::idle(Reply::with_menu(text)))
            }
            Command::Menu => {
                self.register(sender).await?;
                Ok(Transition::idle(Reply::with_menu("Choose a command.")))
            }
            Command::NewCategory => {
                let continue_expense = matches!(state, DialogState::ExpenseCategory);
                Ok(Transition::stay(
                    Reply::with_keyboard("Enter the name of the new category.", Keyboard::Remove),
                    DialogState::NewCategoryName { continue_expense },
                ))
            }
            Command::Help => Ok(Transition::idle(Reply::with_menu(help_text()))),
        }
    }

    async fn menu(&self, sender: &Sender, item: MenuItem) -> StepResult {
        match item {
            MenuItem::AddIncome => Ok(Transition::stay(
                Reply::with_keyboard("Enter the income amount.", Keyboard::Remove),
                DialogState::IncomeAmount,
            )),
            MenuItem::AddExpense => {
                let categories = self.engine.list_categories().await?;
                Ok(Transition::stay(
                    Reply::with_keyboard(
                        "Choose an expense category or add a new one.",
                        ui::category_picker(&categories),
                    ),
                    DialogState::ExpenseCategory,
                ))
            }
            MenuItem::ShowInfo => {
                let Some(user) = self.current_user(sender).await? else {
                    return Ok(Transition::idle(Reply::with_menu(NOT_REGISTERED)));
                };
                let balance = self.engine.total_balance(user.id).await?;
                Ok(Transition::idle(Reply::with_menu(ui::render_total_balance(
                    &balance,
                ))))
            }
            MenuItem::PeriodTotals => Ok(Transition::stay(
                Reply::with_keyboard(
                    "Enter the start date in YYYY-MM-DD format.",
                    Keyboard::Remove,
                ),
                DialogState::PeriodStart,
            )),
        }
    }

    async fn step(&self, sender: &Sender, state: DialogState, text: &str) -> StepResult {
        match state {
            DialogState::Idle => Ok(Transition::idle(Reply::with_menu(
                "Choose a command from the menu.",
            ))),
            DialogState::IncomeAmount => Ok(self.income_amount(text)),
            DialogState::IncomeDate { amount } => Ok(self.income_date(amount, text)),
            DialogState::IncomeDescription { amount, date } => {
                self.income_description(sender, amount, date, text).await
            }
            DialogState::ExpenseCategory => self.expense_category(text).await,
            DialogState::NewCategoryName { continue_expense } => {
                self.new_category_name(continue_expense, text).await
            }
            DialogState::ExpenseAmount { category } => Ok(self.expense_amount(category, text)),
            DialogState::ExpenseDate { category, amount } => {
                Ok(self.expense_date(category, amount, text))
            }
            DialogState::ExpenseDescription {
                category,
                amount,
                date,
            } => {
                self.expense_description(sender, category, amount, date, text)
                    .await
            }
            DialogState::PeriodStart => Ok(self.period_start(text)),
            DialogState::PeriodEnd { start } => self.period_end(sender, start, text).await,
        }
    }

    fn income_amount(&self, text: &str) -> Transition {
        match Money::parse_positive(text) {
            Ok(amount) => Transition::stay(
                Reply::text("Enter the income date in YYYY-MM-DD format."),
                DialogState::IncomeDate { amount },
            ),
            Err(_) => Transition::stay(Reply::text(INVALID_AMOUNT), DialogState::IncomeAmount),
        }
    }

    fn income_date(&self, amount: Money, text: &str) -> Transition {
        match EntryDate::parse(text, self.dates) {
            Ok(date) => Transition::stay(
                Reply::text("Enter a description for the income."),
                DialogState::IncomeDescription { amount, date },
            ),
            Err(_) => Transition::stay(Reply::text(INVALID_DATE), DialogState::IncomeDate { amount }),
        }
    }

    async fn income_description(
        &self,
        sender: &Sender,
        amount: Money,
        date: EntryDate,
        text: &str,
    ) -> StepResult {
        let Some(user) = self.current_user(sender).await? else {
            return Ok(Transition::idle(Reply::with_menu(NOT_REGISTERED)));
        };
        let income = self.engine.add_income(user.id, amount, &date, text).await?;
        Ok(Transition::idle(Reply::with_menu(format!(
            "Income of {} added.",
            income.amount
        ))))
    }

    async fn expense_category(&self, text: &str) -> StepResult {
        match self.engine.category_by_name(text).await? {
            Some(category) => Ok(Self::ask_expense_amount(
                format!("Category \"{}\". Enter the expense amount.", category.name),
                category,
            )),
            None => Ok(Transition::idle(Reply::with_menu("Category not found."))),
        }
    }

    async fn new_category_name(&self, continue_expense: bool, text: &str) -> StepResult {
        match self.engine.create_category(text).await {
            Ok(category) if continue_expense => Ok(Self::ask_expense_amount(
                format!(
                    "Category \"{}\" added. Enter the expense amount.",
                    category.name
                ),
                category,
            )),
            Ok(category) => Ok(Transition::idle(Reply::with_menu(format!(
                "Category \"{}\" added.",
                category.name
            )))),
            Err(EngineError::ExistingKey(_)) => Ok(Transition::stay(
                Reply::text("This category already exists. Enter a different name."),
                DialogState::NewCategoryName { continue_expense },
            )),
            Err(err) => Err(err),
        }
    }

    fn ask_expense_amount(text: String, category: Category) -> Transition {
        Transition::stay(
            Reply::with_keyboard(text, Keyboard::Remove),
            DialogState::ExpenseAmount { category },
        )
    }

    fn expense_amount(&self, category: Category, text: &str) -> Transition {
        match Money::parse_positive(text) {
            Ok(amount) => Transition::stay(
                Reply::text("Enter the expense date in YYYY-MM-DD format."),
                DialogState::ExpenseDate { category, amount },
            ),
            Err(_) => Transition::stay(
                Reply::text(INVALID_AMOUNT),
                DialogState::ExpenseAmount { category },
            ),
        }
    }

    fn expense_date(&self, category: Category, amount: Money, text: &str) -> Transition {
        match EntryDate::parse(text, self.dates) {
            Ok(date) => Transition::stay(
                Reply::text("Enter a description for the expense."),
                DialogState::ExpenseDescription {
                    category,
                    amount,
                    date,
                },
            ),
            Err(_) => Transition::stay(
                Reply::text(INVALID_DATE),
                DialogState::ExpenseDate { category, amount },
            ),
        }
    }

    async fn expense_description(
        &self,
        sender: &Sender,
        category: Category,
        amount: Money,
        date: EntryDate,
        text: &str,
    ) -> StepResult {
        let Some(user) = self.current_user(sender).await? else {
            return Ok(Transition::idle(Reply::with_menu(NOT_REGISTERED)));
        };
        let expense = match self
            .engine
            .add_expense(user.id, category.id, amount, &date, text)
            .await
        {
            Ok(expense) => expense,
            Err(EngineError::KeyNotFound(_)) => {
                return Ok(Transition::idle(Reply::with_menu("Category not found.")));
            }
            Err(err) => return Err(err),
        };
        Ok(Transition::idle(Reply::with_menu(format!(
            "Expense of {} in category \"{}\" added.",
            expense.amount, category.name
        ))))
    }

    fn period_start(&self, text: &str) -> Transition {
        match EntryDate::parse(text, self.dates) {
            Ok(start) => Transition::stay(
                Reply::text("Enter the end date in YYYY-MM-DD format."),
                DialogState::PeriodEnd { start },
            ),
            Err(_) => Self::restart_period(),
        }
    }

    async fn period_end(&self, sender: &Sender, start: EntryDate, text: &str) -> StepResult {
        // A malformed end date restarts the whole period dialog.
        let Ok(end) = EntryDate::parse(text, self.dates) else {
            return Ok(Self::restart_period());
        };
        if end < start {
            return Ok(Transition::stay(
                Reply::text(format!(
                    "The end date must not be before {start}. Enter the end date again."
                )),
                DialogState::PeriodEnd { start },
            ));
        }

        let Some(user) = self.current_user(sender).await? else {
            return Ok(Transition::idle(Reply::with_menu(NOT_REGISTERED)));
        };
        let balance = self.engine.period_balance(user.id, &start, &end).await?;
        Ok(Transition::idle(Reply::with_menu(ui::render_period_balance(
            &start, &end, &balance,
        ))))
    }

    fn restart_period() -> Transition {
        Transition::stay(
            Reply::text("The date must be in YYYY-MM-DD format. Enter the start date again."),
            DialogState::PeriodStart,
        )
    }

    async fn register(&self, sender: &Sender) -> Result<engine::Registration, EngineError> {
        self.engine
            .get_or_create_user(
                sender.chat_id,
                sender.first_name.as_deref(),
                sender.last_name.as_deref(),
            )
            .await
    }

    async fn current_user(&self, sender: &Sender) -> Result<Option<User>, EngineError> {
        self.engine.user_by_telegram_id(sender.chat_id).await
    }
}
