//! Slash commands understood by the bot.

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Available commands:")]
pub enum Command {
    #[command(description = "register and show the main menu.")]
    Start,
    #[command(description = "show the main menu.")]
    Menu,
    #[command(description = "add a new expense category.")]
    NewCategory,
    #[command(description = "show this message.")]
    Help,
}

/// Recognizes a slash command, ignoring any `@botname` suffix and arguments.
pub(crate) fn parse_command(text: &str) -> Option<Command> {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return None;
    }
    let word = trimmed.split_whitespace().next().unwrap_or("");
    let name = word.split('@').next().unwrap_or(word);

    match name {
        "/start" => Some(Command::Start),
        "/menu" => Some(Command::Menu),
        "/new_category" => Some(Command::NewCategory),
        "/help" => Some(Command::Help),
        _ => None,
    }
}

pub(crate) fn help_text() -> String {
    Command::descriptions().to_string()
}
