//! Telegram bot.
//!
//! Long-polls Telegram, keeps the per-chat dialog state in memory and records
//! incomes and expenses through the [`engine::Engine`].

use engine::{DatePolicy, Engine};
use teloxide::{prelude::*, utils::command::BotCommands};

mod commands;
mod conversation;
mod handlers;
mod state;
mod ui;

#[derive(Clone)]
pub struct ConfigParameters {
    engine: Engine,
    sessions: state::SessionStore,
    dates: DatePolicy,
}

pub struct Bot {
    token: String,
    engine: Engine,
    dates: DatePolicy,
}

impl Bot {
    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);

        if let Err(err) = bot.set_my_commands(commands::Command::bot_commands()).await {
            tracing::warn!("failed to publish the command list: {err}");
        }

        let parameters = ConfigParameters {
            engine: self.engine.clone(),
            sessions: state::SessionStore::default(),
            dates: self.dates,
        };

        let handler =
            dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default, Debug)]
pub struct BotBuilder {
    token: String,
    engine: Option<Engine>,
    dates: DatePolicy,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    pub fn engine(mut self, engine: Engine) -> BotBuilder {
        self.engine = Some(engine);
        self
    }

    /// How strictly entered dates are checked.
    pub fn date_policy(mut self, dates: DatePolicy) -> BotBuilder {
        self.dates = dates;
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        if self.token.trim().is_empty() {
            return Err("missing telegram token".to_string());
        }
        let engine = self
            .engine
            .ok_or_else(|| "missing engine".to_string())?;
        Ok(Bot {
            token: self.token,
            engine,
            dates: self.dates,
        })
    }
}
