use teloxide::prelude::*;

use crate::{
    ConfigParameters,
    conversation::{Conversation, Sender},
    ui::Reply,
};

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;

    let Some(text) = msg.text() else {
        tracing::debug!(chat_id = chat_id.0, "ignoring non-text message");
        return Ok(());
    };

    let sender = Sender {
        chat_id: chat_id.0,
        first_name: msg.from.as_ref().map(|from| from.first_name.clone()),
        last_name: msg.from.as_ref().and_then(|from| from.last_name.clone()),
    };

    let state = cfg.sessions.get(chat_id).await;
    tracing::debug!(chat_id = chat_id.0, ?state, "handling message");

    let conversation = Conversation::new(cfg.engine.clone(), cfg.dates);
    let transition = conversation.handle(&sender, state, text).await;
    cfg.sessions.set(chat_id, transition.next).await;

    for reply in transition.replies {
        send_reply(&bot, chat_id, reply).await?;
    }

    Ok(())
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> ResponseResult<()> {
    let markup = reply.keyboard.markup();
    let request = bot.send_message(chat_id, reply.text);
    match markup {
        Some(markup) => request.reply_markup(markup).await?,
        None => request.await?,
    };
    Ok(())
}
