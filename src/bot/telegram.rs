//! Telegram front end: receives commands, runs them against the engine and
//! posts the resulting batches into the protocol threads of the topic group.

use std::sync::Arc;

use log::{debug, error, info, warn};
use teloxide::prelude::*;
use teloxide::types::{
    ChatAction, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode,
    ReplyParameters, ThreadId,
};
use tokio::sync::{mpsc, Mutex};

use super::commands::{self, Command};
use super::delivery::{self, Batch};
use crate::engine::ProxyEngine;
use crate::error::{Error, Result};
use crate::models::Protocol;
use crate::settings::{DeliverySettings, TelegramSettings};
use crate::utils::http::HttpFetcher;
use crate::utils::system::humanize_age;

pub type Engine = ProxyEngine<HttpFetcher>;

/// Shared state handed to every update handler.
pub struct BotContext {
    engine: Arc<Engine>,
    telegram: TelegramSettings,
    delivery: DeliverySettings,
    /// Serialises engine work; refresh and query never overlap.
    engine_lock: Mutex<()>,
    fatal: mpsc::UnboundedSender<Error>,
}

fn tg_err(e: teloxide::RequestError) -> Error {
    Error::Telegram(e.to_string())
}

impl BotContext {
    /// Run `f` on the blocking pool while holding the engine lock.
    async fn with_engine<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Engine) -> Result<T> + Send + 'static,
    {
        let _guard = self.engine_lock.lock().await;
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || f(engine.as_ref()))
            .await
            .map_err(|e| Error::Telegram(format!("engine task failed: {}", e)))?
    }

    /// Fatal errors stop the bot; everything else is only logged.
    fn report(&self, e: Error) {
        if e.is_fatal() {
            error!("{}", e);
            let _ = self.fatal.send(e);
        } else {
            warn!("{}", e);
        }
    }
}

/// Run the bot until the dispatcher stops or a fatal error occurs.
///
/// The engine must be built outside the async runtime because its HTTP
/// client is blocking.
pub async fn run(
    engine: Arc<Engine>,
    telegram: TelegramSettings,
    delivery: DeliverySettings,
) -> Result<()> {
    if telegram.token.is_empty() {
        return Err(Error::Config(format!(
            "telegram token not set (telegram.token or {})",
            crate::settings::TOKEN_ENV
        )));
    }

    let bot = Bot::new(telegram.token.clone());
    let me = bot.get_me().await.map_err(tg_err)?;
    info!(":: {} is running with id {}", me.first_name, me.id);

    let (fatal_tx, mut fatal_rx) = mpsc::unbounded_channel();
    let ctx = Arc::new(BotContext {
        engine,
        telegram,
        delivery,
        engine_lock: Mutex::new(()),
        fatal: fatal_tx,
    });

    let handler = Update::filter_message().endpoint(handle_message);
    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .build();

    tokio::select! {
        biased;

        Some(e) = fatal_rx.recv() => Err(e),
        _ = dispatcher.dispatch() => {
            warn!("telegram dispatcher exited");
            Ok(())
        }
    }
}

async fn handle_message(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return respond(());
    };
    if !ctx.telegram.is_authorized(msg.chat.id.0) {
        return respond(());
    }
    let Some(command) = Command::parse(text) else {
        return respond(());
    };

    debug!("command {:?} from chat {}", command, msg.chat.id);

    match command {
        Command::Ping => {
            bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;
            bot.send_message(msg.chat.id, commands::PING_REPLY)
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
        }
        Command::Help => {
            bot.send_chat_action(msg.chat.id, ChatAction::Typing).await?;
            bot.send_message(msg.chat.id, commands::HELP_TEXT)
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
        }
        Command::Update => handle_update(&bot, &msg, &ctx).await?,
        Command::Proxies(protocol) => handle_proxies(&bot, &msg, &ctx, protocol).await?,
    }

    respond(())
}

async fn handle_update(bot: &Bot, msg: &Message, ctx: &BotContext) -> ResponseResult<()> {
    let prompt = bot
        .send_message(msg.chat.id, commands::UPDATE_PROMPT)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    let outcome = ctx
        .with_engine(|engine| {
            let previous = match engine.cache_age() {
                Ok(age) => humanize_age(age),
                Err(_) => "never".to_string(),
            };
            Ok((previous, engine.refresh()?))
        })
        .await;

    let text = match outcome {
        Ok((previous, true)) => commands::update_done(&previous),
        Ok((_, false)) => commands::UPDATE_FAILED.to_string(),
        Err(e) => {
            ctx.report(e);
            commands::UPDATE_FAILED.to_string()
        }
    };

    bot.edit_message_text(msg.chat.id, prompt.id, text).await?;
    Ok(())
}

fn keyboard(batch: &Batch) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(batch.button_rows().into_iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::url(b.label.clone(), b.url.clone()))
            .collect::<Vec<_>>()
    }))
}

async fn handle_proxies(
    bot: &Bot,
    msg: &Message,
    ctx: &BotContext,
    protocol: Protocol,
) -> ResponseResult<()> {
    let prompt = bot
        .send_message(msg.chat.id, commands::uploading_prompt(protocol))
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    let entries = match ctx.with_engine(move |engine| engine.query(protocol)).await {
        Ok(entries) => entries,
        Err(e) => {
            ctx.report(e);
            bot.edit_message_text(msg.chat.id, prompt.id, commands::uploading_failed(protocol))
                .await?;
            return Ok(());
        }
    };

    let batches = {
        let mut rng = rand::thread_rng();
        delivery::plan(protocol, entries, &ctx.delivery, &mut rng)
    };
    info!("Sending {} {} batches", batches.len(), protocol);

    let topic = ChatId(ctx.telegram.topic);
    let thread = ctx.telegram.threads.thread_for(protocol);

    for (i, batch) in batches.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(ctx.delivery.pace()).await;
        }

        let mut request = bot
            .send_message(topic, batch.text.clone())
            .parse_mode(ParseMode::MarkdownV2);
        if thread != 0 {
            request = request.message_thread_id(ThreadId(MessageId(thread)));
        }
        if !batch.buttons.is_empty() {
            request = request.reply_markup(keyboard(batch));
        }

        if let Err(e) = request.await {
            warn!("failed to send {} batch {}: {}", protocol, i + 1, e);
        }
    }

    bot.edit_message_text(msg.chat.id, prompt.id, commands::uploading_done(protocol))
        .await?;
    Ok(())
}
