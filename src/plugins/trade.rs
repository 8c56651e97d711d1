//! Player-to-player exchanges: /trade and /gift.
//!
//! Offers wait in memory until the other side presses a button. Trades are
//! answered by the receiver, gifts are confirmed by the sender.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, ReplyParameters};
use tracing::info;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::Character;
use crate::game::{PendingGift, PendingTrade};
use crate::utils::card::send_card;
use crate::utils::{html_escape, mention_html, parse_id, reply_html, ReplyExt};

const NOT_FOR_YOU: &str = "This is not for you!";

/// Offer button press: `<kind>:<confirm|cancel>:<counterpart>`.
#[derive(Debug, PartialEq, Eq)]
struct OfferAction {
    confirm: bool,
    counterpart: i64,
}

fn parse_action(data: &str) -> Option<OfferAction> {
    let mut parts = data.split(':').skip(1);
    let confirm = match parts.next()? {
        "confirm" => true,
        "cancel" => false,
        _ => return None,
    };
    let counterpart = parse_id(parts.next()?)?;
    Some(OfferAction {
        confirm,
        counterpart,
    })
}

fn gift_caption(character: &Character, receiver_first_name: &str) -> String {
    format!(
        "🎁 <b>Do you want to gift this character?</b>\n\n\
        🎴 <b>Name:</b> {}\n\
        📺 <b>Anime:</b> {}\n\
        🌟 <b>Rarity:</b> {} {}\n\
        🆔 <b>ID:</b> <code>{}</code>\n\n\
        👤 <b>To:</b> {}",
        html_escape(&character.name),
        html_escape(&character.anime),
        character.rarity.emoji(),
        character.rarity,
        character.id,
        html_escape(receiver_first_name)
    )
}

/// Replace an offer message, caption or text depending on what it carries.
async fn close_offer(bot: &ThrottledBot, q: &CallbackQuery, text: String) -> anyhow::Result<()> {
    let Some(message) = &q.message else {
        return Ok(());
    };

    let has_media = message
        .regular_message()
        .is_some_and(|m| m.photo().is_some() || m.video().is_some());

    if has_media {
        bot.edit_message_caption(message.chat().id, message.id())
            .caption(text)
            .parse_mode(ParseMode::Html)
            .await?;
    } else {
        bot.edit_message_text(message.chat().id, message.id(), text)
            .parse_mode(ParseMode::Html)
            .await?;
    }
    Ok(())
}

/// Handle /trade <my_id> <their_id> as a reply.
pub async fn trade_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(sender_id) = msg.sender_id() else {
        return Ok(());
    };

    let Some(receiver) = msg.replied_user() else {
        reply_html(&bot, &msg, "You need to reply to a user's message to trade a character!").await?;
        return Ok(());
    };
    let receiver_id = receiver.id.0 as i64;

    if receiver_id == sender_id {
        reply_html(&bot, &msg, "You can't trade a character with yourself!").await?;
        return Ok(());
    }

    let args = msg.args();
    let [sender_card_id, receiver_card_id] = args.as_slice() else {
        reply_html(&bot, &msg, "You need to provide two character IDs!").await?;
        return Ok(());
    };

    let sender_card = state
        .collectors
        .get(sender_id)
        .await?
        .and_then(|c| c.find_card(sender_card_id).cloned());
    let Some(sender_card) = sender_card else {
        reply_html(&bot, &msg, "You don't have the character you're trying to trade!").await?;
        return Ok(());
    };

    let receiver_card = state
        .collectors
        .get(receiver_id)
        .await?
        .and_then(|c| c.find_card(receiver_card_id).cloned());
    let Some(receiver_card) = receiver_card else {
        reply_html(
            &bot,
            &msg,
            "The other user doesn't have the character they're trying to trade!",
        )
        .await?;
        return Ok(());
    };

    state.trades.insert(
        sender_id,
        receiver_id,
        PendingTrade {
            sender_card,
            receiver_card,
        },
    );

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "Confirm Trade",
            format!("trade:confirm:{sender_id}"),
        )],
        vec![InlineKeyboardButton::callback(
            "Cancel Trade",
            format!("trade:cancel:{sender_id}"),
        )],
    ]);

    bot.send_message(
        msg.chat.id,
        format!(
            "{}, do you accept this trade?",
            mention_html(receiver_id, &receiver.first_name)
        ),
    )
    .parse_mode(ParseMode::Html)
    .reply_parameters(ReplyParameters::new(msg.id))
    .reply_markup(keyboard)
    .await?;

    Ok(())
}

/// Handle trade:<confirm|cancel>:<sender>. Only the receiver may answer.
pub async fn trade_callback(bot: ThrottledBot, q: CallbackQuery, state: AppState) -> anyhow::Result<()> {
    let receiver_id = q.from.id.0 as i64;

    let action = q.data.as_deref().and_then(parse_action);
    let Some(OfferAction {
        confirm,
        counterpart: sender_id,
    }) = action
    else {
        bot.answer_callback_query(&q.id).await?;
        return Ok(());
    };

    let Some(trade) = state.trades.take(sender_id, receiver_id) else {
        bot.answer_callback_query(&q.id)
            .text(NOT_FOR_YOU)
            .show_alert(true)
            .await?;
        return Ok(());
    };

    if !confirm {
        close_offer(&bot, &q, "❌️ Sad Cancelled....".to_string()).await?;
        bot.answer_callback_query(&q.id).await?;
        return Ok(());
    }

    let sender = state.collectors.get(sender_id).await?;
    let receiver = state.collectors.get(receiver_id).await?;

    let (Some(mut sender), Some(mut receiver)) = (sender, receiver) else {
        bot.answer_callback_query(&q.id)
            .text("One of the characters is no longer available!")
            .show_alert(true)
            .await?;
        return Ok(());
    };

    let given = sender.take_card(&trade.sender_card.id);
    let received = receiver.take_card(&trade.receiver_card.id);
    let (Some(given), Some(received)) = (given, received) else {
        bot.answer_callback_query(&q.id)
            .text("One of the characters is no longer available!")
            .show_alert(true)
            .await?;
        return Ok(());
    };

    sender.characters.push(received);
    receiver.characters.push(given);
    state.collectors.set_characters(&sender).await?;
    state.collectors.set_characters(&receiver).await?;

    info!(
        "Trade {} <-> {}: {} for {}",
        sender_id, receiver_id, trade.sender_card.id, trade.receiver_card.id
    );

    close_offer(
        &bot,
        &q,
        format!(
            "You have successfully traded your character with {}!",
            mention_html(sender_id, &sender.first_name)
        ),
    )
    .await?;
    bot.answer_callback_query(&q.id).await?;
    Ok(())
}

/// Handle /gift <id> as a reply.
pub async fn gift_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(sender_id) = msg.sender_id() else {
        return Ok(());
    };

    let Some(receiver) = msg.replied_user() else {
        reply_html(&bot, &msg, "You need to reply to a user's message to gift a character!").await?;
        return Ok(());
    };
    let receiver_id = receiver.id.0 as i64;

    if receiver_id == sender_id {
        reply_html(&bot, &msg, "You can't gift a character to yourself!").await?;
        return Ok(());
    }

    let args = msg.args();
    let [character_id] = args.as_slice() else {
        reply_html(
            &bot,
            &msg,
            "You need to provide a character ID!\nUsage: <code>/gift &lt;character_id&gt;</code>",
        )
        .await?;
        return Ok(());
    };

    let card = state
        .collectors
        .get(sender_id)
        .await?
        .and_then(|c| c.find_card(character_id).cloned());
    let Some(character) = card else {
        reply_html(&bot, &msg, "You don't have this character in your collection!").await?;
        return Ok(());
    };

    let caption = gift_caption(&character, &receiver.first_name);
    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "✅ Confirm Gift",
            format!("gift:confirm:{receiver_id}"),
        )],
        vec![InlineKeyboardButton::callback(
            "❌ Cancel Gift",
            format!("gift:cancel:{receiver_id}"),
        )],
    ]);

    send_card(&bot, msg.chat.id, &character, &caption, Some(msg.id), Some(keyboard)).await?;

    state.gifts.insert(
        sender_id,
        receiver_id,
        PendingGift {
            character,
            receiver_username: receiver.username.clone(),
            receiver_first_name: receiver.first_name.clone(),
        },
    );

    Ok(())
}

/// Handle gift:<confirm|cancel>:<receiver>. Only the sender may answer.
pub async fn gift_callback(bot: ThrottledBot, q: CallbackQuery, state: AppState) -> anyhow::Result<()> {
    let sender_id = q.from.id.0 as i64;

    let action = q.data.as_deref().and_then(parse_action);
    let Some(OfferAction {
        confirm,
        counterpart: receiver_id,
    }) = action
    else {
        bot.answer_callback_query(&q.id).await?;
        return Ok(());
    };

    let Some(gift) = state.gifts.take(sender_id, receiver_id) else {
        bot.answer_callback_query(&q.id)
            .text(NOT_FOR_YOU)
            .show_alert(true)
            .await?;
        return Ok(());
    };

    if !confirm {
        close_offer(&bot, &q, "❌ <b>Gift cancelled.</b>".to_string()).await?;
        bot.answer_callback_query(&q.id).text("Gift cancelled").await?;
        return Ok(());
    }

    if !state.collectors.remove_one(sender_id, &gift.character.id).await? {
        bot.answer_callback_query(&q.id)
            .text("You no longer have this character!")
            .show_alert(true)
            .await?;
        return Ok(());
    }

    state
        .collectors
        .add_card(
            receiver_id,
            gift.receiver_username.as_deref(),
            &gift.receiver_first_name,
            &gift.character,
            None,
        )
        .await?;

    info!("Gift {} from {} to {}", gift.character.id, sender_id, receiver_id);

    close_offer(
        &bot,
        &q,
        format!(
            "✅ <b>Gift successful!</b>\n\n\
            You have successfully gifted your character to {}!",
            mention_html(receiver_id, &gift.receiver_first_name)
        ),
    )
    .await?;
    bot.answer_callback_query(&q.id).text("Gift sent successfully!").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Rarity;

    #[test]
    fn test_parse_action() {
        assert_eq!(
            parse_action("trade:confirm:42"),
            Some(OfferAction {
                confirm: true,
                counterpart: 42
            })
        );
        assert_eq!(
            parse_action("gift:cancel:7"),
            Some(OfferAction {
                confirm: false,
                counterpart: 7
            })
        );
        assert_eq!(parse_action("gift:maybe:7"), None);
        assert_eq!(parse_action("trade:confirm:"), None);
    }

    #[test]
    fn test_gift_caption() {
        let c = Character::new("12", "Rem", "Re Zero", Rarity::Zenith, "u");
        let caption = gift_caption(&c, "<Bob>");
        assert!(caption.contains("🪩 Zenith"));
        assert!(caption.contains("<code>12</code>"));
        assert!(caption.contains("&lt;Bob&gt;"));
    }
}
