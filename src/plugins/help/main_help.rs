use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub fn get_text() -> &'static str {
    "<b>📚 Collect'em Help</b>\n\n\
    Characters spawn in groups as people chat. Guess their name with \
    <code>/marry</code> to add them to your harem.\n\n\
    Pick a category below to see its commands."
}

pub fn get_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("🎴 Game", "help:game"),
            InlineKeyboardButton::callback("🔁 Trading", "help:trade"),
        ],
        vec![
            InlineKeyboardButton::callback("📤 Uploading", "help:upload"),
            InlineKeyboardButton::callback("🛡️ Admin", "help:admin"),
        ],
        vec![InlineKeyboardButton::callback("👑 Owner", "help:owner")],
    ])
}
