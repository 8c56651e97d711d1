use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub fn get_text() -> String {
    "<b>👑 Help: Owner</b>\n\n\
    • <code>/adduploader &lt;user_id&gt;</code> - Add a level 1 uploader\n\
    • <code>/removeuploader &lt;user_id&gt;</code> - Remove an uploader\n\
    • <code>/broadcast</code> - Reply to a message to copy it to every group and user"
        .to_string()
}

pub fn get_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "🔙 Back",
        "help:back",
    )]])
}
