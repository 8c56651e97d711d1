use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub fn get_text() -> String {
    "<b>🔁 Help: Trading</b>\n\n\
    Reply to the other user's message to use these.\n\n\
    • <code>/trade &lt;your_id&gt; &lt;their_id&gt;</code> - Offer one of your cards for one of theirs. \
    Only they can accept or cancel.\n\
    • <code>/gift &lt;id&gt;</code> - Give one of your cards away. You confirm before it is sent.\n\n\
    Cards are checked again when the offer is confirmed."
        .to_string()
}

pub fn get_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "🔙 Back",
        "help:back",
    )]])
}
