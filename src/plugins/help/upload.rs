use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub fn get_text() -> String {
    "<b>📤 Help: Uploading</b>\n\n\
    • <code>/upload &lt;url&gt; &lt;name&gt; &lt;anime&gt; &lt;rarity&gt;</code> - Add a character\n\
    • <code>/update &lt;id&gt; &lt;url&gt; &lt;name&gt; &lt;anime&gt; &lt;rarity&gt;</code> - Replace a character (also <code>/edit</code>)\n\n\
    Use <code>-</code> or <code>_</code> instead of spaces in names, e.g. \
    <code>muzan-kibutsuji demon-slayer</code>.\n\n\
    <b>Uploader levels:</b>\n\
    • Level 1 - rarities 1 to 6 (up to Mythic)\n\
    • Level 2 - rarities 1 to 9 (up to Zenith)\n\
    • Level 3 - every rarity\n\n\
    Discord CDN links and direct image or video links (including MP4) are supported."
        .to_string()
}

pub fn get_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "🔙 Back",
        "help:back",
    )]])
}
