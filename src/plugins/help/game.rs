use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub fn get_text() -> String {
    "<b>🎴 Help: Game</b>\n\n\
    A character spawns every 100 messages in a group (admins can change this).\n\n\
    <b>Commands:</b>\n\
    • <code>/marry &lt;name&gt;</code> - Claim the spawned character (also <code>/guess</code>)\n\
    • <code>/harem [page]</code> - View your collection (also <code>/collection</code>)\n\
    • <code>/fav &lt;id&gt;</code> - Toggle a favourite, shown first in your harem\n\
    • <code>/sorts rarity|anime</code> - Group your harem by rarity or anime\n\
    • <code>/find &lt;id&gt;</code> - Look up a character and its top collectors\n\
    • <code>/rarity</code> - Rarity tiers and spawn chances\n\
    • <code>/topgroups</code> - Groups with the most claims\n\
    • <code>/top</code> - Top collectors of this group\n\
    • <code>/eventstatus</code> - Current spawn event\n\n\
    <b>Rules:</b>\n\
    • The first correct guess wins a spawn\n\
    • A part of the name is enough, e.g. <code>/marry rem</code>\n\
    • You can marry up to 30 characters per day (resets 00:00 UTC)\n\
    • Spamming blocks you from claims and spawns for 12 minutes\n\n\
    <b>Inline:</b>\n\
    • <code>@bot collection.&lt;user_id&gt;</code> - Browse someone's cards\n\
    • <code>@bot &lt;text&gt;</code> - Search the catalogue"
        .to_string()
}

pub fn get_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "🔙 Back",
        "help:back",
    )]])
}
