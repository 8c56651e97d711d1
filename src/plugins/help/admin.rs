use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub fn get_text() -> String {
    "<b>🛡️ Help: Admin</b>\n\n\
    Sudo users only.\n\n\
    <b>🎴 Catalogue:</b>\n\
    • <code>/delete &lt;id&gt;</code> - Delete a character everywhere\n\
    • <code>/remove &lt;id&gt; &lt;user_id&gt;</code> - Take one copy from a user\n\
    • <code>/give &lt;id&gt; [user_id]</code> - Give a character (or reply)\n\
    • <code>/migrate_rarities</code> - Rename Celestial/Arcane to Retro/Zenith\n\n\
    <b>✨ Spawns:</b>\n\
    • <code>/summon</code> - Spawn now; anyone may claim it until the next spawn\n\
    • <code>/changetime &lt;n&gt;</code> - Spawn every n messages in this chat\n\
    • <code>/lockspawn &lt;id&gt;</code> - Stop a character from spawning\n\
    • <code>/unlockspawn &lt;id&gt;</code> - Allow it again\n\
    • <code>/lockedspawns</code> - List locked characters\n\
    • <code>/startevent</code> / <code>/endevent</code> - Christmas event (🎄 cards only)\n\n\
    <b>👥 Users:</b>\n\
    • <code>/bonk &lt;user&gt; &lt;time&gt; [reason]</code> - Bar a user from claiming (30m, 12h, 3d, 1w)\n\
    • <code>/unbonk &lt;user&gt;</code> - Lift it\n\
    • <code>/promote &lt;user_id&gt; &lt;1-3&gt;</code> - Set an uploader's level"
        .to_string()
}

pub fn get_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "🔙 Back",
        "help:back",
    )]])
}
