//! /find: catalogue lookup with global catch statistics.

use teloxide::prelude::*;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{Character, Collector};
use crate::utils::card::send_card;
use crate::utils::{html_escape, reply_html, ReplyExt};

const TOP_CATCHERS: usize = 10;

/// Owners with their copy counts, most copies first.
fn catchers(owners: &[Collector], character_id: &str) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = owners
        .iter()
        .map(|c| (c.first_name.clone(), c.copies_of(character_id)))
        .filter(|(_, n)| *n > 0)
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn find_caption(character: &Character, catchers: &[(String, usize)]) -> String {
    let total: usize = catchers.iter().map(|(_, n)| n).sum();

    let mut text = format!(
        "OwO! Look out this character!\n\n\
        <b>{}</b>\n\
        {}: <b>{}</b>\n\
        ({} RARITY: {})\n\n\
        ⦿ GLOBALLY CAUGHT : {} TIMES",
        html_escape(&character.anime),
        character.id,
        html_escape(&character.name),
        character.rarity.emoji(),
        character.rarity.as_str().to_lowercase(),
        total
    );

    if !catchers.is_empty() {
        text.push_str("\n\n🏆 <b>TOP 10 GLOBAL CATCHERS</b>\n");
        for (i, (name, count)) in catchers.iter().take(TOP_CATCHERS).enumerate() {
            text.push_str(&format!("{}. {} → {}\n", i + 1, html_escape(name), count));
        }
    }

    text
}

/// Handle /find <id>.
pub async fn find_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(&id) = msg.args().first() else {
        reply_html(&bot, &msg, "🔍 <b>Find Character</b>\n\nUsage: <code>/find &lt;id&gt;</code>")
            .await?;
        return Ok(());
    };

    let Some(character) = state.characters.get(id).await? else {
        reply_html(&bot, &msg, format!("❌ No character found with ID <code>#{}</code>", html_escape(id)))
            .await?;
        return Ok(());
    };

    let owners = state.collectors.owners_of(&character.id).await?;
    let caption = find_caption(&character, &catchers(&owners, &character.id));

    send_card(&bot, msg.chat.id, &character, &caption, Some(msg.id), None).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Rarity;

    fn owner(id: i64, name: &str, copies: usize, card: &Character) -> Collector {
        let mut c = Collector::new(id, None, name);
        c.characters = vec![card.clone(); copies];
        c
    }

    #[test]
    fn test_catchers_ranked_by_copies() {
        let rem = Character::new("4", "Rem", "Re Zero", Rarity::Legendary, "u");
        let owners = vec![owner(1, "Ann", 1, &rem), owner(2, "Bob", 3, &rem), owner(3, "Cy", 0, &rem)];

        let ranked = catchers(&owners, "4");
        assert_eq!(ranked, vec![("Bob".to_string(), 3), ("Ann".to_string(), 1)]);

        let caption = find_caption(&rem, &ranked);
        assert!(caption.contains("GLOBALLY CAUGHT : 4 TIMES"));
        assert!(caption.contains("RARITY: legendary"));
        assert!(caption.contains("1. Bob → 3"));
    }
}
