//! Collections: /harem, /fav, /sorts and inline browsing.

use std::collections::HashMap;

use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResult, InlineQueryResultArticle,
    InlineQueryResultPhoto, InputMessageContent, InputMessageContentText, ParseMode,
    ReplyParameters,
};
use tracing::debug;
use url::Url;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{Character, Collector, HaremSort, Rarity};
use crate::utils::media::process_image_url;
use crate::utils::{html_escape, paginate, parse_id, reply_html, ReplyExt};

/// Distinct cards per `/harem` page.
pub const PER_PAGE: usize = 15;

/// Inline results per answer; Telegram accepts at most 50.
const INLINE_PAGE: usize = 50;

/// A distinct card of a collection.
#[derive(Debug)]
struct Entry<'a> {
    card: &'a Character,
    copies: usize,
    favorite: bool,
}

/// Distinct cards with their copy counts, in first-claimed order.
fn distinct_cards(collector: &Collector) -> Vec<(&Character, usize)> {
    let mut order: Vec<&Character> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for card in &collector.characters {
        let count = counts.entry(card.id.as_str()).or_insert(0);
        if *count == 0 {
            order.push(card);
        }
        *count += 1;
    }

    order
        .into_iter()
        .map(|c| (c, counts.get(c.id.as_str()).copied().unwrap_or(1)))
        .collect()
}

fn rarity_rank(rarity: Rarity) -> usize {
    Rarity::DISPLAY_ORDER
        .iter()
        .position(|r| *r == rarity)
        .unwrap_or(usize::MAX)
}

fn numeric_id(card: &Character) -> u64 {
    card.id.parse().unwrap_or(u64::MAX)
}

/// Favourites first, then grouped by the collector's sort.
fn sorted_entries(collector: &Collector) -> Vec<Entry<'_>> {
    let mut entries: Vec<Entry> = distinct_cards(collector)
        .into_iter()
        .map(|(card, copies)| Entry {
            card,
            copies,
            favorite: collector.favorites.contains(&card.id),
        })
        .collect();

    match collector.harem_sort {
        HaremSort::Rarity => entries.sort_by_key(|e| {
            (!e.favorite, rarity_rank(e.card.rarity), numeric_id(e.card))
        }),
        HaremSort::Anime => entries.sort_by_key(|e| {
            (!e.favorite, e.card.anime.to_lowercase(), numeric_id(e.card))
        }),
    }
    entries
}

fn group_header(entry: &Entry, sort: HaremSort) -> String {
    if entry.favorite {
        return "💖 <b>Favourites</b>".to_string();
    }
    match sort {
        HaremSort::Rarity => format!("{} <b>{}</b>", entry.card.rarity.emoji(), entry.card.rarity),
        HaremSort::Anime => format!("📺 <b>{}</b>", html_escape(&entry.card.anime)),
    }
}

fn entry_line(entry: &Entry, sort: HaremSort) -> String {
    let copies = if entry.copies > 1 {
        format!(" ×{}", entry.copies)
    } else {
        String::new()
    };
    match sort {
        HaremSort::Rarity => format!(
            "• <code>{}</code> {} ({}){}",
            entry.card.id,
            html_escape(&entry.card.name),
            html_escape(&entry.card.anime),
            copies
        ),
        HaremSort::Anime => format!(
            "• {} <code>{}</code> {}{}",
            entry.card.rarity.emoji(),
            entry.card.id,
            html_escape(&entry.card.name),
            copies
        ),
    }
}

/// Render one page of a harem. Returns the text, the clamped page index
/// and the page count.
pub fn render_harem(collector: &Collector, page: usize) -> (String, usize, usize) {
    let entries = sorted_entries(collector);
    let page = paginate(entries.len(), page, PER_PAGE);

    let mut text = format!(
        "<b>{}'s Harem</b> - Page {}/{}\n📦 {} characters, {} cards\n",
        html_escape(&collector.first_name),
        page.index + 1,
        page.total,
        entries.len(),
        collector.characters.len()
    );

    let mut last_header = String::new();
    for entry in &entries[page.start..page.end] {
        let header = group_header(entry, collector.harem_sort);
        if header != last_header {
            text.push('\n');
            text.push_str(&header);
            text.push('\n');
            last_header = header;
        }
        text.push_str(&entry_line(entry, collector.harem_sort));
        text.push('\n');
    }

    (text, page.index, page.total)
}

fn harem_keyboard(user_id: i64, page: usize, total: usize) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();

    if total > 1 {
        let mut nav = Vec::new();
        if page > 0 {
            nav.push(InlineKeyboardButton::callback(
                "⬅️",
                format!("harem:{}:{}", user_id, page - 1),
            ));
        }
        if page + 1 < total {
            nav.push(InlineKeyboardButton::callback(
                "➡️",
                format!("harem:{}:{}", user_id, page + 1),
            ));
        }
        rows.push(nav);
    }

    rows.push(vec![InlineKeyboardButton::switch_inline_query_current_chat(
        "🎴 Collection",
        format!("collection.{user_id}"),
    )]);

    InlineKeyboardMarkup::new(rows)
}

const EMPTY_HAREM: &str =
    "You don't have any characters yet! Guess spawned characters with /marry.";

/// Handle /harem [page].
pub async fn harem_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    let page = msg
        .args()
        .first()
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(1)
        .saturating_sub(1);

    let collector = match state.collectors.get(user_id).await? {
        Some(c) if !c.characters.is_empty() => c,
        _ => {
            reply_html(&bot, &msg, EMPTY_HAREM).await?;
            return Ok(());
        }
    };

    let (text, page, total) = render_harem(&collector, page);

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .reply_markup(harem_keyboard(user_id, page, total))
        .await?;

    Ok(())
}

/// Handle harem:<user>:<page> buttons.
pub async fn harem_callback(bot: ThrottledBot, q: CallbackQuery, state: AppState) -> anyhow::Result<()> {
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    let mut parts = data.split(':').skip(1);
    let owner = parts.next().and_then(parse_id);
    let page = parts.next().and_then(|p| p.parse::<usize>().ok());
    let (Some(owner), Some(page)) = (owner, page) else {
        bot.answer_callback_query(&q.id).await?;
        return Ok(());
    };

    if q.from.id.0 as i64 != owner {
        bot.answer_callback_query(&q.id)
            .text("This is not your harem!")
            .show_alert(true)
            .await?;
        return Ok(());
    }

    let Some(collector) = state.collectors.get(owner).await? else {
        bot.answer_callback_query(&q.id).text(EMPTY_HAREM).await?;
        return Ok(());
    };

    let (text, page, total) = render_harem(&collector, page);

    if let Some(msg) = &q.message {
        bot.edit_message_text(msg.chat().id, msg.id(), text)
            .parse_mode(ParseMode::Html)
            .reply_markup(harem_keyboard(owner, page, total))
            .await?;
    }

    bot.answer_callback_query(&q.id).await?;
    Ok(())
}

/// Handle /fav <id>: toggle a favourite.
pub async fn fav_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    let Some(&character_id) = msg.args().first() else {
        reply_html(&bot, &msg, "Usage: <code>/fav &lt;character_id&gt;</code>").await?;
        return Ok(());
    };

    let Some(collector) = state.collectors.get(user_id).await? else {
        reply_html(&bot, &msg, EMPTY_HAREM).await?;
        return Ok(());
    };

    let Some(card) = collector.find_card(character_id) else {
        reply_html(&bot, &msg, "You don't have this character in your collection!").await?;
        return Ok(());
    };

    let name = html_escape(&card.name);
    let text = if state.collectors.toggle_favorite(user_id, character_id).await? {
        format!("💖 <b>{name}</b> is now one of your favourites!")
    } else {
        format!("💔 <b>{name}</b> was removed from your favourites.")
    };

    reply_html(&bot, &msg, text).await?;
    Ok(())
}

/// Handle /sorts rarity|anime.
pub async fn sorts_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    let Some(sort) = msg.args().first().and_then(|s| HaremSort::parse(s)) else {
        reply_html(
            &bot,
            &msg,
            "Usage: <code>/sorts rarity</code> or <code>/sorts anime</code>",
        )
        .await?;
        return Ok(());
    };

    state.collectors.set_sort(user_id, sort).await?;
    reply_html(
        &bot,
        &msg,
        format!("✅ Your harem is now sorted by <b>{}</b>.", sort.as_str()),
    )
    .await?;
    Ok(())
}

fn collection_caption(owner: &Collector, card: &Character, copies: usize) -> String {
    format!(
        "<b>{}'s</b> harem\n\n\
        {} <b>{}</b>\n\
        📺 {}\n\
        🆔 <code>{}</code> ×{}",
        html_escape(&owner.first_name),
        card.rarity.emoji(),
        html_escape(&card.name),
        html_escape(&card.anime),
        card.id,
        copies
    )
}

fn catalogue_caption(card: &Character) -> String {
    format!(
        "OwO! Check out this character!\n\n\
        <b>{}</b>\n\
        {}: <b>{}</b>\n\
        ({} RARITY: {})",
        html_escape(&card.anime),
        card.id,
        html_escape(&card.name),
        card.rarity.emoji(),
        card.rarity
    )
}

/// Photo result for image cards, article for videos and broken URLs.
fn card_result(id: String, card: &Character, caption: String) -> InlineQueryResult {
    let url = Url::parse(&process_image_url(&card.img_url));

    match url {
        Ok(url) if !card.is_video() => InlineQueryResult::Photo(
            InlineQueryResultPhoto::new(id, url.clone(), url)
                .caption(caption)
                .parse_mode(ParseMode::Html),
        ),
        _ => {
            let content = InputMessageContent::Text(
                InputMessageContentText::new(caption).parse_mode(ParseMode::Html),
            );
            InlineQueryResult::Article(
                InlineQueryResultArticle::new(
                    id,
                    format!("{} ({})", card.name, card.anime),
                    content,
                )
                .description(format!("{} {}", card.rarity.emoji(), card.rarity)),
            )
        }
    }
}

/// Inline mode: `collection.<user_id> [filter]` browses a collection,
/// anything else searches the catalogue.
pub async fn inline_query(bot: ThrottledBot, q: InlineQuery, state: AppState) -> anyhow::Result<()> {
    let offset: usize = q.offset.parse().unwrap_or(0);
    let query = q.query.trim();

    let mut results = Vec::new();
    let mut total = 0;
    let personal = query.starts_with("collection.");

    if let Some(rest) = query.strip_prefix("collection.") {
        let (user, filter) = rest.split_once(' ').unwrap_or((rest, ""));
        let filter = filter.trim().to_lowercase();

        let owner = match parse_id(user) {
            Some(id) => state.collectors.get(id).await?,
            None => None,
        };

        if let Some(owner) = owner {
            let cards: Vec<(&Character, usize)> = distinct_cards(&owner)
                .into_iter()
                .filter(|(c, _)| {
                    filter.is_empty()
                        || c.name.to_lowercase().contains(&filter)
                        || c.anime.to_lowercase().contains(&filter)
                })
                .collect();
            total = cards.len();

            for (i, (card, copies)) in cards.iter().skip(offset).take(INLINE_PAGE).enumerate() {
                results.push(card_result(
                    format!("{}_{}", card.id, offset + i),
                    card,
                    collection_caption(&owner, card, *copies),
                ));
            }
        }
    } else {
        let cards: Vec<Character> = if query.is_empty() {
            state.characters.all().await?.iter().rev().cloned().collect()
        } else {
            state.characters.search(query, 500).await?
        };
        total = cards.len();

        for (i, card) in cards.iter().skip(offset).take(INLINE_PAGE).enumerate() {
            results.push(card_result(
                format!("{}_{}", card.id, offset + i),
                card,
                catalogue_caption(card),
            ));
        }
    }

    let next_offset = if offset + INLINE_PAGE < total {
        (offset + INLINE_PAGE).to_string()
    } else {
        String::new()
    };

    debug!("Inline query '{}' -> {} of {} results", query, results.len(), total);

    bot.answer_inline_query(&q.id, results)
        .cache_time(5)
        .is_personal(personal)
        .next_offset(next_offset)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, name: &str, anime: &str, rarity: Rarity) -> Character {
        Character::new(id, name, anime, rarity, "https://x.io/a.jpg")
    }

    fn collector() -> Collector {
        let mut c = Collector::new(9, None, "Ann");
        c.characters = vec![
            card("3", "Rem", "Re Zero", Rarity::Common),
            card("10", "Gojo", "Jujutsu Kaisen", Rarity::Mythic),
            card("3", "Rem", "Re Zero", Rarity::Common),
            card("5", "Maki", "Jujutsu Kaisen", Rarity::Rare),
        ];
        c
    }

    #[test]
    fn test_distinct_cards_counts_copies() {
        let c = collector();
        let distinct: Vec<(&str, usize)> = distinct_cards(&c)
            .into_iter()
            .map(|(card, n)| (card.id.as_str(), n))
            .collect();
        assert_eq!(distinct, vec![("3", 2), ("10", 1), ("5", 1)]);
    }

    #[test]
    fn test_rarity_sort_puts_rarest_first() {
        let c = collector();
        let ids: Vec<&str> = sorted_entries(&c).iter().map(|e| e.card.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "5", "3"]);
    }

    #[test]
    fn test_favourites_come_first() {
        let mut c = collector();
        c.favorites = vec!["3".into()];
        c.harem_sort = HaremSort::Anime;
        let ids: Vec<&str> = sorted_entries(&c).iter().map(|e| e.card.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "5", "10"]);
    }

    #[test]
    fn test_render_harem_groups_and_pages() {
        let c = collector();
        let (text, page, total) = render_harem(&c, 4);
        assert_eq!((page, total), (0, 1));
        assert!(text.contains("Page 1/1"));
        assert!(text.contains("3 characters, 4 cards"));
        assert!(text.contains("🏵 <b>Mythic</b>"));
        assert!(text.contains("Rem (Re Zero) ×2"));
    }

    #[test]
    fn test_keyboard_navigation() {
        let kb = harem_keyboard(9, 1, 3);
        assert_eq!(kb.inline_keyboard[0].len(), 2);
        let single = harem_keyboard(9, 0, 1);
        assert_eq!(single.inline_keyboard.len(), 1);
    }
}
