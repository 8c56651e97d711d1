//! Event handler system.
//!
//! Group messages that are not commands feed the spawn counter.

pub mod counter;
pub mod spawner;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

/// Build the message event handler.
pub fn message_event_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(|msg: Message| {
        let is_group = msg.chat.is_group() || msg.chat.is_supergroup();
        let is_command = msg.text().is_some_and(|t| t.starts_with('/'));
        is_group && !is_command && msg.from.is_some()
    })
    .endpoint(counter::message_counter)
}
