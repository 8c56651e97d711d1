//! Game logic: guess matching, spawn selection and in-memory state.
//!
//! Nothing in here touches Telegram or MongoDB.

pub mod matcher;
pub mod pending;
pub mod spam;
pub mod spawn;
pub mod state;

pub use pending::{PendingGift, PendingGifts, PendingTrade, PendingTrades};
pub use spam::{SpamCheck, SpamGuard};
pub use state::{ClaimOutcome, GameState};
