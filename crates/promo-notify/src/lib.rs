//! # promo-notify
//!
//! Best-effort customer notifications for obereg-gate.
//!
//! After a code is minted the customer hears about it twice: a Telegram
//! message to the chat id the payment carried, and an email when the payer
//! left one. Both sends are fire-and-forget; a failure is logged and
//! swallowed so the provider webhook still gets its 200. Without a
//! configured token or API key each notifier degrades to a log line, which
//! is the local-development mode.

pub mod email;
pub mod message;
pub mod telegram;

pub use email::EmailNotifier;
pub use message::payment_confirmed_message;
pub use telegram::TelegramNotifier;
