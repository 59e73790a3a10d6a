//! # Access Kinds and Code Minting
//!
//! The two paid features of the app and the promo codes that unlock them.
//! Codes look like `RUNE-K7NQ-M3WZ` on the wire and are stored lower-cased.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Alphabet for code segments. Excludes `I`, `O`, `0` and `1`, which are
/// too easy to confuse when a customer retypes the code from a Telegram
/// message.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

const SEGMENT_LEN: usize = 4;

/// The paid feature a promo code unlocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    /// Amulet sketch generator, limited number of generations
    Sketch,
    /// Four-card master spread, single session
    MasterSpread,
}

impl AccessKind {
    /// Wire/database identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessKind::Sketch => "sketch",
            AccessKind::MasterSpread => "master_spread",
        }
    }

    /// Parse the wire/database identifier
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sketch" => Some(AccessKind::Sketch),
            "master_spread" => Some(AccessKind::MasterSpread),
            _ => None,
        }
    }

    /// Per-code usage limit. `None` means unlimited within the session.
    pub fn use_limit(&self) -> Option<i32> {
        match self {
            AccessKind::Sketch => Some(5),
            AccessKind::MasterSpread => None,
        }
    }

    /// Human-readable service name used in customer notifications
    pub fn service_name(&self) -> &'static str {
        match self {
            AccessKind::Sketch => "Генератор Эскизов (5 шт)",
            AccessKind::MasterSpread => "Мастерский Расклад (4 карты)",
        }
    }
}

impl std::fmt::Display for AccessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mint a fresh promo code: `RUNE-XXXX-XXXX` with segments drawn from
/// [`CODE_ALPHABET`]. Two segments of a 32-character alphabet give 2^40
/// combinations, plenty for a store that issues a handful of codes a day.
pub fn mint_code() -> String {
    let mut rng = rand::thread_rng();
    let mut segment = || -> String {
        (0..SEGMENT_LEN)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect()
    };
    let first = segment();
    let second = segment();
    format!("RUNE-{}-{}", first, second)
}

/// Normalize user-entered or freshly minted codes for storage and lookup
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}
