//! # Almanac Lookup Tables
//!
//! Date-based lookups shown on the result screen of the app: the Slavic
//! chertog (hall of the Svarog circle with its patron deity), the
//! Zoroastrian birth-year totem, and the western zodiac sign.
//!
//! All tables are fixed data; the only logic is boundary handling. The
//! Zoroastrian year rolls over on 21 March, so a birthday before that date
//! uses the previous year's totem.

use crate::error::{PromoError, PromoResult};
use chrono::NaiveDate;
use serde::Serialize;

/// A hall of the Svarog circle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chertog {
    /// Hall name, e.g. "Чертог Ворона"
    pub name: &'static str,
    /// Patron deity, e.g. "Коляда"
    pub deity: &'static str,
}

/// Western zodiac sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ZodiacSign(pub &'static str);

/// Combined almanac entry for a birth date
#[derive(Debug, Clone, Serialize)]
pub struct Almanac {
    pub zodiac: ZodiacSign,
    pub hall: Chertog,
    pub totem: &'static str,
}

// Halls in calendar order by start date (month, day). A hall runs from its
// start date inclusive to the next hall's start date exclusive; the last
// entry wraps across the new year.
const CHERTOGS: &[(u32, u32, &str, &str)] = &[
    (1, 8, "Чертог Медведя", "Сварог"),
    (2, 1, "Чертог Бусла", "Род"),
    (2, 25, "Чертог Волка", "Велес"),
    (3, 22, "Чертог Лисы", "Марена"),
    (4, 15, "Чертог Тура", "Крышень"),
    (5, 7, "Чертог Лося", "Лада"),
    (5, 30, "Чертог Финиста", "Вышень"),
    (6, 21, "Чертог Коня", "Купала"),
    (7, 13, "Чертог Орла", "Перун"),
    (8, 4, "Чертог Раса", "Тарх"),
    (8, 28, "Чертог Девы", "Джива"),
    (9, 20, "Чертог Вепря", "Рамхат"),
    (10, 12, "Чертог Щуки", "Рожана"),
    (11, 3, "Чертог Лебедя", "Макошь"),
    (11, 24, "Чертог Змея", "Семаргл"),
    (12, 17, "Чертог Ворона", "Коляда"),
];

// Zodiac signs by start date (month, day), wrapping like the halls.
const ZODIAC: &[(u32, u32, &str)] = &[
    (1, 20, "Водолей"),
    (2, 19, "Рыбы"),
    (3, 21, "Овен"),
    (4, 20, "Телец"),
    (5, 21, "Близнецы"),
    (6, 21, "Рак"),
    (7, 23, "Лев"),
    (8, 23, "Дева"),
    (9, 23, "Весы"),
    (10, 23, "Скорпион"),
    (11, 22, "Стрелец"),
    (12, 22, "Козерог"),
];

// 32-year Zoroastrian totem cycle, anchored so that 1906 is the Deer year.
const TOTEMS: &[&str] = &[
    "Олень",
    "Баран",
    "Мангуст",
    "Волк",
    "Аист",
    "Паук",
    "Уж",
    "Бобр",
    "Черепаха",
    "Сорока",
    "Белка",
    "Ворон",
    "Петух",
    "Тур",
    "Барсук",
    "Верблюд",
    "Ёж",
    "Лань",
    "Слон",
    "Конь",
    "Гепард",
    "Павлин",
    "Лебедь",
    "Рысь",
    "Осёл",
    "Белый медведь",
    "Орёл",
    "Лисица",
    "Дельфин",
    "Вепрь",
    "Сова",
    "Сокол",
];

const TOTEM_ANCHOR_YEAR: i32 = 1906;

/// Slavic hall for a day and month
pub fn chertog_for(day: u32, month: u32) -> Chertog {
    let key = (month, day);
    let entry = CHERTOGS
        .iter()
        .rev()
        .find(|(m, d, _, _)| (*m, *d) <= key)
        // Dates before the first start of the year belong to the hall
        // that wraps from December.
        .unwrap_or_else(|| CHERTOGS.last().expect("chertog table is non-empty"));
    Chertog {
        name: entry.2,
        deity: entry.3,
    }
}

/// Western zodiac sign for a day and month
pub fn zodiac_for(day: u32, month: u32) -> ZodiacSign {
    let key = (month, day);
    let entry = ZODIAC
        .iter()
        .rev()
        .find(|(m, d, _)| (*m, *d) <= key)
        .unwrap_or_else(|| ZODIAC.last().expect("zodiac table is non-empty"));
    ZodiacSign(entry.2)
}

/// Zoroastrian totem for a birth date. The cycle year starts on 21 March.
pub fn totem_for(year: i32, month: u32, day: u32) -> &'static str {
    let effective_year = if (month, day) < (3, 21) { year - 1 } else { year };
    let idx = (effective_year - TOTEM_ANCHOR_YEAR).rem_euclid(32) as usize;
    TOTEMS[idx]
}

impl Almanac {
    /// Compute the full almanac entry for a birth date.
    /// Rejects impossible calendar dates.
    pub fn for_date(day: u32, month: u32, year: i32) -> PromoResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            PromoError::InvalidRequest(format!("not a valid date: {:02}.{:02}.{}", day, month, year))
        })?;

        Ok(Self {
            zodiac: zodiac_for(day, month),
            hall: chertog_for(day, month),
            totem: totem_for(year, month, day),
        })
    }
}
