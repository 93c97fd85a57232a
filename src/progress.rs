//! Persistent player progress and the character shop
//!
//! One LocalStorage blob holds coins, the unlocked-level frontier and the
//! character roster state. Loading never fails: malformed or missing data
//! falls back to defaults, and `sanitize` re-establishes the invariants
//! after every deserialization.

use serde::{Deserialize, Serialize};

use crate::consts::TOTAL_LEVELS;

/// Number of playable characters
pub const CHARACTER_COUNT: usize = 5;

/// A shop roster entry
#[derive(Debug, Clone, Copy)]
pub struct Character {
    pub name: &'static str,
    /// Armor tint used by the presentation layer
    pub color: &'static str,
    pub price: u64,
}

/// The fixed roster; index 0 is the free starter
pub const CHARACTERS: [Character; CHARACTER_COUNT] = [
    Character {
        name: "Soldier",
        color: "cyan",
        price: 0,
    },
    Character {
        name: "Red Force",
        color: "red",
        price: 600,
    },
    Character {
        name: "Green Hero",
        color: "lime",
        price: 1200,
    },
    Character {
        name: "Shadow Ops",
        color: "orange",
        price: 2400,
    },
    Character {
        name: "Cyber X",
        color: "magenta",
        price: 4800,
    },
];

fn default_unlocked_level() -> u32 {
    1
}

fn default_unlocked_chars() -> [bool; CHARACTER_COUNT] {
    let mut chars = [false; CHARACTER_COUNT];
    chars[0] = true;
    chars
}

/// Persisted player progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub coins: u64,
    /// Highest level the player may enter, 1..=TOTAL_LEVELS, monotonically
    /// non-decreasing within a session
    #[serde(default = "default_unlocked_level")]
    pub unlocked_level: u32,
    #[serde(default = "default_unlocked_chars")]
    pub unlocked_chars: [bool; CHARACTER_COUNT],
    #[serde(default)]
    pub selected_char: usize,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            coins: 0,
            unlocked_level: default_unlocked_level(),
            unlocked_chars: default_unlocked_chars(),
            selected_char: 0,
        }
    }
}

impl Progress {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pixel_commando_save";

    /// Re-establish invariants after deserializing untrusted data:
    /// the starter is always owned, the frontier stays in range, and the
    /// selected character must be owned.
    pub fn sanitize(&mut self) {
        self.unlocked_chars[0] = true;
        self.unlocked_level = self.unlocked_level.clamp(1, TOTAL_LEVELS);
        if self.selected_char >= CHARACTER_COUNT || !self.unlocked_chars[self.selected_char] {
            self.selected_char = 0;
        }
    }

    /// Shop interaction: equip an owned character, or buy it when the
    /// balance covers the price. Returns true if anything changed.
    pub fn select_or_buy(&mut self, index: usize) -> bool {
        let Some(character) = CHARACTERS.get(index) else {
            return false;
        };
        if self.unlocked_chars[index] {
            if self.selected_char == index {
                return false;
            }
            self.selected_char = index;
            true
        } else if self.coins >= character.price {
            self.coins -= character.price;
            self.unlocked_chars[index] = true;
            self.selected_char = index;
            true
        } else {
            false
        }
    }

    /// Parse a persisted blob, falling back to defaults on any damage
    pub fn from_json(json: &str) -> Self {
        let mut progress: Self = serde_json::from_str(json).unwrap_or_default();
        progress.sanitize();
        progress
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }

    /// Load progress from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                let progress = Self::from_json(&json);
                log::info!(
                    "Loaded progress: {} coins, level {} unlocked",
                    progress.coins,
                    progress.unlocked_level
                );
                return progress;
            }
        }

        log::info!("No saved progress, starting fresh");
        Self::default()
    }

    /// Save progress to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.to_json());
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn round_trip_preserves_progress() {
        let progress = Progress {
            coins: 1234,
            unlocked_level: 17,
            unlocked_chars: [true, true, false, true, false],
            selected_char: 3,
        };
        assert_eq!(Progress::from_json(&progress.to_json()), progress);
    }

    #[test]
    fn malformed_blob_falls_back_to_defaults() {
        assert_eq!(Progress::from_json("not json at all"), Progress::default());
        assert_eq!(Progress::from_json(""), Progress::default());
    }

    #[test]
    fn missing_fields_get_defaults() {
        let progress = Progress::from_json(r#"{"coins": 50}"#);
        assert_eq!(progress.coins, 50);
        assert_eq!(progress.unlocked_level, 1);
        assert!(progress.unlocked_chars[0]);
        assert_eq!(progress.selected_char, 0);
    }

    #[test]
    fn sanitize_repairs_broken_invariants() {
        let mut progress = Progress {
            coins: 0,
            unlocked_level: 9999,
            unlocked_chars: [false; CHARACTER_COUNT],
            selected_char: 4,
        };
        progress.sanitize();
        assert!(progress.unlocked_chars[0]);
        assert_eq!(progress.unlocked_level, TOTAL_LEVELS);
        // Selected character pointed at a locked slot
        assert_eq!(progress.selected_char, 0);
    }

    #[test]
    fn buying_deducts_and_equips() {
        let mut progress = Progress {
            coins: 700,
            ..Progress::default()
        };
        assert!(progress.select_or_buy(1));
        assert_eq!(progress.coins, 100);
        assert!(progress.unlocked_chars[1]);
        assert_eq!(progress.selected_char, 1);
    }

    #[test]
    fn unaffordable_character_is_refused() {
        let mut progress = Progress {
            coins: 100,
            ..Progress::default()
        };
        assert!(!progress.select_or_buy(2));
        assert_eq!(progress.coins, 100);
        assert!(!progress.unlocked_chars[2]);
        assert_eq!(progress.selected_char, 0);
    }

    #[test]
    fn owned_character_equips_for_free() {
        let mut progress = Progress::default();
        progress.unlocked_chars[2] = true;
        assert!(progress.select_or_buy(2));
        assert_eq!(progress.coins, 0);
        assert_eq!(progress.selected_char, 2);
        // Re-selecting is a no-op
        assert!(!progress.select_or_buy(2));
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut progress = Progress::default();
        assert!(!progress.select_or_buy(CHARACTER_COUNT));
    }

    proptest! {
        #[test]
        fn arbitrary_valid_progress_round_trips(
            coins in 0u64..1_000_000,
            unlocked_level in 1u32..=TOTAL_LEVELS,
            owned in proptest::array::uniform4(proptest::bool::ANY),
            selected in 0usize..CHARACTER_COUNT,
        ) {
            let mut unlocked_chars = [true; CHARACTER_COUNT];
            unlocked_chars[1..].copy_from_slice(&owned);
            let mut progress = Progress { coins, unlocked_level, unlocked_chars, selected_char: selected };
            progress.sanitize();
            prop_assert_eq!(Progress::from_json(&progress.to_json()), progress);
        }
    }
}
