//! Localized display strings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Text keys used by the engine
pub mod text_keys {
    pub const MAX_DURABILITY: &str = "UI_MaxDurability";
    pub const RESTORE_TOGGLE: &str = "UI_RestoreToggle";
    pub const SETTINGS_GROUP: &str = "Settings_Group_Title";
    pub const SETTING_MULTIPLIER: &str = "Setting_DurabilityMultiplier";
    pub const SETTING_NO_LOSS: &str = "Setting_NoMaxDurabilityLoss";
    pub const SETTING_RESTORE: &str = "Setting_RestoreMaxDurability";
    pub const SETTING_RESTORE_COST: &str = "Setting_RestoreCostMultiplier";
    pub const SETTING_WHITELIST: &str = "Setting_WhitelistedTags";
}

/// Resolves display text; purely cosmetic
pub trait Localizer {
    fn get_text(&self, key: &str, fallback: &str) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    ChineseSimplified,
    ChineseTraditional,
    Japanese,
    Korean,
    Russian,
}

/// Order tried after the current language
const FALLBACK_LANGUAGES: [Language; 2] = [Language::English, Language::ChineseSimplified];

/// Per-language key/value tables
#[derive(Debug, Clone)]
pub struct StringTable {
    current: Language,
    tables: HashMap<Language, HashMap<String, String>>,
}

impl StringTable {
    pub fn new(current: Language) -> Self {
        StringTable {
            current,
            tables: HashMap::new(),
        }
    }

    /// Table with the built-in English and Simplified Chinese strings
    pub fn with_defaults(current: Language) -> Self {
        use text_keys::*;

        let mut table = StringTable::new(current);
        table.insert_all(
            Language::English,
            [
                (MAX_DURABILITY, "Max Durability"),
                (RESTORE_TOGGLE, "Restore Max"),
                (SETTINGS_GROUP, "More Durability"),
                (SETTING_MULTIPLIER, "Durability multiplier"),
                (SETTING_NO_LOSS, "Repairs keep max durability"),
                (SETTING_RESTORE, "Repairs restore max durability"),
                (SETTING_RESTORE_COST, "Restore price multiplier"),
                (SETTING_WHITELIST, "Affected tags (comma separated)"),
            ],
        );
        table.insert_all(
            Language::ChineseSimplified,
            [
                (MAX_DURABILITY, "耐久上限"),
                (RESTORE_TOGGLE, "恢复上限"),
                (SETTINGS_GROUP, "更多耐久"),
                (SETTING_MULTIPLIER, "物品耐久度倍率"),
                (SETTING_NO_LOSS, "维修不掉耐久度上限"),
                (SETTING_RESTORE, "维修恢复满耐久度上限"),
                (SETTING_RESTORE_COST, "恢复上限价格倍率"),
                (SETTING_WHITELIST, "生效标签（逗号分隔）"),
            ],
        );
        table
    }

    pub fn current(&self) -> Language {
        self.current
    }

    /// Switch language (host language change event)
    pub fn set_language(&mut self, language: Language) {
        if language != self.current {
            log::info!("Localization language set to {:?}", language);
            self.current = language;
        }
    }

    pub fn insert(&mut self, language: Language, key: &str, text: &str) {
        self.tables
            .entry(language)
            .or_default()
            .insert(key.to_string(), text.to_string());
    }

    pub fn insert_all<'k, I>(&mut self, language: Language, entries: I)
    where
        I: IntoIterator<Item = (&'k str, &'k str)>,
    {
        for (key, text) in entries {
            self.insert(language, key, text);
        }
    }

    fn lookup(&self, language: Language, key: &str) -> Option<&str> {
        self.tables
            .get(&language)
            .and_then(|t| t.get(key))
            .map(String::as_str)
    }
}

impl Default for StringTable {
    fn default() -> Self {
        StringTable::with_defaults(Language::English)
    }
}

impl Localizer for StringTable {
    fn get_text(&self, key: &str, fallback: &str) -> String {
        std::iter::once(self.current)
            .chain(FALLBACK_LANGUAGES)
            .find_map(|language| self.lookup(language, key))
            .unwrap_or(fallback)
            .to_string()
    }
}
