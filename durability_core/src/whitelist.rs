//! Whitelist - Tag-based allow-list deciding which entries the features touch

use crate::types::{tags, TagSet, Tagged};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separators accepted in the persisted tag string (ASCII and full-width comma)
const TAG_SEPARATORS: [char; 2] = [',', '，'];

/// Allow-list of tags. An empty whitelist means "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Whitelist {
    tags: TagSet,
}

impl Whitelist {
    /// Create a whitelist from any collection of tag names
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Whitelist {
            tags: tags
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    /// A whitelist that lets every durability-using entry through
    pub fn allow_all() -> Self {
        Whitelist {
            tags: TagSet::new(),
        }
    }

    /// Parse the persisted comma-separated form.
    ///
    /// Both `,` and `，` separate tokens; tokens are trimmed and empty ones dropped,
    /// so `"Weapon， Armor,,"` yields `{Armor, Weapon}`.
    pub fn parse(input: &str) -> Self {
        Self::new(
            input
                .split(&TAG_SEPARATORS[..])
                .map(str::trim)
                .filter(|t| !t.is_empty()),
        )
    }

    /// True when no tags are configured
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Whether any of the given tags is whitelisted
    pub fn intersects(&self, tags: &TagSet) -> bool {
        // Iterate the smaller set
        if tags.len() <= self.tags.len() {
            tags.iter().any(|t| self.tags.contains(t))
        } else {
            self.tags.iter().any(|t| tags.contains(t))
        }
    }

    /// Eligibility of a catalog entry or item instance
    pub fn is_eligible<T: Tagged + ?Sized>(&self, item: &T) -> bool {
        if self.tags.is_empty() {
            return item.uses_durability();
        }
        self.intersects(item.tags())
    }
}

impl Default for Whitelist {
    fn default() -> Self {
        Whitelist::new([tags::WEAPON, tags::ARMOR])
    }
}

impl fmt::Display for Whitelist {
    /// Persisted form: tags joined by ASCII comma
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        write!(f, "{}", joined.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tag_set;

    struct Probe {
        uses_durability: bool,
        tags: TagSet,
    }

    impl Tagged for Probe {
        fn uses_durability(&self) -> bool {
            self.uses_durability
        }
        fn tags(&self) -> &TagSet {
            &self.tags
        }
    }

    fn probe(tags: &[&str]) -> Probe {
        Probe {
            uses_durability: true,
            tags: tag_set(tags.iter().copied()),
        }
    }

    #[test]
    fn test_empty_whitelist_allows_untagged() {
        let whitelist = Whitelist::allow_all();
        assert!(whitelist.is_eligible(&probe(&[])));
    }

    #[test]
    fn test_empty_whitelist_still_requires_durability() {
        let whitelist = Whitelist::allow_all();
        let item = Probe {
            uses_durability: false,
            tags: TagSet::new(),
        };
        assert!(!whitelist.is_eligible(&item));
    }

    #[test]
    fn test_unrelated_tags_rejected() {
        let whitelist = Whitelist::new(["Weapon", "Armor"]);
        assert!(!whitelist.is_eligible(&probe(&["Food"])));
    }

    #[test]
    fn test_matching_tag_accepted() {
        let whitelist = Whitelist::new(["Weapon"]);
        assert!(whitelist.is_eligible(&probe(&["Weapon"])));
        assert!(whitelist.is_eligible(&probe(&["Repairable", "Weapon", "Gun"])));
    }

    #[test]
    fn test_untagged_item_with_filter_rejected() {
        let whitelist = Whitelist::default();
        assert!(!whitelist.is_eligible(&probe(&[])));
    }

    #[test]
    fn test_parse_mixed_separators() {
        let whitelist = Whitelist::parse(" Weapon，Armor , Helmat,,  ");
        assert_eq!(whitelist.tags().len(), 3);
        assert!(whitelist.tags().contains("Helmat"));
        assert!(whitelist.tags().contains("Armor"));
    }

    #[test]
    fn test_parse_blank_is_allow_all() {
        assert!(Whitelist::parse("  ， , ").is_empty());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let whitelist = Whitelist::new(["Weapon", "Armor"]);
        assert_eq!(whitelist.to_string(), "Armor,Weapon");
        assert_eq!(Whitelist::parse(&whitelist.to_string()), whitelist);
    }
}
