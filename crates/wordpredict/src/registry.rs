use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use wordfreq_table::{ParseError, WordTable};

/// Wordlist served when no `WORDLIST` override is given.
pub const DEFAULT_WORDLIST: &str = "333k";

// Datasets are embedded at build time; there is no runtime filesystem access.
// Identifiers name the corpus tier each excerpt was cut from.
const UNIGRAM_333K: &str = include_str!("../assets/wordlists/unigram_333k.csv");
const TOP_100K: &str = include_str!("../assets/wordlists/top_100k.csv");
const TOP_10K: &str = include_str!("../assets/wordlists/top_10k.csv");

/// The fixed set of selectable wordlists, keyed by identifier.
///
/// Selection re-parses the raw text every time rather than caching parsed
/// tables: a switch can then never observe a stale table, at the cost of one
/// linear parse per toggle.
pub struct WordlistRegistry {
    lists: Vec<Wordlist>,
}

struct Wordlist {
    id: &'static str,
    raw: &'static str,
}

impl WordlistRegistry {
    /// Registry over the embedded datasets, in UI display order.
    pub fn builtin() -> Self {
        Self {
            lists: vec![
                Wordlist {
                    id: "333k",
                    raw: UNIGRAM_333K,
                },
                Wordlist {
                    id: "100k",
                    raw: TOP_100K,
                },
                Wordlist {
                    id: "10k",
                    raw: TOP_10K,
                },
            ],
        }
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.lists.iter().map(|l| l.id).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lists.iter().any(|l| l.id == id)
    }

    /// Parse the wordlist named `id`. `None` for an unknown identifier;
    /// `Some(Err(_))` when the embedded text is structurally unreadable.
    pub fn load(&self, id: &str) -> Option<Result<Arc<WordTable>, ParseError>> {
        let list = self.lists.iter().find(|l| l.id == id)?;
        let start = Instant::now();
        let result = WordTable::parse(list.raw).map(|table| {
            info!(
                "parsed wordlist {} ({} records) in {} ms",
                list.id,
                table.len(),
                start.elapsed().as_millis()
            );
            Arc::new(table)
        });
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_ids_in_display_order() {
        let registry = WordlistRegistry::builtin();
        assert_eq!(registry.ids(), ["333k", "100k", "10k"]);
        assert!(registry.contains(DEFAULT_WORDLIST));
    }

    #[test]
    fn loads_every_builtin_wordlist() {
        let registry = WordlistRegistry::builtin();
        for id in registry.ids() {
            let table = registry.load(id).expect("known id").expect("parses");
            assert!(!table.is_empty(), "wordlist {id} parsed empty");
        }
    }

    #[test]
    fn builtin_tiers_shrink_in_size() {
        let registry = WordlistRegistry::builtin();
        let sizes: Vec<usize> = registry
            .ids()
            .iter()
            .map(|id| registry.load(id).unwrap().unwrap().len())
            .collect();
        assert!(sizes[0] > sizes[1] && sizes[1] > sizes[2]);
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(WordlistRegistry::builtin().load("1M").is_none());
    }
}
