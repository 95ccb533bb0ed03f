//! Grouping and search over the alphabetical catalog.
//!
//! Both operate on a freshly extracted list; nothing is indexed or cached
//! between requests.

use serde::Serialize;
use serde::ser::SerializeMap;

use crate::models::{AnimeListEntry, GroupedEntry};

/// Entries bucketed by letter, in first-seen letter order.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterGroups {
    groups: Vec<(String, Vec<GroupedEntry>)>,
}

impl LetterGroups {
    /// Number of distinct letters.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, letter: &str) -> Option<&[GroupedEntry]> {
        self.groups.iter().find(|(key, _)| key == letter).map(|(_, entries)| entries.as_slice())
    }

    pub fn letters(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(letter, _)| letter.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[GroupedEntry])> {
        self.groups.iter().map(|(letter, entries)| (letter.as_str(), entries.as_slice()))
    }
}

impl Serialize for LetterGroups {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (letter, entries) in &self.groups {
            map.serialize_entry(letter, entries)?;
        }
        map.end()
    }
}

/// Groups entries by their `letter`, dropping the letter from each entry.
pub fn group_by_letter(entries: &[AnimeListEntry]) -> LetterGroups {
    let mut groups: Vec<(String, Vec<GroupedEntry>)> = Vec::new();

    for entry in entries {
        match groups.iter_mut().find(|(letter, _)| *letter == entry.letter) {
            Some((_, bucket)) => bucket.push(GroupedEntry::from(entry)),
            None => groups.push((entry.letter.clone(), vec![GroupedEntry::from(entry)])),
        }
    }

    LetterGroups { groups }
}

/// Lowercases and trims a raw search query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Case-insensitive substring search over titles and slugs.
///
/// Results whose title or slug equals the query come first, in input order.
/// The rest follow ordered by title length, shortest first; ties keep input
/// order.
pub fn search(entries: &[AnimeListEntry], query: &str) -> Vec<AnimeListEntry> {
    let query = normalize_query(query);

    let mut hits: Vec<(bool, usize, &AnimeListEntry)> = entries
        .iter()
        .filter_map(|entry| {
            let title = entry.title.to_lowercase();
            let id = entry.id.to_lowercase();
            if !title.contains(&query) && !id.contains(&query) {
                return None;
            }
            let exact = title == query || id == query;
            Some((exact, entry.title.chars().count(), entry))
        })
        .collect();

    // stable: equal keys keep input order
    hits.sort_by_key(|&(exact, len, _)| if exact { (0, 0) } else { (1, len) });

    hits.into_iter().map(|(_, _, entry)| entry.clone()).collect()
}
