//! Payload shapes and envelope builders for each page kind.

use serde::Serialize;

use crate::aggregate::{LetterGroups, group_by_letter};
use crate::catalog::SearchResults;
use crate::extract::HomeLists;
use crate::formatters::Envelope;
use crate::models::{AnimeListEntry, AnimeSummary, CardKind};

/// One homepage list with its length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub total: usize,
    pub list: Vec<AnimeSummary>,
}

impl From<Vec<AnimeSummary>> for Section {
    fn from(list: Vec<AnimeSummary>) -> Self {
        Self { total: list.len(), list }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeData {
    pub on_going: Section,
    pub complete: Section,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingData {
    pub anime_list: Vec<AnimeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimeListData {
    pub anime_list: Vec<AnimeListEntry>,
    pub grouped_by_letter: LetterGroups,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchData {
    pub search_results: Vec<AnimeListEntry>,
}

pub fn home(lists: HomeLists, source_url: &str) -> Envelope<HomeData> {
    let data = HomeData { on_going: lists.on_going.into(), complete: lists.complete.into() };
    Envelope::success("Homepage data retrieved successfully", data).with_meta("source_url", source_url)
}

/// Message used when a listing page cannot be fetched.
pub fn listing_error_message(kind: CardKind) -> &'static str {
    match kind {
        CardKind::Complete => "Failed to fetch complete anime list",
        CardKind::Ongoing => "Failed to fetch ongoing anime list",
    }
}

/// A listing page with pagination hints.
///
/// An empty page is treated as the end of the listing: `has_next_page` is
/// false and `next_page` is null. The same holds for the last representable
/// page number.
pub fn listing(kind: CardKind, cards: Vec<AnimeSummary>, page: u64, source_url: &str) -> Envelope<ListingData> {
    let message = match kind {
        CardKind::Complete => "Complete anime list retrieved successfully",
        CardKind::Ongoing => "Ongoing anime list retrieved successfully",
    };
    let total = cards.len();
    let next_page = if total > 0 { page.checked_add(1) } else { None };

    Envelope::success(message, ListingData { anime_list: cards })
        .with_meta("current_page", page)
        .with_meta("total_items", total)
        .with_meta("source_url", source_url)
        .with_meta("has_next_page", next_page.is_some())
        .with_meta("next_page", next_page)
}

/// The full catalog, flat and grouped by letter.
pub fn anime_list(entries: Vec<AnimeListEntry>, source_url: &str) -> Envelope<AnimeListData> {
    let grouped_by_letter = group_by_letter(&entries);
    let total_anime = entries.len();
    let total_letters = grouped_by_letter.len();

    Envelope::success("All anime list retrieved successfully", AnimeListData { anime_list: entries, grouped_by_letter })
        .with_meta("source_url", source_url)
        .with_meta("total_anime", total_anime)
        .with_meta("total_letters", total_letters)
}

pub fn search(found: SearchResults) -> Envelope<SearchData> {
    let total = found.results.len();
    let message = if total > 0 {
        format!("Found {} anime matching \"{}\"", total, found.query)
    } else {
        format!("No anime found matching \"{}\"", found.query)
    };

    Envelope::success(message, SearchData { search_results: found.results })
        .with_meta("query", &found.query)
        .with_meta("total_results", total)
        .with_meta("total_anime_checked", found.total_checked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str) -> AnimeSummary {
        AnimeSummary { title: title.to_string(), ..Default::default() }
    }

    fn entry(title: &str, letter: &str) -> AnimeListEntry {
        AnimeListEntry {
            title: title.to_string(),
            full_title: title.to_string(),
            id: title.to_lowercase(),
            link: String::new(),
            letter: letter.to_string(),
        }
    }

    #[test]
    fn test_home_totals_match_lists() {
        let lists = HomeLists { on_going: vec![card("a"), card("b")], complete: vec![card("c")] };
        let json = serde_json::to_value(home(lists, "https://otakudesu.test/")).unwrap();

        assert_eq!(json["data"]["on_going"]["total"], 2);
        assert_eq!(json["data"]["complete"]["total"], 1);
        assert_eq!(json["meta"]["source_url"], "https://otakudesu.test/");
    }

    #[test]
    fn test_listing_pagination_hints() {
        let json = serde_json::to_value(listing(CardKind::Complete, vec![card("a")], 3, "u")).unwrap();
        assert_eq!(json["meta"]["current_page"], 3);
        assert_eq!(json["meta"]["has_next_page"], true);
        assert_eq!(json["meta"]["next_page"], 4);

        let json = serde_json::to_value(listing(CardKind::Ongoing, Vec::new(), 9, "u")).unwrap();
        assert_eq!(json["message"], "Ongoing anime list retrieved successfully");
        assert_eq!(json["meta"]["total_items"], 0);
        assert_eq!(json["meta"]["has_next_page"], false);
        assert!(json["meta"]["next_page"].is_null());
    }

    #[test]
    fn test_listing_last_page_number_has_no_next() {
        let json = serde_json::to_value(listing(CardKind::Complete, vec![card("a")], u64::MAX, "u")).unwrap();

        assert_eq!(json["meta"]["current_page"], u64::MAX);
        assert_eq!(json["meta"]["total_items"], 1);
        assert_eq!(json["meta"]["has_next_page"], false);
        assert!(json["meta"]["next_page"].is_null());
    }

    #[test]
    fn test_anime_list_counts() {
        let entries = vec![entry("Akira", "A"), entry("Air", "A"), entry("Bleach", "B")];
        let json = serde_json::to_value(anime_list(entries, "u")).unwrap();

        assert_eq!(json["meta"]["total_anime"], 3);
        assert_eq!(json["meta"]["total_letters"], 2);
        assert_eq!(json["data"]["grouped_by_letter"]["A"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_search_messages() {
        let hit = SearchResults { query: "air".to_string(), results: vec![entry("Air", "A")], total_checked: 3 };
        let json = serde_json::to_value(search(hit)).unwrap();
        assert_eq!(json["message"], "Found 1 anime matching \"air\"");
        assert_eq!(json["meta"]["total_anime_checked"], 3);

        let miss = SearchResults { query: "zzz".to_string(), results: Vec::new(), total_checked: 3 };
        let json = serde_json::to_value(search(miss)).unwrap();
        assert_eq!(json["message"], "No anime found matching \"zzz\"");
        assert_eq!(json["meta"]["total_results"], 0);
    }
}
