//! Typed extractors for each page kind.
//!
//! Each extractor runs the matching descriptor from [`crate::descriptor`]
//! and maps raw field values into [`AnimeSummary`] or [`AnimeListEntry`]
//! records, deriving slugs against the configured base URL.

use crate::descriptor::{self, GroupedDescriptor, RawRecord, RecordDescriptor};
use crate::models::{AnimeListEntry, AnimeSummary, CardKind};
use crate::normalize::{derive_id, parse_score};
use crate::parse::Document;
use crate::Result;

/// Both card lists of the homepage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeLists {
    pub on_going: Vec<AnimeSummary>,
    pub complete: Vec<AnimeSummary>,
}

fn summary_from(record: &RawRecord, kind: CardKind, base_url: &str) -> AnimeSummary {
    let link = record.text("link");

    let (score, day_updated) = match kind {
        CardKind::Ongoing => (None, Some(record.text("day_updated"))),
        CardKind::Complete => (Some(parse_score(&record.text("score"))), None),
    };

    AnimeSummary {
        title: record.text("title"),
        id: derive_id(&link, base_url),
        thumbnail_url: record.text("thumbnail_url"),
        episode: record.text("episode"),
        uploaded_on: record.text("uploaded_on"),
        link,
        score,
        day_updated,
    }
}

/// Runs a card descriptor and maps every record to an [`AnimeSummary`].
pub fn extract_cards(
    doc: &Document, descriptor: &RecordDescriptor, kind: CardKind, base_url: &str,
) -> Result<Vec<AnimeSummary>> {
    let records = descriptor::extract_records(doc, descriptor)?;
    Ok(records.iter().map(|record| summary_from(record, kind, base_url)).collect())
}

/// Extracts the homepage: first `.venz` block as ongoing, second as complete.
///
/// Block order is trusted; if the site swaps them the lists are mislabeled.
pub fn extract_home(doc: &Document, base_url: &str) -> Result<HomeLists> {
    Ok(HomeLists {
        on_going: extract_cards(doc, &descriptor::HOME_ONGOING, CardKind::Ongoing, base_url)?,
        complete: extract_cards(doc, &descriptor::HOME_COMPLETE, CardKind::Complete, base_url)?,
    })
}

/// Extracts one page of a paginated listing.
///
/// A page past the end of the listing has no cards and yields an empty list.
pub fn extract_listing(doc: &Document, kind: CardKind, base_url: &str) -> Result<Vec<AnimeSummary>> {
    let descriptor = match kind {
        CardKind::Ongoing => &descriptor::ONGOING_PAGE,
        CardKind::Complete => &descriptor::COMPLETE_PAGE,
    };
    extract_cards(doc, descriptor, kind, base_url)
}

/// Extracts the alphabetical catalog with the default descriptor.
pub fn extract_anime_list(doc: &Document, base_url: &str) -> Result<Vec<AnimeListEntry>> {
    extract_anime_list_with(doc, &descriptor::ANIME_LIST, base_url)
}

/// Extracts a grouped catalog, tagging every row with its group's label.
///
/// Rows without a link or without a title are skipped.
pub fn extract_anime_list_with(
    doc: &Document, descriptor: &GroupedDescriptor, base_url: &str,
) -> Result<Vec<AnimeListEntry>> {
    let mut entries = Vec::new();

    for group in descriptor::extract_groups(doc, descriptor)? {
        for record in &group.records {
            let (Some(link), Some(title)) = (record.non_empty("link"), record.non_empty("title")) else {
                continue;
            };

            entries.push(AnimeListEntry {
                title: title.to_string(),
                full_title: record.non_empty("full_title").unwrap_or(title).to_string(),
                id: derive_id(link, base_url),
                link: link.to_string(),
                letter: group.label.clone(),
            });
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://otakudesu.best/";

    fn card(slug: &str, title: &str, badge: &str) -> String {
        format!(
            r#"<li><div class="detpost">
                <div class="epz"><i class="fa fa-play"></i> Episode 12</div>
                <div class="epztipe"><i class="fa fa-star"></i>{badge}</div>
                <div class="newnime">11 Okt</div>
                <div class="thumb"><a href="https://otakudesu.best/anime/{slug}/">
                    <div class="thumbz"><img src="https://cdn.example/{slug}.jpg"><h2 class="jdlflm">{title}</h2></div>
                </a></div>
            </div></li>"#
        )
    }

    fn home(ongoing: &[String], complete: &[String]) -> String {
        format!(
            r#"<html><body><div class="venz">
                <div class="rapi"><ul>{}</ul></div>
                <div class="rapi"><ul>{}</ul></div>
            </div></body></html>"#,
            ongoing.concat(),
            complete.concat()
        )
    }

    #[test]
    fn test_extract_home_splits_blocks() {
        let html = home(
            &[card("one-piece", "One Piece", " Minggu")],
            &[card("bleach", "Bleach", " 8.12"), card("k-on", "K-On!", " ")],
        );
        let doc = Document::parse(&html);
        let lists = extract_home(&doc, BASE).unwrap();

        assert_eq!(lists.on_going.len(), 1);
        assert_eq!(lists.complete.len(), 2);

        let ongoing = &lists.on_going[0];
        assert_eq!(ongoing.id, "one-piece");
        assert_eq!(ongoing.title, "One Piece");
        assert_eq!(ongoing.episode, "Episode 12");
        assert_eq!(ongoing.day_updated.as_deref(), Some("Minggu"));
        assert_eq!(ongoing.thumbnail_url, "https://cdn.example/one-piece.jpg");
        assert!(ongoing.score.is_none());

        assert_eq!(lists.complete[0].score, Some(8.12));
        assert!(lists.complete[1].score.unwrap().is_nan());
        assert!(lists.complete[1].day_updated.is_none());
    }

    #[test]
    fn test_listing_past_the_end_is_empty() {
        let doc = Document::parse(r#"<div class="venz"><div class="rapi"><ul></ul></div></div>"#);
        assert!(extract_listing(&doc, CardKind::Complete, BASE).unwrap().is_empty());

        let doc = Document::parse("<html><body><h1>404</h1></body></html>");
        assert!(extract_listing(&doc, CardKind::Ongoing, BASE).unwrap().is_empty());
    }

    #[test]
    fn test_card_without_anchor_keeps_empty_fields() {
        let html = r#"<div class="venz"><div><ul><li><div class="epztipe"> 9</div></li></ul></div></div>"#;
        let doc = Document::parse(html);
        let cards = extract_listing(&doc, CardKind::Complete, BASE).unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].link, "");
        assert_eq!(cards[0].id, "");
        assert_eq!(cards[0].score, Some(9.0));
    }

    #[test]
    fn test_anime_list_skips_incomplete_rows() {
        let html = r##"
            <div class="bariskelom">
                <div class="barispenz"><a name="#">#</a></div>
                <div class="jdlbar"><ul>
                    <li><a href="https://otakudesu.best/anime/86-sub-indo/" title="86 Eighty Six">86</a></li>
                    <li><a>No link</a></li>
                    <li><a href="https://otakudesu.best/anime/blank/">  </a></li>
                    <li><a href="https://otakudesu.best/anime/91-days/" title="">91 Days</a></li>
                </ul></div>
            </div>
        "##;
        let doc = Document::parse(html);
        let entries = extract_anime_list(&doc, BASE).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "86-sub-indo");
        assert_eq!(entries[0].full_title, "86 Eighty Six");
        assert_eq!(entries[0].letter, "#");
        assert_eq!(entries[1].full_title, "91 Days");
    }
}
