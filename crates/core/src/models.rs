//! Records produced by the extractors.
//!
//! Records live for one request: built from freshly fetched HTML, serialized
//! into the response, dropped.

use serde::Serialize;

/// One anime card from the homepage or a paginated listing.
///
/// Ongoing cards carry `day_updated`, complete cards carry `score`. Neither
/// field is serialized when absent. A score whose text did not parse is
/// `NaN`, which serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnimeSummary {
    pub title: String,
    /// Slug derived from `link`.
    pub id: String,
    pub thumbnail_url: String,
    pub episode: String,
    pub uploaded_on: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_updated: Option<String>,
}

/// One row of the alphabetical catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimeListEntry {
    pub title: String,
    /// The anchor's `title` attribute, or `title` when that is missing.
    pub full_title: String,
    pub id: String,
    pub link: String,
    /// Label of the grouping block the row came from.
    pub letter: String,
}

/// An [`AnimeListEntry`] as it appears inside `grouped_by_letter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedEntry {
    pub title: String,
    pub full_title: String,
    pub id: String,
    pub link: String,
}

impl From<&AnimeListEntry> for GroupedEntry {
    fn from(entry: &AnimeListEntry) -> Self {
        Self {
            title: entry.title.clone(),
            full_title: entry.full_title.clone(),
            id: entry.id.clone(),
            link: entry.link.clone(),
        }
    }
}

/// Which of the two card shapes to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    /// Airing shows; the badge text is the release day.
    Ongoing,
    /// Finished shows; the badge text is the score.
    Complete,
}
