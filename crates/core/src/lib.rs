pub mod aggregate;
pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod models;
pub mod normalize;
pub mod parse;

pub use aggregate::{LetterGroups, group_by_letter, search};
#[cfg(feature = "fetch")]
pub use catalog::HttpCatalog;
pub use catalog::{Catalog, CatalogConfig, DEFAULT_BASE_URL, SearchResults};
#[doc(hidden)]
pub use descriptor::{FieldSpec, GroupedDescriptor, RawRecord, RecordDescriptor, Step};
pub use error::{KaedeError, Result};
pub use extract::{HomeLists, extract_anime_list, extract_home, extract_listing};
pub use fetch::{FetchConfig, Page, RetryPolicy, Sleeper, Transport, fetch_with_retry};
#[cfg(feature = "fetch")]
pub use fetch::{HttpTransport, TokioSleeper};
pub use formatters::{Envelope, Meta, Status, to_json_string};
pub use models::{AnimeListEntry, AnimeSummary, CardKind, GroupedEntry};
pub use normalize::{derive_id, parse_page, parse_score};
pub use parse::Document;
