//! Declarative selector paths for the catalog pages.
//!
//! A [`RecordDescriptor`] says *where* records live (a chain of [`Step`]s from
//! the document root to one or more scope elements, then a record selector
//! inside each scope) and *what* to read from each record (a list of
//! [`FieldSpec`]s). [`extract_records`] runs a descriptor against a parsed
//! [`Document`] and returns [`RawRecord`]s; mapping those into typed records
//! happens in [`crate::extract`].
//!
//! Every selector here mirrors the upstream markup. When the site changes
//! its layout, this file is the one to update.

use std::collections::HashMap;

use crate::parse::{Document, Element, compile_selector};
use crate::Result;

/// One hop along a scope path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Every descendant matching the selector (from the root for the first step).
    Select(&'static str),
    /// The n-th element child (0-based) of each current scope.
    NthChild(usize),
}

/// How a field's value is read from the node(s) its selector matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Read {
    /// Text of every match, concatenated.
    Text,
    /// Attribute of the first match.
    Attr(&'static str),
}

/// Cleanup applied to a value right after it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleanup {
    Raw,
    Trim,
    DropFirstSpace,
}

impl Cleanup {
    pub fn apply(self, value: String) -> String {
        match self {
            Cleanup::Raw => value,
            Cleanup::Trim => value.trim().to_string(),
            Cleanup::DropFirstSpace => crate::normalize::drop_first_space(&value),
        }
    }
}

/// A named value read relative to a record node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// `None` reads from the record node itself.
    pub selector: Option<&'static str>,
    pub read: Read,
    pub cleanup: Cleanup,
}

impl FieldSpec {
    pub const fn text(name: &'static str, selector: &'static str, cleanup: Cleanup) -> Self {
        Self { name, selector: Some(selector), read: Read::Text, cleanup }
    }

    pub const fn attr(name: &'static str, selector: &'static str, attr: &'static str) -> Self {
        Self { name, selector: Some(selector), read: Read::Attr(attr), cleanup: Cleanup::Raw }
    }
}

/// Where records live on a page and which fields to read from each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDescriptor {
    pub scope: &'static [Step],
    pub record: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Field values read from one record node.
///
/// A field whose node is absent reads as `None`; typed mapping turns that
/// into an empty string or skips the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    values: HashMap<&'static str, String>,
}

impl RawRecord {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// The value, or `""` when it was not found.
    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    /// The value when it is present and non-empty.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    pub fn insert(&mut self, name: &'static str, value: String) {
        self.values.insert(name, value);
    }
}

/// Like [`RecordDescriptor`], but records are kept per group and each group
/// carries a label read from the group node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupedDescriptor {
    pub groups: &'static [Step],
    pub label: FieldSpec,
    pub record: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Records of one group, tagged with the group's label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGroup {
    pub label: String,
    pub records: Vec<RawRecord>,
}

/// Resolves a scope path to the elements it ends at, in document order.
pub fn resolve_scope<'a>(doc: &'a Document, steps: &[Step]) -> Result<Vec<Element<'a>>> {
    let mut current = vec![doc.root()];

    for (i, step) in steps.iter().enumerate() {
        current = match *step {
            // The root itself may match the first selector.
            Step::Select(selector) if i == 0 => doc.select(selector)?,
            Step::Select(selector) => {
                let compiled = compile_selector(selector)?;
                current.iter().flat_map(|el| el.select_compiled(&compiled)).collect()
            }
            Step::NthChild(index) => current.iter().filter_map(|el| el.nth_child(index)).collect(),
        };
    }

    Ok(current)
}

/// Reads every field of `fields` from one record node.
pub fn read_fields(node: &Element<'_>, fields: &[FieldSpec]) -> Result<RawRecord> {
    let mut record = RawRecord::default();

    for field in fields {
        let targets = match field.selector {
            Some(selector) => node.select(selector)?,
            None => vec![*node],
        };

        let value = match field.read {
            Read::Text if targets.is_empty() => None,
            Read::Text => Some(targets.iter().map(Element::text).collect::<String>()),
            Read::Attr(name) => targets.first().and_then(|el| el.attr(name)).map(str::to_string),
        };

        if let Some(value) = value {
            record.insert(field.name, field.cleanup.apply(value));
        }
    }

    Ok(record)
}

/// Runs a descriptor over a document.
///
/// Records are returned scope by scope, each scope's records in document
/// order. A scope path that matches nothing yields no records.
pub fn extract_records(doc: &Document, descriptor: &RecordDescriptor) -> Result<Vec<RawRecord>> {
    let record_selector = compile_selector(descriptor.record)?;
    let mut records = Vec::new();

    for scope in resolve_scope(doc, descriptor.scope)? {
        for node in scope.select_compiled(&record_selector) {
            records.push(read_fields(&node, descriptor.fields)?);
        }
    }

    Ok(records)
}

/// Runs a grouped descriptor over a document, one [`RawGroup`] per group node.
///
/// A missing label reads as `""`.
pub fn extract_groups(doc: &Document, descriptor: &GroupedDescriptor) -> Result<Vec<RawGroup>> {
    let record_selector = compile_selector(descriptor.record)?;
    let label_name = descriptor.label.name;
    let mut groups = Vec::new();

    for group in resolve_scope(doc, descriptor.groups)? {
        let label = read_fields(&group, std::slice::from_ref(&descriptor.label))?.text(label_name);
        let records = group
            .select_compiled(&record_selector)
            .iter()
            .map(|node| read_fields(node, descriptor.fields))
            .collect::<Result<Vec<_>>>()?;

        groups.push(RawGroup { label, records });
    }

    Ok(groups)
}

/// Fields shared by every anime card.
const CARD_FIELDS: [FieldSpec; 5] = [
    FieldSpec::text("title", ".thumb > a .thumbz > h2", Cleanup::Trim),
    FieldSpec::attr("thumbnail_url", ".thumb > a .thumbz > img", "src"),
    FieldSpec::attr("link", ".thumb > a", "href"),
    FieldSpec::text("uploaded_on", ".newnime", Cleanup::Trim),
    FieldSpec::text("episode", ".epz", Cleanup::DropFirstSpace),
];

const fn card_fields(badge: &'static str) -> [FieldSpec; 6] {
    [
        CARD_FIELDS[0],
        CARD_FIELDS[1],
        CARD_FIELDS[2],
        CARD_FIELDS[3],
        CARD_FIELDS[4],
        FieldSpec::text(badge, ".epztipe", Cleanup::DropFirstSpace),
    ]
}

const ONGOING_CARD_FIELDS: [FieldSpec; 6] = card_fields("day_updated");
const COMPLETE_CARD_FIELDS: [FieldSpec; 6] = card_fields("score");

/// Homepage, first block of `.venz`: airing shows.
pub const HOME_ONGOING: RecordDescriptor = RecordDescriptor {
    scope: &[Step::Select(".venz"), Step::NthChild(0)],
    record: "ul > li",
    fields: &ONGOING_CARD_FIELDS,
};

/// Homepage, second block of `.venz`: finished shows.
pub const HOME_COMPLETE: RecordDescriptor = RecordDescriptor {
    scope: &[Step::Select(".venz"), Step::NthChild(1)],
    record: "ul > li",
    fields: &COMPLETE_CARD_FIELDS,
};

/// A page of `complete-anime/`: the only block of `.venz`.
pub const COMPLETE_PAGE: RecordDescriptor = RecordDescriptor {
    scope: &[Step::Select(".venz"), Step::NthChild(0)],
    record: "ul > li",
    fields: &COMPLETE_CARD_FIELDS,
};

/// A page of `ongoing-anime/`: the only block of `.venz`.
pub const ONGOING_PAGE: RecordDescriptor = RecordDescriptor {
    scope: &[Step::Select(".venz"), Step::NthChild(0)],
    record: "ul > li",
    fields: &ONGOING_CARD_FIELDS,
};

/// Grouping blocks of `anime-list/`, one per letter bucket.
pub const ANIME_LIST: GroupedDescriptor = GroupedDescriptor {
    groups: &[Step::Select(".bariskelom")],
    label: FieldSpec::text("letter", ".barispenz a", Cleanup::Trim),
    record: ".jdlbar ul li",
    fields: &[
        FieldSpec::attr("link", "a", "href"),
        FieldSpec::text("title", "a", Cleanup::Trim),
        FieldSpec::attr("full_title", "a", "title"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <div class="venz">
            <div class="rapi">
                <ul>
                    <li>
                        <div class="thumb"><a href="https://example.com/anime/a/">
                            <div class="thumbz"><img src="a.jpg"><h2 class="jdlflm"> Alpha </h2></div>
                        </a></div>
                        <div class="epz"> Episode 4</div>
                        <div class="epztipe"> Sabtu</div>
                        <div class="newnime">12 Okt</div>
                    </li>
                    <li><div class="epz"> Episode 1</div></li>
                </ul>
            </div>
            <div class="rapi"><ul><li><div class="epztipe"> 7.5</div></li></ul></div>
        </div>
    "#;

    #[test]
    fn test_resolve_scope_positional() {
        let doc = Document::parse(HTML);
        let first = resolve_scope(&doc, &[Step::Select(".venz"), Step::NthChild(0)]).unwrap();
        let third = resolve_scope(&doc, &[Step::Select(".venz"), Step::NthChild(2)]).unwrap();

        assert_eq!(first.len(), 1);
        assert!(third.is_empty());
    }

    #[test]
    fn test_extract_ongoing_descriptor() {
        let doc = Document::parse(HTML);
        let records = extract_records(&doc, &HOME_ONGOING).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("title"), Some("Alpha"));
        assert_eq!(records[0].get("thumbnail_url"), Some("a.jpg"));
        assert_eq!(records[0].get("link"), Some("https://example.com/anime/a/"));
        assert_eq!(records[0].get("episode"), Some("Episode 4"));
        assert_eq!(records[0].get("day_updated"), Some("Sabtu"));
        assert_eq!(records[0].get("uploaded_on"), Some("12 Okt"));
    }

    #[test]
    fn test_absent_nodes_read_as_missing() {
        let doc = Document::parse(HTML);
        let records = extract_records(&doc, &HOME_ONGOING).unwrap();

        assert_eq!(records[1].get("title"), None);
        assert_eq!(records[1].text("link"), "");
        assert_eq!(records[1].non_empty("episode"), Some("Episode 1"));
    }

    #[test]
    fn test_second_block_feeds_complete_descriptor() {
        let doc = Document::parse(HTML);
        let records = extract_records(&doc, &HOME_COMPLETE).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("score"), Some("7.5"));
    }

    #[test]
    fn test_bad_selector_surfaces_as_error() {
        const BROKEN: RecordDescriptor = RecordDescriptor { scope: &[Step::Select("[[")], record: "li", fields: &[] };
        let doc = Document::parse(HTML);
        assert!(extract_records(&doc, &BROKEN).is_err());
    }

    #[test]
    fn test_extract_groups_keeps_labels() {
        let html = r#"
            <div class="bariskelom">
                <div class="barispenz"><a name="A"> A </a></div>
                <div class="jdlbar"><ul><li><a href="https://example.com/anime/ao/" title="Ao Full">Ao</a></li></ul></div>
            </div>
            <div class="bariskelom">
                <div class="barispenz"><a name="B">B</a></div>
                <div class="jdlbar"><ul>
                    <li><a href="https://example.com/anime/bleach/">Bleach</a></li>
                    <li><a href="https://example.com/anime/boruto/"> Boruto </a></li>
                </ul></div>
            </div>
        "#;
        let doc = Document::parse(html);
        let groups = extract_groups(&doc, &ANIME_LIST).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "A");
        assert_eq!(groups[0].records[0].get("full_title"), Some("Ao Full"));
        assert_eq!(groups[1].label, "B");
        assert_eq!(groups[1].records.len(), 2);
        assert_eq!(groups[1].records[1].get("title"), Some("Boruto"));
        assert_eq!(groups[1].records[0].get("full_title"), None);
    }
}
