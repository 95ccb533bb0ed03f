//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! catalog pages and walking them with CSS selectors and positional child
//! access. Parsing goes through html5ever (via `scraper`), which accepts any
//! input: unclosed tags, stray end tags and garbage all produce *some* tree.
//!
//! # Example
//!
//! ```rust
//! use kaede_core::parse::Document;
//!
//! let html = r#"
//!     <div class="venz">
//!         <div><ul><li>first</li></ul></div>
//!         <div><ul><li>second</li></ul></div>
//!     </div>
//! "#;
//!
//! let doc = Document::parse(html);
//! let venz = &doc.select(".venz").unwrap()[0];
//! let second = venz.nth_child(1).unwrap();
//! assert_eq!(second.text().trim(), "second");
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::{KaedeError, Result};

/// Compiles a CSS selector, mapping failures to [`KaedeError::HtmlParseError`].
pub fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| KaedeError::HtmlParseError(format!("Invalid selector {selector:?}: {e}")))
}

/// Represents a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// Never fails; malformed markup is repaired the way a browser would.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// The `<html>` element.
    pub fn root(&self) -> Element<'_> {
        Element { element: self.html.root_element() }
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`KaedeError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kaede_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html);
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile_selector(selector)?;
        Ok(self.html.select(&sel).map(|element| Element { element }).collect())
    }

    /// Gets the title of the document.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html.select(&selector).next().map(|el| el.text().collect::<String>())
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use kaede_core::parse::Document;
///
/// let html = r#"<a href="https://example.com" title="Full">Link text</a>"#;
/// let doc = Document::parse(html);
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Concatenated text of every text node below this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute, `None` when absent.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Element children in document order; text and comment nodes are skipped.
    pub fn child_elements(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        self.element.children().filter_map(ElementRef::wrap).map(|element| Element { element })
    }

    /// The `index`-th element child (0-based), if there are that many.
    pub fn nth_child(&self, index: usize) -> Option<Element<'a>> {
        self.child_elements().nth(index)
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`KaedeError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile_selector(selector)?;
        Ok(self.select_compiled(&sel))
    }

    /// Same as [`Element::select`] with a precompiled selector.
    pub fn select_compiled(&self, selector: &Selector) -> Vec<Element<'a>> {
        self.element.select(selector).map(|element| Element { element }).collect()
    }
}
