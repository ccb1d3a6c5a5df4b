//! Typed DOM access over parsed HTML.
//!
//! Extraction code only talks to [`DomNode`], so the selector engine backing
//! it can be swapped without touching the scraping rules.

use crate::{Error, Result};
use scraper::{ElementRef, Html, Selector};

/// Minimal read-only view of an element in a parsed document.
pub trait DomNode: Sized {
    /// All descendants matching a CSS selector, in document order.
    fn find_all(&self, selector: &str) -> Result<Vec<Self>>;

    /// Concatenated text content of the element and its descendants.
    fn text(&self) -> String;

    /// Value of an attribute, if present.
    fn attr(&self, name: &str) -> Option<String>;

    /// First descendant matching `selector`.
    fn find_first(&self, selector: &str) -> Result<Option<Self>> {
        Ok(self.find_all(selector)?.into_iter().next())
    }
}

/// An owned, parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// The `<html>` element.
    pub fn root(&self) -> Node<'_> {
        Node(self.html.root_element())
    }

    /// Trimmed `<title>` text, or `None` when the title is absent or blank.
    pub fn title(&self) -> Result<Option<String>> {
        let title = self
            .root()
            .find_first("title")?
            .map(|n| n.text().trim().to_string())
            .filter(|t| !t.is_empty());
        Ok(title)
    }
}

/// `scraper`-backed element handle.
#[derive(Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| Error::ParseError(format!("invalid selector {:?}: {:?}", selector, e)))
}

impl<'a> DomNode for Node<'a> {
    fn find_all(&self, selector: &str) -> Result<Vec<Self>> {
        let sel = parse_selector(selector)?;
        Ok(self.0.select(&sel).map(Node).collect())
    }

    fn text(&self) -> String {
        self.0.text().collect::<String>()
    }

    /// Unqualified lookup first, then by local name so `xlink:href` answers to `href`.
    fn attr(&self, name: &str) -> Option<String> {
        let el = self.0.value();
        el.attr(name)
            .or_else(|| el.attrs().find(|(k, _)| *k == name).map(|(_, v)| v))
            .map(|s| s.to_string())
    }
}
