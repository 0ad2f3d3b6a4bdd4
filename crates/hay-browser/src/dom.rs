//! DOM snapshots of catalog pages.
//!
//! A page is read once, in a single script evaluation, into plain serde
//! structs. Every later lookup and comparison works on those structs, so a
//! check never races the page's own scripts between two element reads, and
//! the comparison logic can be tested without a browser.
//!
//! Text follows WebDriver's notion of element text: the rendered `innerText`
//! with leading and trailing whitespace stripped. An element that is not
//! rendered (it or an ancestor is `display:none`) has no client rects and
//! reads as the empty string; `innerText` alone would fall back to its
//! `textContent`.

use crate::error::{BrowserError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Helpers shared by both extraction scripts.
const PRELUDE: &str = r"
const text = (el) => {
  if (!el) return null;
  if (el.getClientRects().length === 0) return '';
  return (el.innerText || '').trim();
};
const href = (el) => {
  if (!el) return null;
  if (el.tagName === 'A' && el.hasAttribute('href')) return el.href;
  const anchor = el.querySelector('a[href]');
  return anchor ? anchor.href : null;
};
";

/// Snapshot of a bib record page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    /// Text of every `.blacklight-format` element in DOM order. Element 0 is
    /// the field label; the format value follows it.
    #[serde(default)]
    pub formats: Vec<String>,

    /// Every `.bib_item` row in DOM order.
    #[serde(default)]
    pub items: Vec<ItemSnapshot>,
}

/// Snapshot of one `.bib_item` row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    /// Element id (`item_18327071x`), if the row has one.
    #[serde(default)]
    pub id: Option<String>,

    /// Whole-row text, for logging.
    #[serde(default)]
    pub text: String,

    /// `.location` text; `None` when the row has no such element.
    #[serde(default)]
    pub location: Option<String>,

    /// `.callnumber` text.
    #[serde(default)]
    pub call_number: Option<String>,

    /// `.status` text.
    #[serde(default)]
    pub status: Option<String>,

    /// Request-link elements found in the row, keyed by class name. A class
    /// missing from the map had no element at all.
    #[serde(default)]
    pub links: BTreeMap<String, LinkSnapshot>,
}

/// Snapshot of one request-link element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    /// Rendered text; empty when the link is not shown.
    #[serde(default)]
    pub text: String,

    /// Resolved href of the element, or of its first descendant anchor.
    #[serde(default)]
    pub href: Option<String>,
}

/// Snapshot of a search-results page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsSnapshot {
    /// Every `div.document` in DOM order.
    #[serde(default)]
    pub documents: Vec<DocumentSnapshot>,
}

/// Snapshot of one search-result document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Text of every `.title-subheading` in the document.
    #[serde(default)]
    pub subheadings: Vec<String>,

    /// Every `tr` in the document.
    #[serde(default)]
    pub rows: Vec<RowSnapshot>,
}

/// Snapshot of one holdings table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSnapshot {
    /// Whole-row text.
    #[serde(default)]
    pub text: String,

    /// The row's `td` cells in order: location, call number, status.
    #[serde(default)]
    pub cells: Vec<CellSnapshot>,
}

/// Snapshot of one `td` cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    /// Cell text.
    #[serde(default)]
    pub text: String,

    /// Href of the first anchor in the cell.
    #[serde(default)]
    pub link_href: Option<String>,
}

/// Builds the record extraction script.
///
/// `link_classes` are the request-link class names to look for inside each
/// item row; they are JSON-encoded into the script rather than spliced as
/// raw text.
///
/// # Errors
///
/// Returns `ScriptExecutionFailed` if the class list cannot be encoded.
pub fn record_script(link_classes: &[&str]) -> Result<String> {
    let classes = serde_json::to_string(link_classes)
        .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))?;

    Ok(format!(
        r"(() => {{
{PRELUDE}
const linkClasses = {classes};
const formats = Array.from(document.getElementsByClassName('blacklight-format')).map(text);
const items = Array.from(document.getElementsByClassName('bib_item')).map((item) => {{
  const first = (cls) => item.getElementsByClassName(cls)[0] || null;
  const links = {{}};
  for (const cls of linkClasses) {{
    const el = first(cls);
    if (el) links[cls] = {{ text: text(el), href: href(el) }};
  }}
  return {{
    id: item.id || null,
    text: text(item),
    location: text(first('location')),
    call_number: text(first('callnumber')),
    status: text(first('status')),
    links,
  }};
}});
return {{ formats, items }};
}})()"
    ))
}

/// Builds the search-results extraction script.
#[must_use]
pub fn results_script() -> String {
    format!(
        r"(() => {{
{PRELUDE}
const documents = Array.from(document.querySelectorAll('div.document')).map((doc) => ({{
  subheadings: Array.from(doc.getElementsByClassName('title-subheading')).map(text),
  rows: Array.from(doc.getElementsByTagName('tr')).map((row) => ({{
    text: text(row),
    cells: Array.from(row.getElementsByTagName('td')).map((cell) => ({{
      text: text(cell),
      link_href: href(cell),
    }})),
  }})),
}}));
return {{ documents }};
}})()"
    )
}

/// Builds a script counting elements that match a CSS selector.
///
/// # Errors
///
/// Returns `ScriptExecutionFailed` if the selector cannot be encoded.
pub fn count_script(selector: &str) -> Result<String> {
    // JSON encoding keeps quotes and backticks in the selector inert
    let escaped = serde_json::to_string(selector)
        .map_err(|e| BrowserError::ScriptExecutionFailed(e.to_string()))?;
    Ok(format!("document.querySelectorAll({escaped}).length"))
}

/// Decodes the value returned by [`record_script`].
///
/// # Errors
///
/// Returns `SnapshotDecode` if the value has the wrong shape.
pub fn decode_record(value: serde_json::Value) -> Result<RecordSnapshot> {
    serde_json::from_value(value).map_err(|e| BrowserError::SnapshotDecode {
        what: "record",
        reason: e.to_string(),
    })
}

/// Decodes the value returned by [`results_script`].
///
/// # Errors
///
/// Returns `SnapshotDecode` if the value has the wrong shape.
pub fn decode_results(value: serde_json::Value) -> Result<ResultsSnapshot> {
    serde_json::from_value(value).map_err(|e| BrowserError::SnapshotDecode {
        what: "search results",
        reason: e.to_string(),
    })
}
