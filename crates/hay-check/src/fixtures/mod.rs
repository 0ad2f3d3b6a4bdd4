//! The fixture table: which pages to load and what they must show.
//!
//! One [`CheckSpec`] per bib record or search. A record check names items by
//! position or element id and states each item's location, call number,
//! status, and request-link visibility. A search check states how many
//! result documents to expect and which rows (by call number) to inspect.
//!
//! The built-in table lives in [`builtin`]; a TOML file with the same shape
//! can replace it:
//!
//! ```toml
//! [[checks]]
//! name = "gregorian-record"
//! goal = "RESTRICTED items cannot be requested."
//!
//! [checks.page]
//! kind = "record"
//! bib = "b4115486"
//!
//! [[checks.page.items]]
//! locator = { id = "item_142740093" }
//! location = "ANNEX HAY"
//! call_number = "OF-1C-16 Box 1"
//! status = "RESTRICTED"
//! links = "none"
//! ```

mod builtin;
mod validation;

use crate::error::FixtureError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The request-link classes an item row can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestLink {
    /// Scan-and-deliver request
    Scan,
    /// John Carter Brown Library request
    JcbUrl,
    /// Direct Aeon reading-room request for Hay manuscripts
    HayAeonUrl,
    /// EZBorrow volume request
    EzbVolumeUrl,
    /// Self-service request for items stored at the Annex
    AnnexhayEasyrequestUrl,
}

impl RequestLink {
    /// Every known request link, in page order.
    pub const ALL: [RequestLink; 5] = [
        RequestLink::Scan,
        RequestLink::JcbUrl,
        RequestLink::HayAeonUrl,
        RequestLink::EzbVolumeUrl,
        RequestLink::AnnexhayEasyrequestUrl,
    ];

    /// The DOM class name of the link element.
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            RequestLink::Scan => "scan",
            RequestLink::JcbUrl => "jcb_url",
            RequestLink::HayAeonUrl => "hay_aeon_url",
            RequestLink::EzbVolumeUrl => "ezb_volume_url",
            RequestLink::AnnexhayEasyrequestUrl => "annexhay_easyrequest_url",
        }
    }

    /// Class names of every known request link.
    #[must_use]
    pub fn class_names() -> [&'static str; 5] {
        Self::ALL.map(Self::class_name)
    }
}

impl fmt::Display for RequestLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Which request link an item row may show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkExpectation {
    /// No request link may show.
    None,
    /// Exactly this link shows, reading `request-access`, with an href
    /// containing `href_contains`. All others are empty.
    Only {
        /// The link that shows
        link: RequestLink,
        /// Fragment its href must contain
        href_contains: String,
    },
}

impl LinkExpectation {
    /// The link that must show, if any.
    #[must_use]
    pub fn shown(&self) -> Option<RequestLink> {
        match self {
            LinkExpectation::None => None,
            LinkExpectation::Only { link, .. } => Some(*link),
        }
    }

    /// The links that must be present but empty.
    #[must_use]
    pub fn empty(&self) -> Vec<RequestLink> {
        let shown = self.shown();
        RequestLink::ALL
            .into_iter()
            .filter(|link| Some(*link) != shown)
            .collect()
    }
}

/// How an item row is found on a record page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemLocator {
    /// Zero-based index into the page's `.bib_item` rows.
    Position(usize),
    /// Element id of the row, e.g. `item_18327071x`.
    Id(String),
}

impl fmt::Display for ItemLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemLocator::Position(index) => write!(f, "item #{}", index + 1),
            ItemLocator::Id(id) => write!(f, "item `{id}`"),
        }
    }
}

/// Expected state of one item row on a record page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemExpectation {
    /// How to find the row
    pub locator: ItemLocator,
    /// Exact `.location` text
    pub location: String,
    /// Exact `.callnumber` text
    pub call_number: String,
    /// Exact `.status` text
    pub status: String,
    /// Request-link visibility
    pub links: LinkExpectation,
}

/// Whether a search-result row offers a request link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowRequest {
    /// `request-access` must not appear in the status cell.
    Absent,
    /// `request-access` appears and the cell's anchor href contains the fragment.
    Present {
        /// Fragment the href must contain
        href_contains: String,
    },
}

/// Expected state of one search-result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowExpectation {
    /// Exact call-number cell text; also the row's key
    pub call_number: String,
    /// Exact location cell text
    pub location: String,
    /// Text the status cell must contain
    pub status_contains: String,
    /// Request-link presence
    pub request: RowRequest,
}

/// What page a check loads and what it expects there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckPage {
    /// A bib record page, `{root}/{bib}`.
    Record {
        /// Catalog id, e.g. `b5706110`
        bib: String,
        /// Append `?limit=false` so every item row renders
        #[serde(default)]
        limit_all: bool,
        /// Load the record on the production catalog first to warm its
        /// availability cache
        #[serde(default)]
        warm_up: bool,
        /// Items to inspect
        items: Vec<ItemExpectation>,
    },
    /// A search-results page, `{root}?{query}`.
    Search {
        /// Raw query string, e.g. `f[format][]=Archives/Manuscripts&q=yoken`
        query: String,
        /// Exact number of `div.document` results
        expected_documents: usize,
        /// Rows to inspect
        rows: Vec<RowExpectation>,
    },
}

impl CheckPage {
    /// Short description of the target, for listings.
    #[must_use]
    pub fn target(&self) -> String {
        match self {
            CheckPage::Record { bib, limit_all, .. } => {
                if *limit_all {
                    format!("record {bib}?limit=false")
                } else {
                    format!("record {bib}")
                }
            }
            CheckPage::Search { query, .. } => format!("search {query}"),
        }
    }

    /// Number of items or rows the check inspects.
    #[must_use]
    pub fn expectation_count(&self) -> usize {
        match self {
            CheckPage::Record { items, .. } => items.len(),
            CheckPage::Search { rows, .. } => rows.len(),
        }
    }
}

/// One acceptance check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSpec {
    /// Unique name, used by `--only`
    pub name: String,
    /// What the check demonstrates, logged before it runs
    pub goal: String,
    /// Page and expectations
    pub page: CheckPage,
}

/// An ordered set of checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureTable {
    /// Checks in run order
    #[serde(default)]
    pub checks: Vec<CheckSpec>,
}

impl FixtureTable {
    /// Reads a table from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Read` if the file can't be read and `Parse` if it isn't a
    /// table of checks.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content).map_err(|message| FixtureError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parses a table from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the parser message on failure.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Renders the table as TOML.
    ///
    /// # Errors
    ///
    /// Returns the serializer message on failure.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| e.to_string())
    }

    /// Check names in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(|c| c.name.as_str())
    }

    /// Keeps only the named checks, in table order. An empty selection keeps
    /// everything.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCheck` for the first name the table doesn't contain.
    pub fn select(&self, names: &[String]) -> Result<Self, FixtureError> {
        if names.is_empty() {
            return Ok(self.clone());
        }

        if let Some(missing) = names.iter().find(|n| !self.names().any(|c| c == n.as_str())) {
            return Err(FixtureError::UnknownCheck {
                name: missing.clone(),
            });
        }

        Ok(Self {
            checks: self
                .checks
                .iter()
                .filter(|c| names.iter().any(|n| *n == c.name))
                .cloned()
                .collect(),
        })
    }

    /// Number of checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// True if the table has no checks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_classes_match_dom_contract() {
        assert_eq!(
            RequestLink::class_names(),
            [
                "scan",
                "jcb_url",
                "hay_aeon_url",
                "ezb_volume_url",
                "annexhay_easyrequest_url"
            ]
        );
    }

    #[test]
    fn empty_links_are_complement_of_shown() {
        let only = LinkExpectation::Only {
            link: RequestLink::HayAeonUrl,
            href_contains: "brown.aeon.atlas-sys.com".into(),
        };
        assert_eq!(only.shown(), Some(RequestLink::HayAeonUrl));
        assert_eq!(
            only.empty(),
            vec![
                RequestLink::Scan,
                RequestLink::JcbUrl,
                RequestLink::EzbVolumeUrl,
                RequestLink::AnnexhayEasyrequestUrl
            ]
        );

        assert_eq!(LinkExpectation::None.shown(), None);
        assert_eq!(LinkExpectation::None.empty(), RequestLink::ALL.to_vec());
    }

    #[test]
    fn locator_display() {
        assert_eq!(ItemLocator::Position(0).to_string(), "item #1");
        assert_eq!(
            ItemLocator::Id("item_18327071x".into()).to_string(),
            "item `item_18327071x`"
        );
    }

    #[test]
    fn select_keeps_table_order_and_rejects_unknown() {
        let table = FixtureTable::builtin();
        let picked = table
            .select(&["yoken-search".to_string(), "beckwith-record".to_string()])
            .expect("known names");
        let names: Vec<_> = picked.names().collect();
        assert_eq!(names, vec!["beckwith-record", "yoken-search"]);

        let err = table.select(&["no-such-check".to_string()]).unwrap_err();
        assert!(matches!(err, FixtureError::UnknownCheck { name } if name == "no-such-check"));

        assert_eq!(table.select(&[]).expect("all").len(), table.len());
    }

    #[test]
    fn table_parses_from_toml() {
        let table = FixtureTable::from_toml(
            r#"
[[checks]]
name = "microfilm"
goal = "HAY MICROFLM items are not requestable."

[checks.page]
kind = "record"
bib = "b2734709"
limit_all = true

[[checks.page.items]]
locator = { id = "item_159973284" }
location = "HAY MICROFLM"
call_number = "F5701 reel 2"
status = "USE IN LIBRARY"
links = "none"

[[checks]]
name = "yoken"
goal = "Aeon link for available Hay manuscripts."

[checks.page]
kind = "search"
query = "f[format][]=Archives/Manuscripts&q=yoken"
expected_documents = 1

[[checks.page.rows]]
call_number = "Ms.2011.038 Box 1"
location = "HAY MANUSCRIPTS"
status_contains = "AVAILABLE"
request = { present = { href_contains = "brown.aeon.atlas-sys.com" } }
"#,
        )
        .expect("parse");

        assert_eq!(table.len(), 2);
        match &table.checks[0].page {
            CheckPage::Record {
                bib,
                limit_all,
                warm_up,
                items,
            } => {
                assert_eq!(bib, "b2734709");
                assert!(*limit_all);
                assert!(!*warm_up);
                assert_eq!(items[0].links, LinkExpectation::None);
            }
            other => panic!("expected record, got {other:?}"),
        }
        match &table.checks[1].page {
            CheckPage::Search {
                expected_documents,
                rows,
                ..
            } => {
                assert_eq!(*expected_documents, 1);
                assert_eq!(
                    rows[0].request,
                    RowRequest::Present {
                        href_contains: "brown.aeon.atlas-sys.com".into()
                    }
                );
            }
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn builtin_table_survives_toml() {
        let table = FixtureTable::builtin();
        let text = table.to_toml().expect("serialize");
        assert_eq!(FixtureTable::from_toml(&text).expect("parse"), table);
    }

    #[test]
    fn target_describes_page() {
        let table = FixtureTable::builtin();
        let john_hay = table
            .checks
            .iter()
            .find(|c| c.name == "john-hay-record")
            .expect("present");
        assert_eq!(john_hay.page.target(), "record b2498067?limit=false");
        assert_eq!(john_hay.page.expectation_count(), 3);
    }
}
