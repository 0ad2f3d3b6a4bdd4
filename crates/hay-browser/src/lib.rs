//! # hay-browser
//!
//! Headless Chrome primitives for reading Blacklight catalog pages, built on
//! chromiumoxide.
//!
//! The crate launches a browser, navigates to catalog record and search
//! pages, waits for the DOM to settle, and reads the parts of the page the
//! acceptance checks care about into plain serde snapshots. It makes no
//! judgement about what a page *should* contain; that belongs to `hay-check`.
//!
//! ## Architecture
//!
//! - **TestBrowser**: Manages the browser process lifecycle
//! - **Page**: A browser tab with navigation, scripting and snapshot reads
//! - **ConsoleCapture**: Thread-safe accumulation of console messages
//! - **CatalogSite**: Builds record and search URLs against a catalog root
//! - **WaitConfig**: Polling waits with timeouts (the implicit-wait equivalent)
//! - **dom**: Extraction scripts and the snapshot types they produce
//!
//! ## Example Usage
//!
//! ```ignore
//! use hay_browser::{CatalogSite, StaticCatalog, TestBrowser, TestBrowserConfig};
//!
//! let browser = TestBrowser::launch(TestBrowserConfig::default()).await?;
//! let page = browser.new_page().await?;
//!
//! let catalog = StaticCatalog::new("https://search.library.brown.edu/catalog");
//! page.navigate(&catalog.record_url("b5706110", false)).await?;
//!
//! let record = page.record_snapshot(&["annexhay_easyrequest_url"]).await?;
//! assert_eq!(record.formats.get(1).map(String::as_str), Some("Archives/Manuscripts"));
//!
//! browser.close().await?;
//! ```
//!
//! ## Testing Strategy
//!
//! 1. **Unit tests**: snapshot decoding, URL building, waits, console filtering
//! 2. **Integration tests**: real browser tests against `data:` pages (require
//!    Chrome installed)
//!
//! Run with `cargo test` (unit) or `cargo test -- --ignored` (integration).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod browser;
pub mod console;
pub mod dom;
pub mod error;
pub mod page;
pub mod site;
pub mod wait;

// Re-export main types for convenience
pub use browser::{TestBrowser, TestBrowserConfig};
pub use console::{ConsoleCapture, ConsoleLevel, ConsoleMessage};
pub use dom::{
    CellSnapshot, DocumentSnapshot, ItemSnapshot, LinkSnapshot, RecordSnapshot, ResultsSnapshot,
    RowSnapshot,
};
pub use error::{BrowserError, Result};
pub use page::Page;
pub use site::{CatalogSite, StaticCatalog};
pub use wait::{WaitConfig, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT};
