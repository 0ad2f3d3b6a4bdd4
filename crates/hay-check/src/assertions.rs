//! Comparisons of page snapshots against fixture expectations.
//!
//! Nothing here touches a browser. Each function takes a snapshot read by
//! `hay-browser` and either returns `Ok` or the first [`CheckError`] that
//! describes what differed, naming the element and both values.

use crate::error::CheckError;
use crate::fixtures::{ItemExpectation, ItemLocator, LinkExpectation, RowExpectation, RowRequest};
use hay_browser::{
    CellSnapshot, DocumentSnapshot, ItemSnapshot, RecordSnapshot, ResultsSnapshot, RowSnapshot,
};

/// Format value every checked record and result must carry.
pub const FORMAT_LABEL: &str = "Archives/Manuscripts";

/// Text of a shown request link.
pub const REQUEST_TEXT: &str = "request-access";

/// Holdings table columns on the search-results page.
pub const LOCATION_COLUMN: usize = 0;
/// Call-number column; rows are matched on it.
pub const CALL_NUMBER_COLUMN: usize = 1;
/// Status column; holds the request link when one is offered.
pub const STATUS_COLUMN: usize = 2;

fn expect_eq(what: impl Into<String>, expected: &str, actual: &str) -> Result<(), CheckError> {
    if actual == expected {
        Ok(())
    } else {
        Err(CheckError::Mismatch {
            what: what.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

fn expect_contains(
    what: impl Into<String>,
    expected: &str,
    actual: &str,
) -> Result<(), CheckError> {
    if actual.contains(expected) {
        Ok(())
    } else {
        Err(CheckError::NotContained {
            what: what.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// The record's format value: the second `.blacklight-format` element (the
/// first is the field label) must read `Archives/Manuscripts`.
///
/// # Errors
///
/// `ElementNotFound` if the page has fewer than two format elements,
/// `Mismatch` if the value differs.
pub fn check_record_format(snapshot: &RecordSnapshot) -> Result<(), CheckError> {
    let format = snapshot.formats.get(1).ok_or_else(|| {
        CheckError::ElementNotFound("format value (second `.blacklight-format`)".to_string())
    })?;
    expect_eq("record format", FORMAT_LABEL, format)
}

/// Finds an item row by position or element id.
///
/// # Errors
///
/// `ElementNotFound` if no row matches.
pub fn locate_item<'a>(
    snapshot: &'a RecordSnapshot,
    locator: &ItemLocator,
) -> Result<&'a ItemSnapshot, CheckError> {
    let found = match locator {
        ItemLocator::Position(index) => snapshot.items.get(*index),
        ItemLocator::Id(id) => snapshot
            .items
            .iter()
            .find(|item| item.id.as_deref() == Some(id.as_str())),
    };

    found.ok_or_else(|| {
        CheckError::ElementNotFound(format!(
            "{locator} among {} `.bib_item` rows",
            snapshot.items.len()
        ))
    })
}

/// Compares one item row against its expectation.
///
/// Location, call number and status must match exactly. Every link the
/// expectation leaves empty must exist with empty text; the shown link, if
/// any, must read `request-access` and point at the expected href.
///
/// # Errors
///
/// The first difference found, in the order above.
pub fn check_item(item: &ItemSnapshot, expected: &ItemExpectation) -> Result<(), CheckError> {
    let label = &expected.locator;

    let field = |name: &str, value: &Option<String>| {
        value
            .clone()
            .ok_or_else(|| CheckError::ElementNotFound(format!("{label} `.{name}`")))
    };

    expect_eq(
        format!("{label} location"),
        &expected.location,
        &field("location", &item.location)?,
    )?;
    expect_eq(
        format!("{label} call number"),
        &expected.call_number,
        &field("callnumber", &item.call_number)?,
    )?;
    expect_eq(
        format!("{label} status"),
        &expected.status,
        &field("status", &item.status)?,
    )?;

    for link in expected.links.empty() {
        let class = link.class_name();
        let element = item
            .links
            .get(class)
            .ok_or_else(|| CheckError::ElementNotFound(format!("{label} `.{class}`")))?;
        expect_eq(format!("{label} `.{class}` text"), "", &element.text)?;
    }

    if let LinkExpectation::Only {
        link,
        href_contains,
    } = &expected.links
    {
        let class = link.class_name();
        let element = item
            .links
            .get(class)
            .ok_or_else(|| CheckError::ElementNotFound(format!("{label} `.{class}`")))?;
        expect_eq(format!("{label} `.{class}` text"), REQUEST_TEXT, &element.text)?;

        let href = element.href.as_deref().ok_or_else(|| {
            CheckError::ElementNotFound(format!("{label} `.{class}` href"))
        })?;
        expect_contains(format!("{label} `.{class}` href"), href_contains, href)?;
    }

    Ok(())
}

/// The search must return exactly `expected` result documents.
///
/// # Errors
///
/// `DocumentCount` on any other count.
pub fn check_document_count(
    snapshot: &ResultsSnapshot,
    expected: usize,
) -> Result<(), CheckError> {
    let actual = snapshot.documents.len();
    if actual == expected {
        Ok(())
    } else {
        Err(CheckError::DocumentCount { expected, actual })
    }
}

/// Finds the first row, in document order, whose call-number cell equals
/// `call_number` exactly, together with the document that contains it.
///
/// # Errors
///
/// `ElementNotFound` if no row matches.
pub fn locate_row<'a>(
    snapshot: &'a ResultsSnapshot,
    call_number: &str,
) -> Result<(&'a DocumentSnapshot, &'a RowSnapshot), CheckError> {
    snapshot
        .documents
        .iter()
        .find_map(|doc| {
            doc.rows
                .iter()
                .find(|row| {
                    row.cells
                        .get(CALL_NUMBER_COLUMN)
                        .is_some_and(|cell| cell.text == call_number)
                })
                .map(|row| (doc, row))
        })
        .ok_or_else(|| {
            CheckError::ElementNotFound(format!("result row with call number `{call_number}`"))
        })
}

/// The containing document's format: its last `.title-subheading` must read
/// `Archives/Manuscripts`.
///
/// # Errors
///
/// `ElementNotFound` if the document has no subheading, `Mismatch` if the
/// value differs.
pub fn check_document_format(document: &DocumentSnapshot) -> Result<(), CheckError> {
    let format = document.subheadings.last().ok_or_else(|| {
        CheckError::ElementNotFound("result `.title-subheading`".to_string())
    })?;
    expect_eq("result format", FORMAT_LABEL, format)
}

fn column<'a>(
    row: &'a RowSnapshot,
    index: usize,
    key: &str,
    name: &str,
) -> Result<&'a CellSnapshot, CheckError> {
    row.cells.get(index).ok_or_else(|| {
        CheckError::ElementNotFound(format!("row `{key}` {name} cell (column {index})"))
    })
}

/// Compares one holdings row against its expectation.
///
/// Location and call number must match exactly; the status cell must contain
/// the expected status. The status cell also carries the request link, so
/// `request-access` must appear in it exactly when a request is expected,
/// and the cell's anchor must point at the expected href.
///
/// # Errors
///
/// The first difference found, in the order above.
pub fn check_row(row: &RowSnapshot, expected: &RowExpectation) -> Result<(), CheckError> {
    let key = &expected.call_number;

    let location = column(row, LOCATION_COLUMN, key, "location")?;
    let call_number = column(row, CALL_NUMBER_COLUMN, key, "call number")?;
    let status = column(row, STATUS_COLUMN, key, "status")?;

    expect_eq(format!("row `{key}` location"), &expected.location, &location.text)?;
    expect_eq(format!("row `{key}` call number"), key, &call_number.text)?;
    expect_contains(
        format!("row `{key}` status"),
        &expected.status_contains,
        &status.text,
    )?;

    match &expected.request {
        RowRequest::Absent => {
            if status.text.contains(REQUEST_TEXT) {
                return Err(CheckError::Unexpected {
                    what: format!("row `{key}` status"),
                    unexpected: REQUEST_TEXT.to_string(),
                    actual: status.text.clone(),
                });
            }
        }
        RowRequest::Present { href_contains } => {
            expect_contains(format!("row `{key}` status"), REQUEST_TEXT, &status.text)?;
            let href = status.link_href.as_deref().ok_or_else(|| {
                CheckError::ElementNotFound(format!("row `{key}` request link"))
            })?;
            expect_contains(format!("row `{key}` request href"), href_contains, href)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::RequestLink;
    use hay_browser::LinkSnapshot;
    use std::collections::BTreeMap;

    const EASYREQUEST_HREF: &str =
        "https://library.example.edu/easyrequest_hay/confirm/?item_id=i1&item_title=Beckwith";
    const AEON_HREF: &str = "https://brown.aeon.atlas-sys.com/logon?Action=10&Form=30";

    fn links(shown: Option<(RequestLink, &str)>) -> BTreeMap<String, LinkSnapshot> {
        RequestLink::ALL
            .into_iter()
            .map(|link| {
                let snapshot = match shown {
                    Some((s, href)) if s == link => LinkSnapshot {
                        text: REQUEST_TEXT.to_string(),
                        href: Some(href.to_string()),
                    },
                    _ => LinkSnapshot::default(),
                };
                (link.class_name().to_string(), snapshot)
            })
            .collect()
    }

    fn item_snapshot(
        id: Option<&str>,
        location: &str,
        call_number: &str,
        status: &str,
        shown: Option<(RequestLink, &str)>,
    ) -> ItemSnapshot {
        ItemSnapshot {
            id: id.map(str::to_string),
            text: format!("{location} {call_number} {status}"),
            location: Some(location.to_string()),
            call_number: Some(call_number.to_string()),
            status: Some(status.to_string()),
            links: links(shown),
        }
    }

    fn beckwith_record() -> RecordSnapshot {
        RecordSnapshot {
            formats: vec!["Format".into(), "Archives/Manuscripts".into()],
            items: vec![item_snapshot(
                None,
                "ANNEX HAY",
                "Ms.2010.010 Box 1",
                "AVAILABLE",
                Some((RequestLink::AnnexhayEasyrequestUrl, EASYREQUEST_HREF)),
            )],
        }
    }

    fn beckwith_expectation() -> ItemExpectation {
        ItemExpectation {
            locator: ItemLocator::Position(0),
            location: "ANNEX HAY".into(),
            call_number: "Ms.2010.010 Box 1".into(),
            status: "AVAILABLE".into(),
            links: LinkExpectation::Only {
                link: RequestLink::AnnexhayEasyrequestUrl,
                href_contains: "easyrequest_hay/confirm".into(),
            },
        }
    }

    fn cell(text: &str, href: Option<&str>) -> CellSnapshot {
        CellSnapshot {
            text: text.to_string(),
            link_href: href.map(str::to_string),
        }
    }

    fn holdings_row(location: &str, call_number: &str, status: &str, href: Option<&str>) -> RowSnapshot {
        RowSnapshot {
            text: format!("{location} {call_number} {status}"),
            cells: vec![cell(location, None), cell(call_number, None), cell(status, href)],
        }
    }

    fn yoken_results() -> ResultsSnapshot {
        ResultsSnapshot {
            documents: vec![DocumentSnapshot {
                subheadings: vec!["1985-2011".into(), "Archives/Manuscripts".into()],
                rows: vec![holdings_row(
                    "HAY MANUSCRIPTS",
                    "Ms.2011.038 Box 1",
                    "AVAILABLE request-access",
                    Some(AEON_HREF),
                )],
            }],
        }
    }

    fn yoken_expectation() -> RowExpectation {
        RowExpectation {
            call_number: "Ms.2011.038 Box 1".into(),
            location: "HAY MANUSCRIPTS".into(),
            status_contains: "AVAILABLE".into(),
            request: RowRequest::Present {
                href_contains: "brown.aeon.atlas-sys.com".into(),
            },
        }
    }

    #[test]
    fn beckwith_record_passes() {
        let record = beckwith_record();
        check_record_format(&record).expect("format");
        let item = locate_item(&record, &ItemLocator::Position(0)).expect("first item");
        check_item(item, &beckwith_expectation()).expect("item matches");
    }

    #[test]
    fn format_label_alone_is_not_a_format() {
        let record = RecordSnapshot {
            formats: vec!["Format".into()],
            items: Vec::new(),
        };
        assert!(matches!(
            check_record_format(&record),
            Err(CheckError::ElementNotFound(_))
        ));

        let book = RecordSnapshot {
            formats: vec!["Format".into(), "Book".into()],
            items: Vec::new(),
        };
        assert!(matches!(
            check_record_format(&book),
            Err(CheckError::Mismatch { actual, .. }) if actual == "Book"
        ));
    }

    #[test]
    fn items_are_found_by_id_or_position() {
        let record = RecordSnapshot {
            formats: Vec::new(),
            items: vec![
                item_snapshot(Some("item_1"), "A", "1", "AVAILABLE", None),
                item_snapshot(Some("item_142740093"), "ANNEX HAY", "OF-1C-16 Box 1", "RESTRICTED", None),
            ],
        };
        let by_id = locate_item(&record, &ItemLocator::Id("item_142740093".into())).expect("id");
        assert_eq!(by_id.call_number.as_deref(), Some("OF-1C-16 Box 1"));
        let by_pos = locate_item(&record, &ItemLocator::Position(0)).expect("position");
        assert_eq!(by_pos.id.as_deref(), Some("item_1"));

        let err = locate_item(&record, &ItemLocator::Position(5)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "element not found: item #6 among 2 `.bib_item` rows"
        );
    }

    #[test]
    fn restricted_item_offering_a_link_fails() {
        let item = item_snapshot(
            Some("item_142740093"),
            "ANNEX HAY",
            "OF-1C-16 Box 1",
            "RESTRICTED",
            Some((RequestLink::AnnexhayEasyrequestUrl, EASYREQUEST_HREF)),
        );
        let expected = ItemExpectation {
            locator: ItemLocator::Id("item_142740093".into()),
            location: "ANNEX HAY".into(),
            call_number: "OF-1C-16 Box 1".into(),
            status: "RESTRICTED".into(),
            links: LinkExpectation::None,
        };
        let err = check_item(&item, &expected).unwrap_err();
        assert_eq!(
            err.to_string(),
            "item `item_142740093` `.annexhay_easyrequest_url` text: expected ``, found `request-access`"
        );
    }

    #[test]
    fn restricted_item_without_links_passes() {
        let item = item_snapshot(
            Some("item_142740093"),
            "ANNEX HAY",
            "OF-1C-16 Box 1",
            "RESTRICTED",
            None,
        );
        let expected = ItemExpectation {
            locator: ItemLocator::Id("item_142740093".into()),
            location: "ANNEX HAY".into(),
            call_number: "OF-1C-16 Box 1".into(),
            status: "RESTRICTED".into(),
            links: LinkExpectation::None,
        };
        check_item(&item, &expected).expect("no links shown");
    }

    #[test]
    fn status_is_compared_exactly_on_record_pages() {
        let mut item = beckwith_record().items.remove(0);
        item.status = Some("AVAILABLE (2)".into());
        let err = check_item(&item, &beckwith_expectation()).unwrap_err();
        assert!(matches!(err, CheckError::Mismatch { what, .. } if what == "item #1 status"));
    }

    #[test]
    fn missing_link_element_is_not_found() {
        let mut item = beckwith_record().items.remove(0);
        item.links.remove("jcb_url");
        let err = check_item(&item, &beckwith_expectation()).unwrap_err();
        assert_eq!(err.to_string(), "element not found: item #1 `.jcb_url`");
    }

    #[test]
    fn shown_link_must_point_at_expected_target() {
        let mut item = beckwith_record().items.remove(0);
        if let Some(link) = item.links.get_mut("annexhay_easyrequest_url") {
            link.href = Some("https://library.example.edu/other".into());
        }
        let err = check_item(&item, &beckwith_expectation()).unwrap_err();
        assert!(matches!(err, CheckError::NotContained { expected, .. } if expected == "easyrequest_hay/confirm"));
    }

    #[test]
    fn missing_field_is_not_found() {
        let mut item = beckwith_record().items.remove(0);
        item.call_number = None;
        let err = check_item(&item, &beckwith_expectation()).unwrap_err();
        assert_eq!(err.to_string(), "element not found: item #1 `.callnumber`");
    }

    #[test]
    fn yoken_search_passes() {
        let results = yoken_results();
        check_document_count(&results, 1).expect("one document");
        let (doc, row) = locate_row(&results, "Ms.2011.038 Box 1").expect("row");
        check_document_format(doc).expect("format");
        check_row(row, &yoken_expectation()).expect("row matches");
    }

    #[test]
    fn document_count_must_be_exact() {
        let err = check_document_count(&yoken_results(), 3).unwrap_err();
        assert_eq!(err.to_string(), "expected 3 result documents, found 1");
    }

    #[test]
    fn rows_match_on_whole_call_number() {
        let results = ResultsSnapshot {
            documents: vec![DocumentSnapshot {
                subheadings: vec!["Archives/Manuscripts".into()],
                rows: vec![
                    holdings_row("HAY MANUSCRIPTS", "Ms.HAY Box 20 - Photographs", "AVAILABLE", None),
                    holdings_row("ANNEX HAY", "Ms.HAY Box 2", "AVAILABLE request-access", Some(EASYREQUEST_HREF)),
                ],
            }],
        };
        let (_, row) = locate_row(&results, "Ms.HAY Box 2").expect("row");
        assert_eq!(row.cells[0].text, "ANNEX HAY");

        assert!(matches!(
            locate_row(&results, "Ms.HAY Box"),
            Err(CheckError::ElementNotFound(_))
        ));
    }

    #[test]
    fn first_matching_row_wins_across_documents() {
        let results = ResultsSnapshot {
            documents: vec![
                DocumentSnapshot {
                    subheadings: vec!["Book".into()],
                    rows: vec![holdings_row("HAY MICROFLM", "F5701 reel 2", "USE IN LIBRARY", None)],
                },
                DocumentSnapshot {
                    subheadings: vec!["Archives/Manuscripts".into()],
                    rows: vec![holdings_row("ANNEX HAY", "F5701 reel 2", "AVAILABLE", None)],
                },
            ],
        };
        let (doc, row) = locate_row(&results, "F5701 reel 2").expect("row");
        assert_eq!(row.cells[0].text, "HAY MICROFLM");
        assert!(check_document_format(doc).is_err());
    }

    #[test]
    fn document_format_reads_last_subheading() {
        let doc = DocumentSnapshot {
            subheadings: vec!["Archives/Manuscripts".into(), "1900-1950".into()],
            rows: Vec::new(),
        };
        assert!(matches!(
            check_document_format(&doc),
            Err(CheckError::Mismatch { actual, .. }) if actual == "1900-1950"
        ));
        assert!(matches!(
            check_document_format(&DocumentSnapshot::default()),
            Err(CheckError::ElementNotFound(_))
        ));
    }

    #[test]
    fn absent_request_rejects_request_text() {
        let row = holdings_row("ANNEX HAY", "Ms.HAY Box 4", "DUE 06-22-18 request-access", None);
        let expected = RowExpectation {
            call_number: "Ms.HAY Box 4".into(),
            location: "ANNEX HAY".into(),
            status_contains: "DUE 06-22-18".into(),
            request: RowRequest::Absent,
        };
        let err = check_row(&row, &expected).unwrap_err();
        assert!(matches!(err, CheckError::Unexpected { .. }));

        let quiet = holdings_row("ANNEX HAY", "Ms.HAY Box 4", "DUE 06-22-18", None);
        check_row(&quiet, &expected).expect("no request offered");
    }

    #[test]
    fn present_request_needs_text_and_href() {
        let no_text = holdings_row("HAY MANUSCRIPTS", "Ms.2011.038 Box 1", "AVAILABLE", Some(AEON_HREF));
        assert!(matches!(
            check_row(&no_text, &yoken_expectation()),
            Err(CheckError::NotContained { expected, .. }) if expected == REQUEST_TEXT
        ));

        let no_href = holdings_row("HAY MANUSCRIPTS", "Ms.2011.038 Box 1", "AVAILABLE request-access", None);
        assert!(matches!(
            check_row(&no_href, &yoken_expectation()),
            Err(CheckError::ElementNotFound(_))
        ));
    }

    #[test]
    fn short_row_reports_missing_cell() {
        let row = RowSnapshot {
            text: "HAY MANUSCRIPTS".into(),
            cells: vec![cell("HAY MANUSCRIPTS", None)],
        };
        let err = check_row(&row, &yoken_expectation()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "element not found: row `Ms.2011.038 Box 1` call number cell (column 1)"
        );
    }
}
