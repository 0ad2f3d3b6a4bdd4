//! The built-in check table.

use super::{
    CheckPage, CheckSpec, FixtureTable, ItemExpectation, ItemLocator, LinkExpectation,
    RequestLink, RowExpectation, RowRequest,
};

const EASYREQUEST: &str = "easyrequest_hay/confirm";
const AEON: &str = "brown.aeon.atlas-sys.com";
const MANUSCRIPTS_FACET: &str = "f[format][]=Archives/Manuscripts";

fn easyrequest() -> LinkExpectation {
    LinkExpectation::Only {
        link: RequestLink::AnnexhayEasyrequestUrl,
        href_contains: EASYREQUEST.to_string(),
    }
}

fn aeon() -> LinkExpectation {
    LinkExpectation::Only {
        link: RequestLink::HayAeonUrl,
        href_contains: AEON.to_string(),
    }
}

fn item(
    locator: ItemLocator,
    location: &str,
    call_number: &str,
    status: &str,
    links: LinkExpectation,
) -> ItemExpectation {
    ItemExpectation {
        locator,
        location: location.to_string(),
        call_number: call_number.to_string(),
        status: status.to_string(),
        links,
    }
}

fn id(value: &str) -> ItemLocator {
    ItemLocator::Id(value.to_string())
}

fn row(call_number: &str, location: &str, status: &str, href: Option<&str>) -> RowExpectation {
    RowExpectation {
        call_number: call_number.to_string(),
        location: location.to_string(),
        status_contains: status.to_string(),
        request: match href {
            Some(fragment) => RowRequest::Present {
                href_contains: fragment.to_string(),
            },
            None => RowRequest::Absent,
        },
    }
}

fn record(
    name: &str,
    goal: &str,
    bib: &str,
    limit_all: bool,
    warm_up: bool,
    items: Vec<ItemExpectation>,
) -> CheckSpec {
    CheckSpec {
        name: name.to_string(),
        goal: goal.to_string(),
        page: CheckPage::Record {
            bib: bib.to_string(),
            limit_all,
            warm_up,
            items,
        },
    }
}

fn search(
    name: &str,
    goal: &str,
    terms: &str,
    expected_documents: usize,
    rows: Vec<RowExpectation>,
) -> CheckSpec {
    CheckSpec {
        name: name.to_string(),
        goal: goal.to_string(),
        page: CheckPage::Search {
            query: format!("{MANUSCRIPTS_FACET}&q={terms}"),
            expected_documents,
            rows,
        },
    }
}

impl FixtureTable {
    /// The standard Hay Library checks, in run order: six record pages, then
    /// three searches.
    #[must_use]
    pub fn builtin() -> Self {
        let checks = vec![
            record(
                "beckwith-record",
                "`Archives/Manuscripts` at `ANNEX HAY` shows the easyrequest_hay request url.",
                "b5706110",
                false,
                false,
                vec![item(
                    ItemLocator::Position(0),
                    "ANNEX HAY",
                    "Ms.2010.010 Box 1",
                    "AVAILABLE",
                    easyrequest(),
                )],
            ),
            record(
                "yoken-record",
                "`Archives/Manuscripts` at `HAY MANUSCRIPTS` shows the direct Aeon request url, if the status is `AVAILABLE`.",
                "b3589814",
                false,
                false,
                vec![
                    item(
                        ItemLocator::Position(0),
                        "HAY MANUSCRIPTS",
                        "Oversize Box 1XX",
                        "--",
                        LinkExpectation::None,
                    ),
                    item(
                        ItemLocator::Position(1),
                        "HAY MANUSCRIPTS",
                        "Ms.2011.038 Box 1",
                        "AVAILABLE",
                        aeon(),
                    ),
                ],
            ),
            record(
                "john-hay-record",
                "`Archives/Manuscripts` items of varying locations show the proper request url, if the status is `AVAILABLE`.",
                "b2498067",
                true,
                true,
                vec![
                    item(
                        id("item_18327071x"),
                        "ANNEX HAY",
                        "Ms.HAY Box 1",
                        "AVAILABLE",
                        easyrequest(),
                    ),
                    item(
                        id("item_183270745"),
                        "ANNEX HAY",
                        "Ms.HAY Box 4",
                        "DUE 06-22-18",
                        LinkExpectation::None,
                    ),
                    item(
                        id("item_184781917"),
                        "HAY MANUSCRIPTS",
                        "Ms.HAY Box 20 - Photographs",
                        "AVAILABLE",
                        aeon(),
                    ),
                ],
            ),
            record(
                "gregorian-record",
                "`Archives/Manuscripts` items with `RESTRICTED` status cannot be requested.",
                "b4115486",
                false,
                false,
                vec![
                    item(
                        id("item_142740093"),
                        "ANNEX HAY",
                        "OF-1C-16 Box 1",
                        "RESTRICTED",
                        LinkExpectation::None,
                    ),
                    item(
                        id("item_142740287"),
                        "ANNEX HAY",
                        "OF-1C-16 Box 4",
                        "AVAILABLE",
                        easyrequest(),
                    ),
                ],
            ),
            record(
                "brown-record",
                "`Archives/Manuscripts` items that are `RESTRICTED` via call number cannot be requested.",
                "b3969016",
                true,
                true,
                vec![
                    item(
                        id("item_184782697"),
                        "ANNEX HAY",
                        "Ms.2007.012 Box 142 - RESTRICTED",
                        "AVAILABLE",
                        LinkExpectation::None,
                    ),
                    item(
                        id("item_140852803"),
                        "ANNEX HAY",
                        "Ms.2007.012 Box 8",
                        "AVAILABLE",
                        easyrequest(),
                    ),
                ],
            ),
            record(
                "microfilm-record",
                "`HAY MICROFLM` items are not requestable.",
                "b2734709",
                true,
                false,
                vec![item(
                    id("item_159973284"),
                    "HAY MICROFLM",
                    "F5701 reel 2",
                    "USE IN LIBRARY",
                    LinkExpectation::None,
                )],
            ),
            search(
                "beckwith-search",
                "`ANNEX HAY` items that are `AVAILABLE` have an easyrequest_hay link, and `HAY MANUSCRIPTS` items in `USE IN LIBRARY` have an Aeon link.",
                "beckwith",
                3,
                vec![
                    row(
                        "Ms.2010.010 Box 2",
                        "ANNEX HAY",
                        "AVAILABLE",
                        Some(EASYREQUEST),
                    ),
                    row(
                        "Ms.2015.016 Box 1, DVD 2 - Andes, Cheri",
                        "HAY MANUSCRIPTS",
                        "USE IN LIBRARY",
                        Some(AEON),
                    ),
                ],
            ),
            search(
                "yoken-search",
                "`HAY MANUSCRIPTS` items that are `AVAILABLE` have an Aeon link.",
                "yoken",
                1,
                vec![row(
                    "Ms.2011.038 Box 1",
                    "HAY MANUSCRIPTS",
                    "AVAILABLE",
                    Some(AEON),
                )],
            ),
            search(
                "john-hay-search",
                "Only `AVAILABLE` annex items are requestable across the John Hay papers results.",
                "John Hay Papers",
                10,
                vec![
                    row("Ms.HAY Box 2", "ANNEX HAY", "AVAILABLE", Some(EASYREQUEST)),
                    row("Ms.HAY Box 4", "ANNEX HAY", "DUE 06-22-18", None),
                    row("F5701 reel 2", "HAY MICROFLM", "USE IN LIBRARY", None),
                    row(
                        "1-SIZE E664.H41 A3 1997ms v.2",
                        "HAY JOHN-HAY",
                        "USE IN LIBRARY",
                        None,
                    ),
                ],
            ),
        ];

        Self { checks }
    }
}
