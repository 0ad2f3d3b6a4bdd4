//! Consistency rules for a fixture table.
//!
//! Everything here runs without a browser. Problems are collected rather than
//! returned one at a time so `hay-check validate` can list them all.

use super::{
    CheckPage, CheckSpec, FixtureTable, ItemExpectation, LinkExpectation, RequestLink,
    RowExpectation, RowRequest,
};
use crate::error::FixtureError;
use std::collections::{BTreeSet, HashSet};

impl FixtureTable {
    /// Checks the table against its contract.
    ///
    /// - names are unique and non-empty, every check states a goal
    /// - record checks name a bib and at least one item, with unique locators
    /// - each item's empty links and shown link partition the known link set
    /// - every shown link and every present row request carries a non-empty
    ///   href fragment
    /// - search checks name a query, expect at least one document, and key
    ///   their rows by unique call numbers
    ///
    /// # Errors
    ///
    /// Returns `Invalid` listing every problem found.
    pub fn validate(&self) -> Result<(), FixtureError> {
        let mut problems = Vec::new();

        if self.checks.is_empty() {
            problems.push("the table has no checks".to_string());
        }

        let mut seen = HashSet::new();
        for spec in &self.checks {
            if spec.name.trim().is_empty() {
                problems.push("a check has an empty name".to_string());
            } else if !seen.insert(spec.name.as_str()) {
                problems.push(format!("check '{}' is defined more than once", spec.name));
            }
            validate_check(spec, &mut problems);
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(FixtureError::Invalid { problems })
        }
    }
}

fn validate_check(spec: &CheckSpec, problems: &mut Vec<String>) {
    let name = &spec.name;

    if spec.goal.trim().is_empty() {
        problems.push(format!("{name}: goal is empty"));
    }

    match &spec.page {
        CheckPage::Record { bib, items, .. } => {
            if bib.trim().is_empty() {
                problems.push(format!("{name}: bib id is empty"));
            }
            if items.is_empty() {
                problems.push(format!("{name}: no items to check"));
            }

            let mut locators = HashSet::new();
            for item in items {
                if !locators.insert(&item.locator) {
                    problems.push(format!("{name}: {} is checked twice", item.locator));
                }
                validate_item(name, item, problems);
            }
        }
        CheckPage::Search {
            query,
            expected_documents,
            rows,
        } => {
            if query.trim().is_empty() {
                problems.push(format!("{name}: search query is empty"));
            }
            if *expected_documents == 0 {
                problems.push(format!("{name}: expected document count must be positive"));
            }
            if rows.is_empty() {
                problems.push(format!("{name}: no rows to check"));
            }

            let mut keys = HashSet::new();
            for row in rows {
                if !keys.insert(row.call_number.as_str()) {
                    problems.push(format!(
                        "{name}: call number `{}` is checked twice",
                        row.call_number
                    ));
                }
                validate_row(name, row, problems);
            }
        }
    }
}

fn validate_item(name: &str, item: &ItemExpectation, problems: &mut Vec<String>) {
    let label = &item.locator;

    if item.location.trim().is_empty() {
        problems.push(format!("{name}: {label} has an empty location"));
    }
    if item.call_number.trim().is_empty() {
        problems.push(format!("{name}: {label} has an empty call number"));
    }

    if let LinkExpectation::Only { link, href_contains } = &item.links {
        if href_contains.trim().is_empty() {
            problems.push(format!("{name}: {label} shows {link} without an href fragment"));
        }
    }

    let empty: BTreeSet<RequestLink> = item.links.empty().into_iter().collect();
    let shown: BTreeSet<RequestLink> = item.links.shown().into_iter().collect();
    let known: BTreeSet<RequestLink> = RequestLink::ALL.into_iter().collect();

    if !empty.is_disjoint(&shown) {
        problems.push(format!("{name}: {label} expects a link both shown and empty"));
    }
    if empty.union(&shown).copied().collect::<BTreeSet<_>>() != known {
        problems.push(format!("{name}: {label} leaves some request links unchecked"));
    }
}

fn validate_row(name: &str, row: &RowExpectation, problems: &mut Vec<String>) {
    let key = &row.call_number;

    if key.trim().is_empty() {
        problems.push(format!("{name}: a row has an empty call number"));
    }
    if row.location.trim().is_empty() {
        problems.push(format!("{name}: row `{key}` has an empty location"));
    }
    if row.status_contains.trim().is_empty() {
        problems.push(format!("{name}: row `{key}` has an empty status"));
    }
    if let RowRequest::Present { href_contains } = &row.request {
        if href_contains.trim().is_empty() {
            problems.push(format!(
                "{name}: row `{key}` expects a request link without an href fragment"
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ItemLocator;

    fn problems(table: &FixtureTable) -> Vec<String> {
        match table.validate() {
            Err(FixtureError::Invalid { problems }) => problems,
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    fn record_with(items: Vec<ItemExpectation>) -> CheckSpec {
        CheckSpec {
            name: "sample".into(),
            goal: "sample goal".into(),
            page: CheckPage::Record {
                bib: "b0000001".into(),
                limit_all: false,
                warm_up: false,
                items,
            },
        }
    }

    fn available(locator: ItemLocator, links: LinkExpectation) -> ItemExpectation {
        ItemExpectation {
            locator,
            location: "ANNEX HAY".into(),
            call_number: "Ms.1 Box 1".into(),
            status: "AVAILABLE".into(),
            links,
        }
    }

    #[test]
    fn empty_table_is_invalid() {
        assert_eq!(problems(&FixtureTable::default()), vec!["the table has no checks"]);
    }

    #[test]
    fn duplicate_names_are_reported() {
        let spec = record_with(vec![available(ItemLocator::Position(0), LinkExpectation::None)]);
        let table = FixtureTable {
            checks: vec![spec.clone(), spec],
        };
        assert_eq!(
            problems(&table),
            vec!["check 'sample' is defined more than once"]
        );
    }

    #[test]
    fn shown_link_needs_fragment() {
        let table = FixtureTable {
            checks: vec![record_with(vec![available(
                ItemLocator::Id("item_1".into()),
                LinkExpectation::Only {
                    link: RequestLink::Scan,
                    href_contains: "  ".into(),
                },
            )])],
        };
        assert_eq!(
            problems(&table),
            vec!["sample: item `item_1` shows scan without an href fragment"]
        );
    }

    #[test]
    fn duplicate_locators_and_missing_items_are_reported() {
        let twice = FixtureTable {
            checks: vec![record_with(vec![
                available(ItemLocator::Position(1), LinkExpectation::None),
                available(ItemLocator::Position(1), LinkExpectation::None),
            ])],
        };
        assert_eq!(problems(&twice), vec!["sample: item #2 is checked twice"]);

        let none = FixtureTable {
            checks: vec![record_with(Vec::new())],
        };
        assert_eq!(problems(&none), vec!["sample: no items to check"]);
    }

    #[test]
    fn search_problems_are_all_collected() {
        let table = FixtureTable {
            checks: vec![CheckSpec {
                name: "search".into(),
                goal: String::new(),
                page: CheckPage::Search {
                    query: String::new(),
                    expected_documents: 0,
                    rows: vec![RowExpectation {
                        call_number: "Ms.1".into(),
                        location: "ANNEX HAY".into(),
                        status_contains: "AVAILABLE".into(),
                        request: RowRequest::Present {
                            href_contains: String::new(),
                        },
                    }],
                },
            }],
        };
        assert_eq!(
            problems(&table),
            vec![
                "search: goal is empty",
                "search: search query is empty",
                "search: expected document count must be positive",
                "search: row `Ms.1` expects a request link without an href fragment",
            ]
        );
    }
}
