//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio_test::{assert_err, assert_ok};
use url::Url;

const BASE: &str = "https://api.test/v2.0/items";

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Item {
    id: String,
}

/// Serves canned bodies by exact URL and records every fetch
#[derive(Default)]
struct FakeTransport {
    pages: HashMap<String, Value>,
    failures: HashMap<String, u16>,
    fetched: Mutex<Vec<String>>,
}

impl FakeTransport {
    fn page(mut self, url: &str, body: Value) -> Self {
        self.pages.insert(url.to_string(), body);
        self
    }

    fn failing(mut self, url: &str, status: u16) -> Self {
        self.failures.insert(url.to_string(), status);
        self
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get_page(&self, url: &str) -> Result<PageResult> {
        self.fetched.lock().unwrap().push(url.to_string());
        if let Some(status) = self.failures.get(url) {
            return Err(Error::http_status(*status, "fake failure"));
        }
        let body = self
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::http_status(404, url.to_string()))?;
        Ok(PageResult::new(Url::parse(url)?, 200, body))
    }
}

fn page_url(n: usize) -> String {
    if n == 1 {
        BASE.to_string()
    } else {
        format!("{BASE}?page={n}")
    }
}

/// `count` linked pages of two items each, the last without a next link
fn linked_pages(count: usize) -> FakeTransport {
    let mut transport = FakeTransport::default();
    for n in 1..=count {
        let mut body = json!({
            "items": [{"id": format!("{n}a")}, {"id": format!("{n}b")}]
        });
        if n < count {
            body["items_links"] = json!([{"href": page_url(n + 1), "rel": "next"}]);
        }
        transport = transport.page(&page_url(n), body);
    }
    transport
}

fn linked_pager(transport: &FakeTransport) -> Pager<'_, LinkedPageBase> {
    Pager::new(transport, BASE, |r| LinkedPageBase::new(r, "items"))
}

fn extract_items(page: &impl Page) -> Result<Vec<Item>> {
    extract_collection(&page.result().body, "items")
}

fn result_with(body: Value) -> PageResult {
    PageResult::new(Url::parse(BASE).unwrap(), 200, body)
}

// ============================================================================
// PageResult / extraction
// ============================================================================

#[test]
fn test_page_result_from_empty_body() {
    let result = PageResult::from_body(Url::parse(BASE).unwrap(), 204, "  ").unwrap();
    assert_eq!(result.body, Value::Null);
    assert!(result.has_no_records("items"));
}

#[test]
fn test_page_result_from_invalid_body() {
    let err = PageResult::from_body(Url::parse(BASE).unwrap(), 200, "<html>").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_extract_collection_preserves_order() {
    let body = json!({"items": [{"id": "b"}, {"id": "a"}, {"id": "c"}]});
    let items: Vec<Item> = extract_collection(&body, "items").unwrap();
    let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
}

#[test]
fn test_extract_collection_absent_or_null_is_empty() {
    let items: Vec<Item> = extract_collection(&json!({}), "items").unwrap();
    assert!(items.is_empty());

    let items: Vec<Item> = extract_collection(&json!({"items": null}), "items").unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_extract_collection_rejects_malformed_body() {
    let err = extract_collection::<Item>(&json!({"items": {"id": "a"}}), "items").unwrap_err();
    assert!(err.to_string().contains("expected 'items' to be an array"));

    let err = extract_collection::<Item>(&json!({"items": [{"id": 7}]}), "items").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("items[0]"));
}

// ============================================================================
// LinkedPageBase
// ============================================================================

#[test]
fn test_linked_page_next_url() {
    let page = LinkedPageBase::new(
        result_with(json!({
            "items": [{"id": "a"}],
            "items_links": [
                {"href": "https://api.test/v2.0/items?marker=z", "rel": "previous"},
                {"href": "https://api.test/v2.0/items?marker=a", "rel": "next"}
            ]
        })),
        "items",
    );

    assert!(!page.is_empty());
    assert_eq!(
        page.next_page_url().unwrap(),
        Some("https://api.test/v2.0/items?marker=a".to_string())
    );
}

#[test]
fn test_linked_page_resolves_relative_href() {
    let page = LinkedPageBase::new(
        result_with(json!({
            "items": [{"id": "a"}],
            "items_links": [{"href": "items?marker=a", "rel": "next"}]
        })),
        "items",
    );

    assert_eq!(
        page.next_page_url().unwrap(),
        Some("https://api.test/v2.0/items?marker=a".to_string())
    );
}

#[test]
fn test_linked_page_without_next_is_last() {
    let no_links = LinkedPageBase::new(result_with(json!({"items": [{"id": "a"}]})), "items");
    assert_eq!(no_links.next_page_url().unwrap(), None);

    let only_previous = LinkedPageBase::new(
        result_with(json!({
            "items": [{"id": "a"}],
            "items_links": [{"href": "https://api.test/prev", "rel": "previous"}]
        })),
        "items",
    );
    assert_eq!(only_previous.next_page_url().unwrap(), None);
}

#[test]
fn test_linked_page_malformed_links() {
    let not_array = LinkedPageBase::new(
        result_with(json!({"items": [], "items_links": {"next": "x"}})),
        "items",
    );
    assert!(matches!(
        not_array.next_page_url(),
        Err(Error::Link { .. })
    ));

    let href_not_string = LinkedPageBase::new(
        result_with(json!({"items": [], "items_links": [{"href": 42, "rel": "next"}]})),
        "items",
    );
    let err = href_not_string.next_page_url().unwrap_err();
    assert!(err.to_string().contains("must be a string, found number"));

    let missing_href = LinkedPageBase::new(
        result_with(json!({"items": [], "items_links": [{"rel": "next"}]})),
        "items",
    );
    assert!(matches!(
        missing_href.next_page_url(),
        Err(Error::Link { .. })
    ));
}

#[test]
fn test_linked_page_custom_links_key() {
    let page = LinkedPageBase::new(
        result_with(json!({
            "items": [{"id": "a"}],
            "links": [{"href": "https://api.test/next", "rel": "next"}]
        })),
        "items",
    )
    .with_links_key("links");

    assert_eq!(
        page.next_page_url().unwrap(),
        Some("https://api.test/next".to_string())
    );
}

#[test]
fn test_is_empty_variants() {
    assert!(LinkedPageBase::new(result_with(json!({"items": []})), "items").is_empty());
    assert!(LinkedPageBase::new(result_with(json!({})), "items").is_empty());
    // Malformed collections are not empty: the visitor must see the decode error
    assert!(!LinkedPageBase::new(result_with(json!({"items": "oops"})), "items").is_empty());
}

// ============================================================================
// MarkerPageBase / SinglePageBase
// ============================================================================

#[test]
fn test_marker_page_keeps_filters_and_replaces_marker() {
    let url = Url::parse("https://api.test/v1.0/instances/i1/databases?limit=2&marker=old").unwrap();
    let page = MarkerPageBase::new(
        PageResult::new(
            url,
            200,
            json!({"databases": [{"name": "a"}, {"name": "b"}]}),
        ),
        "databases",
        "name",
    );

    assert_eq!(page.last_marker().unwrap(), Some("b".to_string()));
    assert_eq!(
        page.next_page_url().unwrap(),
        Some("https://api.test/v1.0/instances/i1/databases?limit=2&marker=b".to_string())
    );
}

#[test]
fn test_marker_page_without_records_is_last() {
    let page = MarkerPageBase::new(result_with(json!({"databases": []})), "databases", "name");
    assert!(page.is_empty());
    assert_eq!(page.next_page_url().unwrap(), None);
}

#[test]
fn test_marker_page_missing_marker_field() {
    let page = MarkerPageBase::new(
        result_with(json!({"databases": [{"character_set": "utf8"}]})),
        "databases",
        "name",
    );
    assert!(matches!(page.next_page_url(), Err(Error::Link { .. })));
}

#[test]
fn test_single_page_never_links() {
    let page = SinglePageBase::new(
        result_with(json!({
            "items": [{"id": "a"}],
            "items_links": [{"href": "https://api.test/next", "rel": "next"}]
        })),
        "items",
    );
    assert!(!page.is_empty());
    assert_eq!(page.next_page_url().unwrap(), None);
}

// ============================================================================
// Pager::each_page
// ============================================================================

#[tokio::test]
async fn test_each_page_visits_every_linked_page_in_order() {
    let transport = linked_pages(4);
    let mut seen = Vec::new();

    let result = linked_pager(&transport)
        .each_page(|page| {
            seen.push(page.result().url.to_string());
            Ok(true)
        })
        .await;

    assert_ok!(result);
    let expected: Vec<String> = (1..=4)
        .map(|n| Url::parse(&page_url(n)).unwrap().to_string())
        .collect();
    assert_eq!(seen, expected);
    assert_eq!(transport.fetched().len(), 4);
}

#[tokio::test]
async fn test_each_page_skips_empty_terminal_page() {
    let transport = FakeTransport::default()
        .page(
            &page_url(1),
            json!({
                "items": [{"id": "a"}, {"id": "b"}],
                "items_links": [{"href": page_url(2), "rel": "next"}]
            }),
        )
        .page(
            &page_url(2),
            json!({
                "items": [{"id": "c"}, {"id": "d"}],
                "items_links": [{"href": page_url(3), "rel": "next"}]
            }),
        )
        .page(&page_url(3), json!({"items": []}));

    let mut calls = 0;
    let mut ids = Vec::new();

    let result = linked_pager(&transport)
        .each_page(|page| {
            calls += 1;
            ids.extend(extract_items(&page)?.into_iter().map(|i| i.id));
            Ok(true)
        })
        .await;

    assert_ok!(result);
    assert_eq!(calls, 2);
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
    assert_eq!(transport.fetched().len(), 3);
}

#[tokio::test]
async fn test_each_page_empty_second_page_not_visited() {
    let transport = FakeTransport::default()
        .page(
            &page_url(1),
            json!({
                "items": [{"id": "a"}],
                "items_links": [{"href": page_url(2), "rel": "next"}]
            }),
        )
        .page(
            &page_url(2),
            json!({
                "items": [],
                "items_links": [{"href": page_url(3), "rel": "next"}]
            }),
        );

    let mut calls = 0;
    let result = linked_pager(&transport)
        .each_page(|_| {
            calls += 1;
            Ok(true)
        })
        .await;

    assert_ok!(result);
    assert_eq!(calls, 1);
    assert_eq!(transport.fetched().len(), 2);
}

#[tokio::test]
async fn test_each_page_stops_when_visitor_declines() {
    let transport = linked_pages(5);
    let mut calls = 0;

    let result = linked_pager(&transport)
        .each_page(|_| {
            calls += 1;
            Ok(calls < 2)
        })
        .await;

    assert_ok!(result);
    assert_eq!(calls, 2);
    assert_eq!(transport.fetched(), vec![page_url(1), page_url(2)]);
}

#[tokio::test]
async fn test_each_page_returns_visitor_error_unchanged() {
    let transport = linked_pages(5);

    let err = linked_pager(&transport)
        .each_page(|_| Err(Error::other("visitor gave up")))
        .await
        .unwrap_err();

    assert!(matches!(&err, Error::Other(msg) if msg == "visitor gave up"));
    assert_eq!(transport.fetched(), vec![page_url(1)]);
}

#[tokio::test]
async fn test_each_page_surfaces_decode_error_through_visitor() {
    let transport = FakeTransport::default().page(&page_url(1), json!({"items": "not-a-list"}));
    let mut calls = 0;

    let err = linked_pager(&transport)
        .each_page(|page| {
            calls += 1;
            extract_items(&page)?;
            Ok(true)
        })
        .await
        .unwrap_err();

    assert_eq!(calls, 1);
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_each_page_link_error_after_visitor() {
    let transport = FakeTransport::default().page(
        &page_url(1),
        json!({
            "items": [{"id": "a"}],
            "items_links": [{"href": ["bad"], "rel": "next"}]
        }),
    );

    let mut visited = Vec::new();
    let result = linked_pager(&transport)
        .each_page(|page| {
            visited.extend(extract_items(&page)?);
            Ok(true)
        })
        .await;

    let err = assert_err!(result);
    assert!(matches!(err, Error::Link { .. }));
    assert_eq!(visited, vec![Item { id: "a".into() }]);
    assert_eq!(transport.fetched().len(), 1);
}

#[tokio::test]
async fn test_each_page_link_error_ignored_when_visitor_stops() {
    let transport = FakeTransport::default().page(
        &page_url(1),
        json!({
            "items": [{"id": "a"}],
            "items_links": "garbage"
        }),
    );

    let result = linked_pager(&transport).each_page(|_| Ok(false)).await;
    assert_ok!(result);
}

#[tokio::test]
async fn test_each_page_rejects_link_back_to_same_page() {
    let transport = FakeTransport::default().page(
        &page_url(1),
        json!({
            "items": [{"id": "a"}],
            "items_links": [{"href": page_url(1), "rel": "next"}]
        }),
    );

    let mut calls = 0;
    let err = linked_pager(&transport)
        .each_page(|_| {
            calls += 1;
            Ok(true)
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Link { .. }));
    assert_eq!(calls, 1);
    assert_eq!(transport.fetched(), vec![page_url(1)]);
}

#[tokio::test]
async fn test_each_page_rejects_repeated_marker_page() {
    let first = "https://api.test/v1.0/instances/i1/databases";
    let repeated = "https://api.test/v1.0/instances/i1/databases?marker=b";
    let body = json!({"databases": [{"name": "a"}, {"name": "b"}]});

    let transport = FakeTransport::default()
        .page(first, body.clone())
        .page(repeated, body);

    let pager = Pager::new(&transport, first, |r| {
        MarkerPageBase::new(r, "databases", "name")
    });

    let mut calls = 0;
    let err = pager
        .each_page(|_| {
            calls += 1;
            Ok(true)
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Link { .. }));
    assert_eq!(calls, 2);
    assert_eq!(transport.fetched(), vec![first, repeated]);
}

#[tokio::test]
async fn test_each_page_transport_error_is_terminal() {
    let transport = linked_pages(3).failing(&page_url(2), 503);
    let mut calls = 0;

    let err = linked_pager(&transport)
        .each_page(|_| {
            calls += 1;
            Ok(true)
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(calls, 1);
    assert_eq!(transport.fetched(), vec![page_url(1), page_url(2)]);
}

#[tokio::test]
async fn test_invalid_pager_never_fetches() {
    let transport = linked_pages(2);
    let pager: Pager<'_, LinkedPageBase> = Pager::invalid(
        &transport,
        Error::required("instance_id"),
        |r| LinkedPageBase::new(r, "items"),
    );

    let mut calls = 0;
    let err = pager
        .each_page(|_| {
            calls += 1;
            Ok(true)
        })
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(calls, 0);
    assert!(transport.fetched().is_empty());
}

#[tokio::test]
async fn test_empty_initial_url_is_terminal() {
    let transport = FakeTransport::default();
    let pager = Pager::new(&transport, "", |r| LinkedPageBase::new(r, "items"));

    assert_ok!(pager.each_page(|_| Ok(true)).await);
    assert!(transport.fetched().is_empty());
}

#[tokio::test]
async fn test_marker_pagination_end_to_end() {
    let first = "https://api.test/v1.0/instances/i1/databases?limit=2";
    let second = "https://api.test/v1.0/instances/i1/databases?limit=2&marker=b";
    let third = "https://api.test/v1.0/instances/i1/databases?limit=2&marker=c";

    let transport = FakeTransport::default()
        .page(first, json!({"databases": [{"name": "a"}, {"name": "b"}]}))
        .page(second, json!({"databases": [{"name": "c"}]}))
        .page(third, json!({"databases": []}));

    let pager = Pager::new(&transport, first, |r| {
        MarkerPageBase::new(r, "databases", "name")
    });

    let names = pager
        .extract_all(|page| {
            let records = page.result().records("databases").cloned().unwrap_or_default();
            Ok(records
                .into_iter()
                .filter_map(|r| r["name"].as_str().map(String::from))
                .collect())
        })
        .await
        .unwrap();

    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(transport.fetched(), vec![first, second, third]);
}

#[tokio::test]
async fn test_single_page_fetches_once() {
    let transport = FakeTransport::default().page(
        BASE,
        json!({"items": [{"id": "a"}, {"id": "b"}]}),
    );
    let pager = Pager::new(&transport, BASE, |r| SinglePageBase::new(r, "items"));

    let pages = pager.all_pages().await.unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(extract_items(&pages[0]).unwrap().len(), 2);
    assert_eq!(transport.fetched().len(), 1);
}

#[tokio::test]
async fn test_extract_all_concatenates_pages() {
    let transport = linked_pages(3);
    let items = linked_pager(&transport)
        .extract_all(|page| extract_items(page))
        .await
        .unwrap();

    let ids: Vec<_> = items.into_iter().map(|i| i.id).collect();
    assert_eq!(ids, vec!["1a", "1b", "2a", "2b", "3a", "3b"]);
}
