//! Repository paging and extrinsic detail against a scripted archive

mod common;

use serde_json::json;

use calamar::domain::fetcher::{FetchOptions, ResourceFetcher};
use calamar::domain::filter::FilterExpr;
use calamar::domain::pagination::Page;
use calamar::domain::resource::Resource;
use calamar::infrastructure::archive::{Archive, Event};
use calamar::modules::detail::load_extrinsic_detail;
use calamar::{DataAccessError, FilterError, QueryError, ValidationError};
use common::{block_row, event_row, extrinsic_row, MockArchive};

#[tokio::test]
async fn test_fetch_page_combines_rows_and_count() {
    let mock = MockArchive::new()
        .on(
            &["blocksConnection("],
            json!({ "blocksConnection": { "totalCount": 95 } }),
        )
        .on(
            &["blocks(", "limit: 25, offset: 25"],
            json!({ "blocks": [block_row("0000000070-aa", 70), block_row("0000000069-bb", 69)] }),
        );

    let page = mock
        .archive()
        .blocks()
        .fetch_page(None, Page::new(2, 25).unwrap(), Some("height_DESC"))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].height, 70);
    assert_eq!(page.page_info.total_page_count, 4);
    assert!(page.page_info.has_next_page);
    assert!(mock
        .queries()
        .iter()
        .any(|query| query.contains("orderBy: height_DESC")));
}

#[tokio::test]
async fn test_filter_reaches_both_list_and_count() {
    let mock = MockArchive::new();
    let filter = FilterExpr::eq("name", "Balances.Transfer");

    mock.archive()
        .events()
        .fetch_page(Some(&filter), Page::first(10).unwrap(), None)
        .await
        .unwrap();

    let queries = mock.queries();
    assert_eq!(queries.len(), 2);
    assert!(queries
        .iter()
        .all(|query| query.contains(r#"where: {name_eq: "Balances.Transfer"}"#)));
}

#[tokio::test]
async fn test_invalid_requests_never_reach_the_archive() {
    let mock = MockArchive::new();
    let archive = mock.archive();

    let err = archive
        .events()
        .list(10, 0, Some(&FilterExpr::eq("height", 7i64)), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Filter(FilterError::UnsupportedPredicate { .. })
    ));

    let err = archive
        .calls()
        .list(10, 0, None, Some("name_ASC"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Validation(ValidationError::UnsupportedOrder { .. })
    ));

    assert!(mock.queries().is_empty());
}

#[tokio::test]
async fn test_backend_errors_surface_as_data_access() {
    let mock = MockArchive::new().fail(
        &["events("],
        DataAccessError::Backend {
            messages: vec!["timeout".into()],
        },
    );

    let err = mock.archive().events().list(10, 0, None, None).await.unwrap_err();
    assert!(err.is_data_access());
    assert_eq!(err.to_string(), "archive rejected query: timeout");
}

#[tokio::test]
async fn test_missing_root_is_malformed() {
    let mock = MockArchive::new().on(&["calls("], json!({ "other": [] }));

    let err = mock.archive().calls().list(10, 0, None, None).await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::DataAccess(DataAccessError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_extrinsic_detail_loads_children_in_order() {
    let id = "0000000010-000001-5f2a1";
    let mock = MockArchive::new()
        .on(
            &["extrinsics(", "id_eq"],
            json!({ "extrinsics": [extrinsic_row(id, "0x01")] }),
        )
        .on(
            &["events(", "extrinsic: {id_eq"],
            json!({ "events": [
                event_row("0000000010-000001-5f2a1-0", "System.ExtrinsicSuccess"),
                event_row("0000000010-000001-5f2a1-1", "Balances.Transfer"),
            ] }),
        );

    let detail = load_extrinsic_detail(&mock.archive(), id).await.unwrap();

    assert_eq!(detail.extrinsic.data().map(|ext| ext.id.as_str()), Some(id));
    assert_eq!(detail.events.items().len(), 2);
    assert!(detail.calls.items().is_empty());
    assert!(!detail.calls.not_found());

    let queries = mock.queries();
    assert_eq!(queries.len(), 3);
    assert!(queries
        .iter()
        .filter(|query| !query.starts_with("query { extrinsics("))
        .all(|query| query.contains("orderBy: id_ASC")));
}

#[tokio::test]
async fn test_detail_parts_fail_independently() {
    let id = "0000000010-000001-5f2a1";
    let mock = MockArchive::new()
        .fail(&["calls("], DataAccessError::Transport("reset".into()))
        .on(
            &["extrinsics("],
            json!({ "extrinsics": [extrinsic_row(id, "0x01")] }),
        );

    let detail = load_extrinsic_detail(&mock.archive(), id).await.unwrap();

    assert!(detail.extrinsic.data().is_some());
    assert!(detail.events.items().is_empty());
    assert_eq!(
        detail.calls.error(),
        Some(&DataAccessError::Transport("reset".into()))
    );
    let rendered = detail.to_json().unwrap();
    assert_eq!(rendered["errors"], json!(["archive request failed: reset"]));
    assert_eq!(rendered["extrinsic"]["id"], json!(id));
    assert_eq!(rendered["calls"], json!([]));
}

#[tokio::test]
async fn test_fetcher_over_repository() {
    let mock = MockArchive::new().on(
        &["events(", r#"name_eq: "Balances.Transfer""#],
        json!({ "events": [event_row("0000000010-000003-5f2a1", "Balances.Transfer")] }),
    );
    let archive = mock.archive();

    let fetcher: ResourceFetcher<Vec<Event>, FilterExpr> =
        ResourceFetcher::new(move |_context: String, filter: FilterExpr| {
            let archive: Archive = archive.clone();
            Box::pin(async move {
                let rows = archive.events().list(10, 0, Some(&filter), None).await?;
                Ok::<_, QueryError>(Some(rows))
            })
        });

    let filter = FilterExpr::eq("name", "Balances.Transfer");
    fetcher
        .update(Some("polkadot"), &filter, FetchOptions::default())
        .await
        .unwrap();
    assert_eq!(fetcher.resource().items().len(), 1);

    // same key is not fetched again
    fetcher
        .update(Some("polkadot"), &filter, FetchOptions::default())
        .await
        .unwrap();
    assert_eq!(mock.queries().len(), 1);

    fetcher.refetch().await.unwrap();
    assert_eq!(mock.queries().len(), 2);
    assert!(matches!(fetcher.resource(), Resource::Ready(Some(_))));
}
