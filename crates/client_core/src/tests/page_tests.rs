use super::*;
use shared::domain::{ReadingId, SensorReading};

#[test]
fn total_pages_is_ceiling_of_items_over_size() {
    for total_items in 0..200u64 {
        for page_size in 1..30u32 {
            let expected = (total_items + u64::from(page_size) - 1) / u64::from(page_size);
            assert_eq!(expected_total_pages(total_items, page_size), expected);
        }
    }
    assert_eq!(expected_total_pages(10, 0), 0);
}

#[test]
fn parses_paginated_envelope() {
    let body = br#"{
        "content": [{"id": 7, "temperature": 22.5, "humidity": 40.0, "lightLevel": 12, "createdAt": "2024-05-01T10:00:00"}],
        "currentPage": 1,
        "totalPages": 3,
        "totalElements": 21,
        "size": 10,
        "first": false,
        "last": false,
        "search": null,
        "searchType": "Auto Detect"
    }"#;

    let page: ListPage<SensorReading> = parse_page(body).expect("page");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, ReadingId(7));
    assert_eq!(page.current_page, 1);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_items, 21);
    assert!(!page.is_first && !page.is_last);
    assert_eq!(page.item_range(), Some((11, 20)));
}

#[test]
fn missing_fields_are_parse_errors() {
    let err = parse_page::<SensorReading>(br#"{"content": [], "currentPage": 0}"#)
        .expect_err("must fail");
    assert!(matches!(err, ListError::Parse(_)), "unexpected error: {err:?}");

    let err = parse_page::<SensorReading>(b"not json").expect_err("must fail");
    assert!(matches!(err, ListError::Parse(_)));
}

#[test]
fn zero_page_size_is_rejected() {
    let err = parse_page::<SensorReading>(
        br#"{"content":[],"currentPage":0,"totalPages":0,"totalElements":0,"size":0,"first":true,"last":true}"#,
    )
    .expect_err("must fail");
    assert!(matches!(err, ListError::Parse(_)));
}

#[test]
fn empty_result_sets_tolerate_zero_or_one_total_pages() {
    for total_pages in [0, 1] {
        let body = format!(
            r#"{{"content":[],"currentPage":0,"totalPages":{total_pages},"totalElements":0,"size":10,"first":true,"last":true}}"#
        );
        let page: ListPage<SensorReading> = parse_page(body.as_bytes()).expect("page");
        assert!(page.is_empty());
        assert_eq!(page.item_range(), None);
    }
}

#[test]
fn last_page_range_is_clamped_to_total() {
    let page = ListPage {
        items: vec![1, 2, 3],
        current_page: 2,
        page_size: 10,
        total_items: 23,
        total_pages: 3,
        is_first: false,
        is_last: true,
    };
    assert_eq!(page.item_range(), Some((21, 23)));
    assert!(page.contains_page(2));
    assert!(!page.contains_page(3));
    assert_eq!(page.map(|n| n * 2).items, vec![2, 4, 6]);
}

#[test]
fn empty_page_has_no_navigable_pages() {
    let page = ListPage::<u8>::empty(10);
    assert!(!page.contains_page(0));
    assert_eq!(page.item_range(), None);
}
