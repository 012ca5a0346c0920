use super::*;

#[test]
fn splits_url_into_path_and_query() {
    let history = MemoryHistory::from_url("/action-history?page=2&deviceFilter=1");
    assert_eq!(history.path(), "/action-history");
    assert_eq!(history.current_query(), "page=2&deviceFilter=1");
    assert_eq!(history.current_url(), "/action-history?page=2&deviceFilter=1");

    let history = MemoryHistory::from_url("/data-sensor");
    assert_eq!(history.current_query(), "");
    assert_eq!(history.current_url(), "/data-sensor");
}

#[test]
fn push_adds_entries_and_back_forward_walk_them() {
    let history = MemoryHistory::new("/data-sensor", "");
    history.push("page=1");
    history.push("?page=2");
    assert_eq!(history.len(), 3);
    assert_eq!(history.current_query(), "page=2");

    assert!(history.back());
    assert_eq!(history.current_query(), "page=1");
    assert!(history.back());
    assert_eq!(history.current_query(), "");
    assert!(!history.back());

    assert!(history.forward());
    assert_eq!(history.current_query(), "page=1");
}

#[test]
fn push_after_back_drops_forward_entries() {
    let history = MemoryHistory::new("/data-sensor", "");
    history.push("page=1");
    history.push("page=2");
    assert!(history.back());
    history.push("size=50");

    assert_eq!(history.entries(), vec!["", "page=1", "size=50"]);
    assert!(!history.forward());
}
