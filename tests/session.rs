//! Session flow tests
//!
//! Drives the picker, export and create flows end to end against the
//! in-memory cloud.

use std::sync::Arc;
use std::time::Duration;

use dropbox_export::cloud::{MemoryCloud, NetworkActivity, SharedClient};
use dropbox_export::error::AppError;
use dropbox_export::local::MemoryStore;
use dropbox_export::models::{AlertAction, CreatorPhase, FileKind, ScreenView, SessionView};
use dropbox_export::navigation::{ScreenHandle, Session};

// =============================================================================
// Test Setup
// =============================================================================

struct Harness {
    session: Arc<Session>,
    cloud: Arc<MemoryCloud>,
    activity: NetworkActivity,
    host: ScreenHandle,
}

fn harness_with(cloud: MemoryCloud, store: MemoryStore) -> Harness {
    let cloud = Arc::new(cloud);
    let activity = NetworkActivity::default();
    let client: SharedClient = cloud.clone();
    let session = Arc::new(Session::new(Some(client), Arc::new(store), activity.clone()));
    let host = session.push_host("editor").unwrap();
    Harness {
        session,
        cloud,
        activity,
        host,
    }
}

fn harness(cloud: MemoryCloud) -> Harness {
    harness_with(cloud, MemoryStore::new())
}

fn sample_cloud() -> MemoryCloud {
    MemoryCloud::new()
        .with_folder("/reports")
        .with_folder("/reports/2024")
        .with_folder("/archive")
        .with_file("/readme.txt", b"hi")
        .with_file("/archive/old.txt", b"old")
}

fn view(session: &Session) -> SessionView {
    session.snapshot().unwrap()
}

fn top(session: &Session) -> ScreenView {
    view(session).screens.last().cloned().unwrap()
}

fn picker_rows(screen: &ScreenView) -> Vec<String> {
    match screen {
        ScreenView::Picker { state, .. } => state.children.iter().map(|e| e.name.clone()).collect(),
        other => panic!("expected picker, got {:?}", other),
    }
}

/// Opens a picker at `/` and drills into the root listing.
async fn open_root_listing(h: &Harness) -> ScreenHandle {
    let root = h
        .session
        .open_picker(h.host, "/", "a.txt", b"hello".to_vec())
        .await
        .unwrap();
    h.session.drill_into(root, 0).await.unwrap()
}

// =============================================================================
// Directory picker
// =============================================================================

#[tokio::test]
async fn test_root_picker_shows_single_row_without_fetch() {
    let h = harness(sample_cloud());

    h.session
        .open_picker(h.host, "/", "a.txt", b"hello".to_vec())
        .await
        .unwrap();

    assert_eq!(picker_rows(&top(&h.session)), vec!["/"]);
    assert_eq!(h.cloud.call_count(), 0);
}

#[tokio::test]
async fn test_drill_walkthrough() {
    let h = harness(sample_cloud());

    let listing = open_root_listing(&h).await;
    let screen = top(&h.session);
    assert_eq!(screen.handle(), listing);
    // Folders only, files filtered out
    assert_eq!(picker_rows(&screen), vec!["archive", "reports"]);

    let reports = h.session.drill_into(listing, 1).await.unwrap();
    let screen = top(&h.session);
    assert_eq!(screen.handle(), reports);
    match &screen {
        ScreenView::Picker { state, loading, .. } => {
            assert_eq!(state.current_path, "/reports");
            assert!(!loading);
        }
        other => panic!("expected picker, got {:?}", other),
    }
    assert_eq!(picker_rows(&screen), vec!["2024"]);
    assert_eq!(view(&h.session).screens.len(), 4);
}

#[tokio::test]
async fn test_drill_out_of_range_is_rejected() {
    let h = harness(sample_cloud());
    let listing = open_root_listing(&h).await;

    let err = h.session.drill_into(listing, 9).await.unwrap_err();

    assert!(matches!(err, AppError::InvalidIndex { index: 9, len: 2 }));
    assert_eq!(view(&h.session).screens.len(), 3);
    assert!(view(&h.session).alerts.is_empty());
}

#[tokio::test]
async fn test_toggle_clears_selection() {
    let h = harness(sample_cloud());
    let listing = open_root_listing(&h).await;

    h.session.toggle_row(listing, 0).unwrap();
    h.session.toggle_row(listing, 0).unwrap();

    match top(&h.session) {
        ScreenView::Picker { state, .. } => assert_eq!(state.selected_index, None),
        other => panic!("expected picker, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_listing_alerts_and_pops_on_dismiss() {
    let h = harness(sample_cloud());
    let listing = open_root_listing(&h).await;

    // /archive only holds a file
    let err = h.session.drill_into(listing, 0).await.unwrap_err();
    assert!(matches!(err, AppError::EmptyResult(_)));

    let snapshot = view(&h.session);
    assert_eq!(snapshot.screens.len(), 4);
    let empty = snapshot.screens[3].handle();
    assert!(picker_rows(&snapshot.screens[3]).is_empty());
    assert_eq!(snapshot.alerts.len(), 1);
    assert_eq!(snapshot.alerts[0].on_dismiss, AlertAction::PopScreen(empty));
    assert_eq!(snapshot.alerts[0].buttons, vec!["Close"]);

    h.session.dismiss_alert(snapshot.alerts[0].id).unwrap();

    let snapshot = view(&h.session);
    assert_eq!(snapshot.screens.len(), 3);
    assert_eq!(snapshot.screens[2].handle(), listing);
    assert!(snapshot.alerts.is_empty());
}

#[tokio::test]
async fn test_listing_failure_alerts_and_stays() {
    let h = harness(sample_cloud());
    let root = h
        .session
        .open_picker(h.host, "/", "a.txt", b"hello".to_vec())
        .await
        .unwrap();
    h.cloud.set_failing(true);

    let err = h.session.drill_into(root, 0).await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));

    let snapshot = view(&h.session);
    assert_eq!(snapshot.screens.len(), 3);
    assert_eq!(snapshot.alerts.len(), 1);
    assert_eq!(snapshot.alerts[0].on_dismiss, AlertAction::None);

    // Retry once the network is back
    h.cloud.set_failing(false);
    let listing = snapshot.screens[2].handle();
    h.session.refresh_picker(listing).await.unwrap();
    assert_eq!(picker_rows(&top(&h.session)), vec!["archive", "reports"]);
}

#[tokio::test]
async fn test_refresh_root_picker_keeps_synthetic_row() {
    let h = harness(sample_cloud());
    let root = h
        .session
        .open_picker(h.host, "/", "a.txt", b"hello".to_vec())
        .await
        .unwrap();

    h.session.refresh_picker(root).await.unwrap();

    assert_eq!(picker_rows(&top(&h.session)), vec!["/"]);
    assert_eq!(h.cloud.call_count(), 0);

    h.session.select_row(root, 0).unwrap();
    h.session.confirm_selection(root).await.unwrap();
    assert_eq!(h.cloud.file("/a.txt"), Some(b"hello".to_vec()));
}

#[tokio::test]
async fn test_failed_refresh_keeps_loaded_rows() {
    let h = harness(sample_cloud());
    let listing = open_root_listing(&h).await;
    h.session.select_row(listing, 1).unwrap();
    h.cloud.set_failing(true);

    let err = h.session.refresh_picker(listing).await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));

    match top(&h.session) {
        ScreenView::Picker {
            state,
            loading,
            busy,
            ..
        } => {
            assert_eq!(state.selected_index, Some(1));
            assert!(!loading);
            assert!(!busy);
        }
        other => panic!("expected picker, got {:?}", other),
    }
    assert_eq!(picker_rows(&top(&h.session)), vec!["archive", "reports"]);

    // The kept selection still exports
    h.cloud.set_failing(false);
    h.session.confirm_selection(listing).await.unwrap();
    assert_eq!(h.cloud.file("/reports/a.txt"), Some(b"hello".to_vec()));
}

#[tokio::test]
async fn test_trailing_slash_is_normalized() {
    let h = harness(sample_cloud());

    let picker = h
        .session
        .open_picker(h.host, "/reports/", "a.txt", b"hello".to_vec())
        .await
        .unwrap();
    match top(&h.session) {
        ScreenView::Picker { state, .. } => assert_eq!(state.current_path, "/reports"),
        other => panic!("expected picker, got {:?}", other),
    }

    // /reports/2024 has no subfolders
    let err = h.session.drill_into(picker, 0).await.unwrap_err();
    assert!(matches!(err, AppError::EmptyResult(_)));
    match top(&h.session) {
        ScreenView::Picker { state, .. } => assert_eq!(state.current_path, "/reports/2024"),
        other => panic!("expected picker, got {:?}", other),
    }
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn test_confirm_without_selection_alerts() {
    let h = harness(sample_cloud());
    let listing = open_root_listing(&h).await;
    let calls = h.cloud.call_count();

    let err = h.session.confirm_selection(listing).await.unwrap_err();

    assert!(matches!(err, AppError::SelectionMissing));
    let snapshot = view(&h.session);
    assert_eq!(snapshot.screens.len(), 3);
    assert_eq!(snapshot.alerts.len(), 1);
    assert_eq!(snapshot.alerts[0].message, "Please select a directory.");
    assert_eq!(h.cloud.call_count(), calls);
}

#[tokio::test]
async fn test_export_into_selected_directory_unwinds() {
    let h = harness(sample_cloud());
    let listing = open_root_listing(&h).await;

    h.session.select_row(listing, 1).unwrap();
    h.session.confirm_selection(listing).await.unwrap();

    assert_eq!(h.cloud.file("/reports/a.txt"), Some(b"hello".to_vec()));
    let snapshot = view(&h.session);
    assert_eq!(snapshot.screens.len(), 1);
    assert_eq!(snapshot.screens[0].handle(), h.host);
    assert!(snapshot.alerts.is_empty());
    assert!(!h.activity.is_visible());
}

#[tokio::test]
async fn test_export_from_root_picker_lands_at_top_level() {
    let h = harness(sample_cloud());
    let root = h
        .session
        .open_picker(h.host, "/", "a.txt", b"hello".to_vec())
        .await
        .unwrap();

    h.session.select_row(root, 0).unwrap();
    h.session.confirm_selection(root).await.unwrap();

    assert_eq!(h.cloud.file("/a.txt"), Some(b"hello".to_vec()));
    assert_eq!(view(&h.session).screens.len(), 1);
}

#[tokio::test]
async fn test_export_failure_unwinds_after_dismiss() {
    let h = harness(sample_cloud());
    let listing = open_root_listing(&h).await;
    h.session.select_row(listing, 1).unwrap();
    h.cloud.set_failing(true);

    let err = h.session.confirm_selection(listing).await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));

    let snapshot = view(&h.session);
    assert_eq!(snapshot.screens.len(), 3);
    assert_eq!(snapshot.alerts.len(), 1);
    assert_eq!(snapshot.alerts[0].message, "Could not export \"a.txt\".");
    assert_eq!(snapshot.alerts[0].on_dismiss, AlertAction::PopTo(h.host));

    h.session.dismiss_alert(snapshot.alerts[0].id).unwrap();
    assert_eq!(view(&h.session).screens.len(), 1);
}

#[tokio::test]
async fn test_export_conflict_is_reported() {
    let h = harness(sample_cloud().with_file("/reports/a.txt", b"existing"));
    let listing = open_root_listing(&h).await;
    h.session.select_row(listing, 1).unwrap();

    let err = h.session.confirm_selection(listing).await.unwrap_err();

    assert!(matches!(err, AppError::Transport(_)));
    assert_eq!(h.cloud.file("/reports/a.txt"), Some(b"existing".to_vec()));
}

// =============================================================================
// Cancellation and in-flight requests
// =============================================================================

async fn wait_for_screens(session: &Session, count: usize) {
    while view(session).screens.len() < count {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_back_during_listing_drops_result() {
    let h = harness(sample_cloud().with_latency(Duration::from_millis(200)));
    let root = h
        .session
        .open_picker(h.host, "/", "a.txt", b"hello".to_vec())
        .await
        .unwrap();

    let session = h.session.clone();
    let task = tokio::spawn(async move { session.drill_into(root, 0).await });
    wait_for_screens(&h.session, 3).await;

    let popped = h.session.back().unwrap();
    assert!(popped.is_some());

    let err = task.await.unwrap().unwrap_err();
    assert!(matches!(err, AppError::Cancelled(_)));

    let snapshot = view(&h.session);
    assert_eq!(snapshot.screens.len(), 2);
    assert_eq!(snapshot.screens[1].handle(), root);
    assert!(snapshot.alerts.is_empty());
    assert!(!snapshot.network_active);
}

async fn wait_for_activity(activity: &NetworkActivity) {
    while !activity.is_visible() {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_back_during_export_drops_result() {
    let h = harness(sample_cloud().with_latency(Duration::from_millis(100)));
    let listing = open_root_listing(&h).await;
    h.session.select_row(listing, 1).unwrap();

    let session = h.session.clone();
    let task = tokio::spawn(async move { session.confirm_selection(listing).await });
    wait_for_activity(&h.activity).await;

    assert_eq!(h.session.back().unwrap(), Some(listing));

    let err = task.await.unwrap().unwrap_err();
    assert!(matches!(err, AppError::Cancelled(_)));

    let snapshot = view(&h.session);
    assert_eq!(snapshot.screens.len(), 2);
    assert!(snapshot.alerts.is_empty());
    assert!(!snapshot.network_active);
    assert_eq!(h.cloud.file("/reports/a.txt"), None);
}

#[tokio::test]
async fn test_back_during_create_drops_result() {
    let h = harness(sample_cloud().with_latency(Duration::from_millis(100)));
    let form = h.session.open_creator("/reports").unwrap();
    h.session
        .edit_creator(form, Some("notes.txt".to_string()), None)
        .unwrap();

    let session = h.session.clone();
    let task = tokio::spawn(async move { session.submit_creator(form).await });
    wait_for_activity(&h.activity).await;

    assert_eq!(h.session.back().unwrap(), Some(form));

    let err = task.await.unwrap().unwrap_err();
    assert!(matches!(err, AppError::Cancelled(_)));

    let snapshot = view(&h.session);
    assert_eq!(snapshot.screens.len(), 1);
    assert_eq!(snapshot.screens[0].handle(), h.host);
    assert!(snapshot.alerts.is_empty());
    assert!(!snapshot.network_active);
    assert_eq!(h.cloud.file("/reports/notes.txt"), None);
}

#[tokio::test]
async fn test_second_request_while_loading_is_refused() {
    let h = harness(sample_cloud().with_latency(Duration::from_millis(200)));
    let root = h
        .session
        .open_picker(h.host, "/", "a.txt", b"hello".to_vec())
        .await
        .unwrap();

    let session = h.session.clone();
    let task = tokio::spawn(async move { session.drill_into(root, 0).await });
    wait_for_screens(&h.session, 3).await;
    let listing = top(&h.session).handle();

    let err = h.session.refresh_picker(listing).await.unwrap_err();
    assert!(matches!(err, AppError::RequestInFlight(_)));
    assert!(h.activity.is_visible());

    task.await.unwrap().unwrap();
    assert!(!h.activity.is_visible());
    assert_eq!(h.cloud.call_count(), 1);
}

#[tokio::test]
async fn test_back_never_pops_last_screen() {
    let h = harness(sample_cloud());

    assert_eq!(h.session.back().unwrap(), None);
    assert_eq!(view(&h.session).screens.len(), 1);
}

#[tokio::test]
async fn test_unlinked_client_alerts() {
    let session = Session::new(None, Arc::new(MemoryStore::new()), NetworkActivity::default());
    let host = session.push_host("editor").unwrap();

    let err = session
        .open_picker(host, "", "a.txt", b"hello".to_vec())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ClientUnavailable));
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.alerts.len(), 1);
    assert_eq!(snapshot.alerts[0].message, "Cloud storage is not linked.");
}

#[tokio::test]
async fn test_unlinked_create_validates_name_first() {
    let session = Session::new(None, Arc::new(MemoryStore::new()), NetworkActivity::default());
    session.push_host("editor").unwrap();
    let form = session.open_creator("/reports").unwrap();

    let err = session.submit_creator(form).await.unwrap_err();
    assert!(matches!(err, AppError::EmptyName));

    session
        .edit_creator(form, Some("notes.txt".to_string()), None)
        .unwrap();
    let err = session.submit_creator(form).await.unwrap_err();
    assert!(matches!(err, AppError::ClientUnavailable));

    let snapshot = session.snapshot().unwrap();
    match &snapshot.screens[1] {
        ScreenView::Creator { phase, .. } => assert_eq!(*phase, CreatorPhase::Editing),
        other => panic!("expected creator, got {:?}", other),
    }
    assert_eq!(snapshot.alerts[0].message, "Please enter a name.");
    assert_eq!(snapshot.alerts[1].message, "Cloud storage is not linked.");
}

// =============================================================================
// Create form
// =============================================================================

#[tokio::test]
async fn test_create_file_and_directory() {
    let h = harness(sample_cloud());

    let form = h.session.open_creator("/reports").unwrap();
    h.session
        .edit_creator(form, Some("notes.txt".to_string()), None)
        .unwrap();
    h.session.submit_creator(form).await.unwrap();
    assert_eq!(h.cloud.file("/reports/notes.txt"), Some(Vec::new()));
    assert_eq!(view(&h.session).screens.len(), 1);

    let form = h.session.open_creator("/").unwrap();
    h.session
        .edit_creator(form, Some("drafts".to_string()), Some(FileKind::Directory))
        .unwrap();
    h.session.submit_creator(form).await.unwrap();
    assert!(h.cloud.has_folder("/drafts"));
    assert_eq!(view(&h.session).screens.len(), 1);
}

#[tokio::test]
async fn test_create_duplicate_name_skips_network() {
    let h = harness_with(sample_cloud(), MemoryStore::new().with_entry("/reports", "notes.txt"));

    let form = h.session.open_creator("/reports").unwrap();
    h.session
        .edit_creator(form, Some("notes.txt".to_string()), None)
        .unwrap();
    let err = h.session.submit_creator(form).await.unwrap_err();

    assert!(matches!(err, AppError::DuplicateName(_)));
    assert_eq!(h.cloud.call_count(), 0);
    match top(&h.session) {
        ScreenView::Creator { phase, handle, .. } => {
            assert_eq!(handle, form);
            assert_eq!(phase, CreatorPhase::Editing);
        }
        other => panic!("expected creator, got {:?}", other),
    }
    assert_eq!(view(&h.session).alerts.len(), 1);
}

#[tokio::test]
async fn test_create_blank_name_is_rejected() {
    let h = harness(sample_cloud());

    let form = h.session.open_creator("/reports").unwrap();
    h.session.edit_creator(form, Some("   ".to_string()), None).unwrap();
    let err = h.session.submit_creator(form).await.unwrap_err();

    assert!(matches!(err, AppError::EmptyName));
    assert_eq!(h.cloud.call_count(), 0);
    assert_eq!(view(&h.session).alerts[0].message, "Please enter a name.");
}

#[tokio::test]
async fn test_create_failure_pops_form_on_dismiss() {
    let h = harness(sample_cloud());
    h.cloud.set_failing(true);

    let form = h.session.open_creator("/reports").unwrap();
    h.session
        .edit_creator(form, Some("notes.txt".to_string()), None)
        .unwrap();
    let err = h.session.submit_creator(form).await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));

    let snapshot = view(&h.session);
    match &snapshot.screens[1] {
        ScreenView::Creator { phase, .. } => assert_eq!(*phase, CreatorPhase::Error),
        other => panic!("expected creator, got {:?}", other),
    }
    assert_eq!(snapshot.alerts[0].message, "Could not create \"notes.txt\".");
    assert_eq!(snapshot.alerts[0].on_dismiss, AlertAction::PopScreen(form));

    h.session.dismiss_alert(snapshot.alerts[0].id).unwrap();
    assert_eq!(view(&h.session).screens.len(), 1);
}

#[tokio::test]
async fn test_create_in_trailing_slash_directory() {
    let h = harness(sample_cloud());

    let form = h.session.open_creator("/reports/").unwrap();
    match top(&h.session) {
        ScreenView::Creator { path, .. } => assert_eq!(path, "/reports"),
        other => panic!("expected creator, got {:?}", other),
    }
    h.session
        .edit_creator(form, Some("notes.txt".to_string()), None)
        .unwrap();
    h.session.submit_creator(form).await.unwrap();

    assert_eq!(h.cloud.file("/reports/notes.txt"), Some(Vec::new()));
}
