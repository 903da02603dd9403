use std::collections::BTreeSet;
use std::time::Duration;

use catalog_foundation::{
    resolve_range, GridConfig, Mode, Presentation, ViewportState, VisibleRange,
};
use catalog_testing::{sample_models, FactoryEvent, GridTestRule};

fn rule() -> GridTestRule {
    GridTestRule::new(GridConfig::default()).unwrap()
}

#[test]
fn test_initial_range_for_two_hundred_models() {
    let mut rule = rule();
    rule.set_models(sample_models(200)).unwrap();

    let grid = rule.grid();
    assert_eq!(grid.mode(), Some(Mode::Windowed));
    assert_eq!(grid.visible_range(), Some(VisibleRange { start: 0, end: 13 }));
    assert_eq!(grid.presentation(), Presentation::Items);
    assert_eq!(grid.cache_len(), 14);
    assert_eq!(rule.surface().content_extent, Some(56_000.0));

    let commit = rule.surface().last_commit().unwrap();
    assert_eq!(commit.translation, 0.0);
    assert_eq!(commit.ids, (0..=13).collect::<Vec<u64>>());
}

#[test]
fn test_scroll_translates_batch_and_evicts_before_creating() {
    let mut rule = rule();
    rule.set_models(sample_models(200)).unwrap();
    rule.probe().clear();

    rule.scroll_to(14_000.0);

    let commit = rule.surface().last_commit().unwrap();
    assert_eq!(commit.range, VisibleRange { start: 45, end: 58 });
    assert_eq!(commit.translation, 12_600.0);
    assert_eq!(commit.ids, (45..=58).collect::<Vec<u64>>());
    assert_eq!(rule.grid().cache_len(), 14);

    let events = rule.probe().events();
    let last_dispose = events
        .iter()
        .rposition(|event| matches!(event, FactoryEvent::Disposed(_)))
        .unwrap();
    let first_create = events
        .iter()
        .position(|event| matches!(event, FactoryEvent::Created(_)))
        .unwrap();
    assert!(last_dispose < first_create);

    let mut disposed = rule.probe().disposed();
    disposed.sort_unstable();
    assert_eq!(disposed, (0..=13).collect::<Vec<u64>>());
}

#[test]
fn test_overlapping_scroll_reuses_views() {
    let mut rule = rule();
    rule.set_models(sample_models(200)).unwrap();
    rule.scroll_to(2_800.0);
    rule.advance_time(20);
    rule.probe().clear();

    // Range moves from 5..=18 to 6..=19
    rule.scroll_to(3_080.0);

    assert_eq!(rule.probe().created(), vec![19]);
    assert_eq!(rule.probe().disposed(), vec![5]);
    assert!(rule.grid().stats().views_reused >= 13);
}

#[test]
fn test_scroll_recomputation_is_throttled_with_trailing_edge() {
    let mut rule = rule();
    rule.set_models(sample_models(200)).unwrap();

    rule.scroll_to(1_000.0);
    assert_eq!(rule.surface().commit_count(), 2);

    assert!(!rule.advance_time(5));
    rule.scroll_to(2_000.0);
    rule.scroll_to(3_000.0);
    assert_eq!(rule.surface().commit_count(), 2);
    assert_eq!(rule.grid().next_deadline(), Some(Duration::from_millis(11)));

    assert!(rule.advance_time(11));
    assert_eq!(rule.surface().commit_count(), 3);
    let commit = rule.surface().last_commit().unwrap();
    assert_eq!(commit.range, VisibleRange { start: 5, end: 18 });
}

#[test]
fn test_cache_stays_bounded_while_scrolling() {
    let mut rule = rule();
    rule.set_models(sample_models(200)).unwrap();

    let mut offset = 0.0;
    while offset < 60_000.0 {
        rule.scroll_to(offset);
        rule.advance_time(20);

        let range = rule.grid().visible_range().unwrap();
        assert!(range.count() <= 14);
        assert!(rule.grid().cache_len() <= range.count());

        let committed: BTreeSet<u64> = rule
            .surface()
            .last_commit()
            .unwrap()
            .ids
            .iter()
            .copied()
            .collect();
        assert_eq!(rule.probe().live(), committed);
        offset += 700.0;
    }

    // Past the end the offset is clamped to the last page
    let range = rule.grid().visible_range().unwrap();
    assert_eq!(range.end, 199);
    assert_eq!(rule.grid().viewport().scroll_offset(), 55_200.0);
}

#[test]
fn test_range_is_always_valid() {
    for len in [1usize, 2, 13, 101, 500] {
        for buffer in [0usize, 1, 5] {
            let mut viewport = ViewportState::new(280.0, 800.0, buffer).unwrap();
            for offset in [0.0, 139.5, 280.0, 5_000.0, 1.0e6] {
                viewport.set_scroll_offset(offset);
                let range = resolve_range(&viewport, len).unwrap();
                assert!(range.start <= range.end, "{range:?} for {len} items");
                assert!(range.end < len, "{range:?} for {len} items");
            }
        }
    }
}

#[test]
fn test_scroll_to_model_requests_item_offset() {
    let mut rule = rule();
    rule.set_models(sample_models(200)).unwrap();

    assert!(rule.grid_mut().scroll_to_model(&50));
    assert!(!rule.grid_mut().scroll_to_model(&9_999));
    assert_eq!(rule.surface().scroll_requests, vec![14_000.0]);
}

#[test]
fn test_resize_is_debounced() {
    let mut rule = rule();
    rule.set_models(sample_models(200)).unwrap();

    rule.grid_mut().on_resize(400.0);
    rule.advance_time(100);
    rule.grid_mut().on_resize(1_200.0);
    rule.advance_time(100);
    assert_eq!(rule.grid().viewport().container_extent(), 800.0);

    assert!(rule.advance_time(60));
    assert_eq!(rule.grid().viewport().container_extent(), 1_200.0);
    assert_eq!(
        rule.grid().visible_range(),
        Some(VisibleRange { start: 0, end: 15 })
    );
}

#[test]
fn test_scrolling_flag_clears_after_quiet_period() {
    let mut rule = rule();
    rule.set_models(sample_models(200)).unwrap();
    assert!(!rule.grid().is_scrolling());

    rule.scroll_to(500.0);
    assert!(rule.grid().is_scrolling());
    assert_eq!(rule.grid().next_deadline(), Some(Duration::from_millis(150)));

    rule.advance_time(100);
    assert!(rule.grid().is_scrolling());
    rule.advance_time(60);
    assert!(!rule.grid().is_scrolling());
    assert_eq!(rule.grid().next_deadline(), None);
}

#[test]
fn test_pending_scroll_survives_collection_update() {
    let mut rule = rule();
    rule.set_models(sample_models(200)).unwrap();

    rule.scroll_to(1_000.0);
    rule.advance_time(5);
    rule.scroll_to(14_000.0);
    rule.grid_mut().apply_filters(sample_models(300)).unwrap();
    let commits = rule.surface().commit_count();

    rule.settle();

    assert!(rule.surface().commit_count() > commits);
    let commit = rule.surface().last_commit().unwrap();
    assert_eq!(commit.range, VisibleRange { start: 45, end: 58 });
    assert_eq!(rule.surface().content_extent, Some(84_000.0));
}
