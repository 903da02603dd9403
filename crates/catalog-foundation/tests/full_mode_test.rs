use std::rc::Rc;

use catalog_foundation::{GridConfig, Mode, Presentation, VisibleRange};
use catalog_testing::{models_with_ids, sample_models, FactoryEvent, GridTestRule};

fn rule() -> GridTestRule {
    GridTestRule::new(GridConfig::default()).unwrap()
}

#[test]
fn test_small_catalog_is_built_once() {
    let mut rule = rule();
    rule.set_models(sample_models(50)).unwrap();

    assert_eq!(rule.grid().mode(), Some(Mode::Full));
    assert_eq!(rule.probe().created().len(), 50);

    let mut offset = 0.0;
    while offset <= 13_200.0 {
        rule.scroll_to(offset);
        rule.advance_time(20);
        offset += 1_000.0;
    }
    rule.settle();

    let stats = rule.grid().stats();
    assert_eq!(stats.range_resolutions, 0);
    assert_eq!(stats.commits, 1);
    assert_eq!(rule.probe().created().len(), 50);
    assert_eq!(rule.grid().cache_len(), 50);

    let commit = rule.surface().last_commit().unwrap();
    assert_eq!(commit.translation, 0.0);
    assert_eq!(commit.range, VisibleRange { start: 0, end: 49 });
    assert_eq!(commit.ids, (0..50).collect::<Vec<u64>>());
}

#[test]
fn test_threshold_boundary_selects_mode() {
    let mut at_threshold = rule();
    at_threshold.set_models(sample_models(100)).unwrap();
    assert_eq!(at_threshold.grid().mode(), Some(Mode::Full));
    assert_eq!(at_threshold.grid().cache_len(), 100);

    let mut above = rule();
    above.set_models(sample_models(101)).unwrap();
    assert_eq!(above.grid().mode(), Some(Mode::Windowed));
    assert_eq!(above.grid().cache_len(), 14);
}

#[test]
fn test_content_extent_covers_every_item() {
    for len in [0usize, 1, 50, 100, 101, 200] {
        let mut rule = rule();
        rule.set_models(sample_models(len)).unwrap();

        let expected = len as f32 * 280.0;
        assert_eq!(rule.grid().content_extent(), expected);
        assert_eq!(rule.surface().content_extent, Some(expected));
    }
}

#[test]
fn test_filter_to_small_set_disposes_windowed_views_first() {
    let mut rule = rule();
    rule.set_models(sample_models(200)).unwrap();
    rule.scroll_to(14_000.0);
    assert_eq!(rule.surface().last_commit().unwrap().translation, 12_600.0);
    rule.probe().clear();

    let filtered = models_with_ids((0..200).step_by(4));
    rule.grid_mut().apply_filters(filtered).unwrap();

    let events = rule.probe().events();
    assert_eq!(events.len(), 64);
    assert!(events[..14]
        .iter()
        .all(|event| matches!(event, FactoryEvent::Disposed(_))));
    assert!(events[14..]
        .iter()
        .all(|event| matches!(event, FactoryEvent::Created(_))));

    let grid = rule.grid();
    assert_eq!(grid.mode(), Some(Mode::Full));
    assert_eq!(grid.stats().mode_transitions, 1);
    assert_eq!(grid.viewport().scroll_offset(), 13_200.0);
    assert_eq!(rule.surface().translation_resets, 1);

    let commit = rule.surface().last_commit().unwrap();
    assert_eq!(commit.mode, Mode::Full);
    assert_eq!(commit.translation, 0.0);
    assert_eq!(commit.ids, (0..200).step_by(4).collect::<Vec<u64>>());
}

#[test]
fn test_apply_filters_is_idempotent() {
    for count in [40u64, 150] {
        let mut rule = rule();
        rule.set_models(sample_models(200)).unwrap();
        let filtered = models_with_ids(0..count);

        rule.grid_mut().apply_filters(Rc::clone(&filtered)).unwrap();
        let first = rule.surface().last_commit().cloned().unwrap();
        rule.probe().clear();

        rule.grid_mut().apply_filters(filtered).unwrap();
        let second = rule.surface().last_commit().cloned().unwrap();

        assert_eq!(first, second);
        assert!(rule.probe().events().is_empty(), "{count} items");
    }
}

#[test]
fn test_full_mode_filter_disposes_removed_items_only() {
    let mut rule = rule();
    rule.set_models(sample_models(50)).unwrap();
    rule.probe().clear();

    rule.grid_mut().apply_filters(models_with_ids(0..30)).unwrap();

    let mut disposed = rule.probe().disposed();
    disposed.sort_unstable();
    assert_eq!(disposed, (30..50).collect::<Vec<u64>>());
    assert!(rule.probe().created().is_empty());
    assert_eq!(
        rule.surface().last_commit().unwrap().ids,
        (0..30).collect::<Vec<u64>>()
    );
}

#[test]
fn test_empty_collection_and_back() {
    let mut rule = rule();
    rule.set_models(sample_models(20)).unwrap();

    rule.grid_mut().apply_filters(sample_models(0)).unwrap();
    assert_eq!(rule.grid().presentation(), Presentation::Empty);
    assert_eq!(rule.grid().visible_range(), None);
    assert_eq!(rule.surface().empty_shown, 1);
    assert!(rule.probe().live().is_empty());

    rule.grid_mut().apply_filters(sample_models(10)).unwrap();
    assert_eq!(rule.grid().presentation(), Presentation::Items);
    assert_eq!(rule.grid().cache_len(), 10);
}

#[test]
fn test_loading_state_until_models_arrive() {
    let mut rule = rule();
    assert_eq!(rule.grid().presentation(), Presentation::Blank);

    rule.grid_mut().show_loading();
    assert_eq!(rule.grid().presentation(), Presentation::Loading);
    assert_eq!(rule.surface().loading_shown, 1);

    rule.set_models(sample_models(5)).unwrap();
    assert_eq!(rule.grid().presentation(), Presentation::Items);
}

#[test]
fn test_duplicate_ids_share_one_view() {
    let mut rule = rule();
    rule.set_models(models_with_ids([1, 2, 2, 3])).unwrap();

    assert_eq!(rule.probe().created(), vec![1, 2, 3]);
    assert_eq!(rule.grid().cache_len(), 3);
    let commit = rule.surface().last_commit().unwrap();
    assert_eq!(commit.ids, vec![1, 2, 2, 3]);
    assert_eq!(commit.indices, vec![0, 1, 2, 3]);
}

#[test]
fn test_update_models_into_full_mode_resets_translation() {
    let mut rule = rule();
    rule.set_models(sample_models(200)).unwrap();
    rule.scroll_to(14_000.0);
    assert_eq!(rule.surface().last_commit().unwrap().translation, 12_600.0);

    rule.set_models(sample_models(50)).unwrap();

    assert_eq!(rule.grid().mode(), Some(Mode::Full));
    assert_eq!(rule.grid().stats().mode_transitions, 1);
    assert_eq!(rule.surface().translation_resets, 1);
    assert_eq!(rule.surface().last_commit().unwrap().translation, 0.0);
}

#[test]
fn test_resize_in_full_mode_does_not_recommit() {
    let mut rule = rule();
    rule.set_models_with(sample_models(50), |factory| factory.deferred())
        .unwrap();
    assert_eq!(rule.probe().populated(), vec![0, 1, 2, 3]);

    rule.grid_mut().on_resize(1_200.0);
    rule.settle();

    assert_eq!(rule.grid().viewport().container_extent(), 1_200.0);
    assert_eq!(rule.surface().commit_count(), 1);
    assert_eq!(rule.grid().stats().range_resolutions, 0);
    // The taller viewport reaches one more deferred card
    assert_eq!(rule.probe().populated(), vec![0, 1, 2, 3, 4]);
}
