mod catalog;

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use catalog_core::{FrameThrottled, RateLimit, SearchDebounce};
use catalog_foundation::{GridConfig, RenderCoordinator};
use catalog_runtime_std::{StdClock, StdRuntime};

use catalog::{build_catalog, filter_catalog, CardFactory, LogSurface, ModelListing};

const CATALOG_SIZE: u32 = 5_000;
const FRAME: Duration = Duration::from_millis(16);
const SEARCH_DELAY: Duration = Duration::from_millis(250);

type Grid = RenderCoordinator<CardFactory, LogSurface, StdClock>;

fn main() -> Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!("=== Catalog grid walkthrough ===");
    println!("Scrolls, searches and resizes a {CATALOG_SIZE}-model catalog headlessly.");
    println!("Set RUST_LOG=debug to see every recomputation.");
    println!();

    let runtime = StdRuntime::new();
    let config = GridConfig::default().with_container_extent(900.0);
    let grid: Rc<RefCell<Grid>> = Rc::new(RefCell::new(RenderCoordinator::new(
        config,
        LogSurface::default(),
        runtime.clock(),
    )?));
    grid.borrow_mut()
        .set_diagnostic_handler(|diagnostic| log::error!("{diagnostic}"));

    let catalog = build_catalog(CATALOG_SIZE);
    grid.borrow_mut().show_loading();
    grid.borrow_mut()
        .update_models(Rc::clone(&catalog), CardFactory::default())?;

    // Wheel events arrive faster than frames; only the newest one per frame counts
    let scroll = {
        let grid = Rc::clone(&grid);
        FrameThrottled::new(runtime.frame_clock(), move |offset: f32| {
            grid.borrow_mut().on_scroll(offset)
        })
    };

    log::info!("-- fling through the catalog");
    let mut offset = 0.0;
    for _ in 0..60 {
        for _ in 0..4 {
            offset += 35.0;
            scroll.call(offset);
        }
        run_frame(&runtime, &grid);
    }
    settle(&runtime, &grid);
    log::info!("wheel events coalesced into {} frames", scroll.invocations());

    log::info!("-- typing a search");
    let mut search = SearchDebounce::new(runtime.clock(), SEARCH_DELAY);
    for query in ["q", "qw", "qwe", "qwen", "qwen-7b"] {
        if let Some(query) = search.call(query.to_string()) {
            apply_query(&grid, &catalog, &query)?;
        }
        // A keystroke roughly every 80 ms
        for _ in 0..5 {
            run_frame(&runtime, &grid);
        }
    }
    while search.is_pending() {
        run_frame(&runtime, &grid);
        if let Some(query) = search.poll() {
            apply_query(&grid, &catalog, &query)?;
        }
    }

    log::info!("-- jump to the last match");
    let last = grid
        .borrow()
        .collection()
        .iter()
        .enumerate()
        .last()
        .map(|(index, listing)| (index, listing.id));
    if let Some((index, id)) = last {
        if grid.borrow_mut().scroll_to_model(&id) {
            // The host animates the scroll and reports where it lands
            let target = grid.borrow().viewport().offset_of(index);
            scroll.call(target);
            run_frame(&runtime, &grid);
        }
    }
    settle(&runtime, &grid);

    log::info!("-- clearing the search");
    if let Some(query) = search.call(String::new()) {
        apply_query(&grid, &catalog, &query)?;
    }

    log::info!("-- popular models only");
    let popular: Rc<[ModelListing]> = catalog
        .iter()
        .filter(|listing| listing.downloads >= 990_000)
        .cloned()
        .collect();
    log::info!("{} popular models", popular.len());
    grid.borrow_mut().apply_filters(popular)?;

    log::info!("-- window resized");
    grid.borrow_mut().apply_filters(Rc::clone(&catalog))?;
    grid.borrow_mut().on_resize(1_400.0);
    grid.borrow_mut().on_resize(1_600.0);
    settle(&runtime, &grid);

    {
        let grid = grid.borrow();
        log::info!("stats: {:?}", grid.stats());
        if let Some(factory) = grid.factory() {
            log::info!(
                "{} live cards, {} hydrated over the run, {} commits",
                factory.live,
                factory.hydrated,
                grid.surface().commits
            );
        }
    }

    scroll.cancel();
    grid.borrow_mut().destroy();
    println!("Done.");
    Ok(())
}

fn run_frame(runtime: &StdRuntime, grid: &RefCell<Grid>) {
    thread::sleep(FRAME);
    runtime.pump_frame();
    grid.borrow_mut().poll();
}

/// Keeps running frames until no throttled or debounced work is left.
fn settle(runtime: &StdRuntime, grid: &RefCell<Grid>) {
    loop {
        let deadline = grid.borrow().next_deadline();
        let Some(wait) = deadline else {
            break;
        };
        thread::sleep(wait);
        run_frame(runtime, grid);
    }
}

fn apply_query(grid: &RefCell<Grid>, catalog: &[ModelListing], query: &str) -> Result<()> {
    let shown = filter_catalog(catalog, query);
    log::info!("search {query:?}: {} models", shown.len());
    grid.borrow_mut().apply_filters(shown)?;
    Ok(())
}
