use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use catalog_foundation::ViewFactory;

use crate::fixtures::ModelRecord;

/// What happened to a view, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FactoryEvent {
    Created(u64),
    Disposed(u64),
    Populated(u64),
}

/// A card built for one model.
#[derive(Clone, Debug, PartialEq)]
pub struct CardView {
    pub id: u64,
    pub title: String,
    /// Deferred cards start out unpopulated.
    pub populated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardBuildError {
    pub id: u64,
}

impl fmt::Display for CardBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card for model {} could not be built", self.id)
    }
}

impl std::error::Error for CardBuildError {}

/// Shared view of everything a [`RecordingFactory`] did.
///
/// Stays readable after the factory has been moved into a grid, and after
/// the grid has been destroyed.
#[derive(Clone, Debug, Default)]
pub struct FactoryProbe {
    events: Rc<RefCell<Vec<FactoryEvent>>>,
}

impl FactoryProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FactoryEvent> {
        self.events.borrow().clone()
    }

    pub fn created(&self) -> Vec<u64> {
        self.collect(|event| match event {
            FactoryEvent::Created(id) => Some(id),
            _ => None,
        })
    }

    pub fn disposed(&self) -> Vec<u64> {
        self.collect(|event| match event {
            FactoryEvent::Disposed(id) => Some(id),
            _ => None,
        })
    }

    pub fn populated(&self) -> Vec<u64> {
        self.collect(|event| match event {
            FactoryEvent::Populated(id) => Some(id),
            _ => None,
        })
    }

    /// Ids whose views were created and not yet disposed.
    pub fn live(&self) -> BTreeSet<u64> {
        let mut live = BTreeSet::new();
        for event in self.events.borrow().iter() {
            match *event {
                FactoryEvent::Created(id) => {
                    live.insert(id);
                }
                FactoryEvent::Disposed(id) => {
                    live.remove(&id);
                }
                FactoryEvent::Populated(_) => {}
            }
        }
        live
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn record(&self, event: FactoryEvent) {
        self.events.borrow_mut().push(event);
    }

    fn collect(&self, pick: impl Fn(FactoryEvent) -> Option<u64>) -> Vec<u64> {
        self.events.borrow().iter().copied().filter_map(pick).collect()
    }
}

/// A view factory that builds [`CardView`]s and records every call.
#[derive(Debug, Default)]
pub struct RecordingFactory {
    probe: FactoryProbe,
    failing: BTreeSet<u64>,
    deferred: bool,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory that reports into an existing probe.
    pub fn with_probe(probe: FactoryProbe) -> Self {
        Self {
            probe,
            ..Self::default()
        }
    }

    /// Builds every card deferred, to be populated once it comes into view.
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    /// Fails to build cards for the given ids.
    pub fn failing_on(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.failing.extend(ids);
        self
    }

    pub fn probe(&self) -> FactoryProbe {
        self.probe.clone()
    }
}

impl ViewFactory for RecordingFactory {
    type Item = ModelRecord;
    type Handle = CardView;
    type Error = CardBuildError;

    fn create(&mut self, item: &ModelRecord) -> Result<CardView, CardBuildError> {
        if self.failing.contains(&item.id) {
            return Err(CardBuildError { id: item.id });
        }
        self.probe.record(FactoryEvent::Created(item.id));
        Ok(CardView {
            id: item.id,
            title: format!("{} by {}", item.name, item.author),
            populated: !self.deferred,
        })
    }

    fn dispose(&mut self, handle: CardView) {
        self.probe.record(FactoryEvent::Disposed(handle.id));
    }

    fn is_deferred(&self, handle: &CardView) -> bool {
        !handle.populated
    }

    fn populate(&mut self, handle: &mut CardView) {
        handle.populated = true;
        self.probe.record(FactoryEvent::Populated(handle.id));
    }
}
