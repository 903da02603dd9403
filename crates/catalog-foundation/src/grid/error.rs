use std::fmt;

/// Misuse of a [`RenderCoordinator`](super::RenderCoordinator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// A collection was supplied before any view factory.
    NoFactory,
    /// The coordinator has been torn down.
    Destroyed,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoFactory => {
                write!(f, "no view factory; call update_models before apply_filters")
            }
            RenderError::Destroyed => write!(f, "grid has been destroyed"),
        }
    }
}

impl std::error::Error for RenderError {}

/// A view that could not be built.
///
/// Handed to the diagnostic handler. The item is skipped for this batch and
/// retried the next time it is needed.
#[derive(Debug)]
pub struct Diagnostic<'a, Id> {
    pub index: usize,
    pub id: &'a Id,
    pub error: &'a (dyn std::error::Error + 'static),
}

impl<Id: fmt::Debug> fmt::Display for Diagnostic<'_, Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to build view for item {:?} at index {}: {}",
            self.id, self.index, self.error
        )
    }
}
