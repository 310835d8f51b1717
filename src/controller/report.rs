//! Deferred delivery of pipeline errors.
//!
//! A handler registered with [`HeatMapController::on_error`] runs while the
//! controller is mutably borrowed. Hosts that keep the controller behind a
//! `RefCell` register an [`ErrorQueue`] sink instead, and hand the queued
//! messages to their own callback once the borrow is released.
//!
//! [`HeatMapController::on_error`]: super::HeatMapController::on_error

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::HotmapError;

/// Shared queue of reported error messages, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ErrorQueue {
    messages: Rc<RefCell<Vec<String>>>,
}

impl ErrorQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that appends every reported error to this queue.
    pub fn sink(&self) -> impl FnMut(&HotmapError) + 'static {
        let messages = Rc::clone(&self.messages);
        move |err: &HotmapError| messages.borrow_mut().push(err.to_string())
    }

    /// Take every queued message.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_queues_until_drained() {
        let queue = ErrorQueue::new();
        let mut sink = queue.sink();
        sink(&HotmapError::data_source("offline"));
        sink(&HotmapError::Render("bad".into()));
        assert!(!queue.is_empty());

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0], "Data source: offline");
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
