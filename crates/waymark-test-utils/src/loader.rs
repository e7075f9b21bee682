//! A module loader that records begun loads without completing them.

use std::cell::RefCell;
use std::rc::Rc;

use waymark_core::{LoadTicket, ModuleLoader};

/// Records `(ticket, module)` pairs; tests settle loads themselves by
/// dispatching `LoadSettled` with a recorded ticket.
#[derive(Clone, Debug, Default)]
pub struct StubLoader {
    begun: Rc<RefCell<Vec<(LoadTicket, String)>>>,
}

impl StubLoader {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every load begun so far, in order.
    pub fn begun(&self) -> Vec<(LoadTicket, String)> {
        self.begun.borrow().clone()
    }

    /// The most recently begun load's ticket, if any.
    pub fn last_ticket(&self) -> Option<LoadTicket> {
        self.begun.borrow().last().map(|(ticket, _)| *ticket)
    }
}

impl ModuleLoader for StubLoader {
    fn begin(&mut self, ticket: LoadTicket, module: &str) {
        self.begun.borrow_mut().push((ticket, module.to_owned()));
    }
}
