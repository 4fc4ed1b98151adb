use super::{Action, Protocol};
use std::ops::{Deref, DerefMut};

/// The stack of protocol headers carried by a packet.
///
/// Cells are indexed from the bottom (index 0) to the top (index `height - 1`).
/// A stack built by [`new`](Self::new) contains a single IPv4 cell, and actions never remove this bottom cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolStack {
    cells: Vec<Protocol>,
}

impl ProtocolStack {
    /// Builds a stack holding a single IPv4 cell.
    ///
    /// The capacity is the maximal height the stack is expected to reach;
    /// it is only used to avoid reallocations.
    pub fn new(capacity: usize) -> Self {
        let mut cells = Vec::with_capacity(usize::max(1, capacity));
        cells.push(Protocol::V4);
        Self { cells }
    }

    /// Returns the number of cells in the stack.
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Returns the top symbol.
    pub fn top(&self) -> Protocol {
        self.cells[self.cells.len() - 1]
    }

    /// Returns the cells, from bottom to top.
    pub fn cells(&self) -> &[Protocol] {
        &self.cells
    }

    /// Applies an action to the stack if its preconditions hold.
    ///
    /// Returns `true` and updates the stack in case of success.
    /// Returns `false` and leaves the stack untouched if the top symbols do not match the ones required by the action.
    pub fn apply(&mut self, action: Action) -> bool {
        if self.top() != action.top() {
            return false;
        }
        if let Some(pushed) = action.pushed() {
            self.cells.push(pushed);
        } else if let Some(exposed) = action.exposed() {
            let height = self.cells.len();
            if height < 2 || self.cells[height - 2] != exposed {
                return false;
            }
            self.cells.pop();
        }
        true
    }

    /// Cancels the effect of the last call to [`apply`](Self::apply).
    ///
    /// This function must only be called right after a successful call to [`apply`](Self::apply) with the same action.
    /// No check is made; calling it in any other situation leaves the stack in an unspecified state.
    pub fn revert(&mut self, action: Action) {
        if action.pushed().is_some() {
            self.cells.pop();
        } else if action.exposed().is_some() {
            self.cells.push(action.top());
        }
    }

    /// Applies an action and returns a guard that reverts it when dropped.
    ///
    /// Returns `None` if the action cannot be applied.
    /// The stack can be reached (and modified) through the guard while it lives;
    /// any change made this way must be undone before the guard is dropped.
    ///
    /// ```
    /// # use tunnelsat::tunnel::{Action, ProtocolStack};
    /// let mut stack = ProtocolStack::new(2);
    /// {
    ///     let applied = stack.try_apply(Action::Push46).unwrap();
    ///     assert_eq!(2, applied.height());
    /// }
    /// assert_eq!(1, stack.height());
    /// ```
    pub fn try_apply(&mut self, action: Action) -> Option<AppliedAction<'_>> {
        if self.apply(action) {
            Some(AppliedAction {
                stack: self,
                action,
            })
        } else {
            None
        }
    }
}

/// A guard over a stack an action has been applied to.
///
/// See [`ProtocolStack::try_apply`].
pub struct AppliedAction<'a> {
    stack: &'a mut ProtocolStack,
    action: Action,
}

impl AppliedAction<'_> {
    /// Returns the action this guard reverts.
    pub fn action(&self) -> Action {
        self.action
    }
}

impl Deref for AppliedAction<'_> {
    type Target = ProtocolStack;

    fn deref(&self) -> &Self::Target {
        self.stack
    }
}

impl DerefMut for AppliedAction<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stack
    }
}

impl Drop for AppliedAction<'_> {
    fn drop(&mut self) {
        self.stack.revert(self.action)
    }
}
