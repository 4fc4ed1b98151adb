use anyhow::{anyhow, Result};
use std::{fmt::Display, str::FromStr};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumCount, EnumIter, EnumString};

/// A protocol symbol, as stored in the cells of a [`ProtocolStack`](crate::tunnel::ProtocolStack).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Protocol {
    /// The IPv4 protocol (symbol `4`).
    V4,
    /// The IPv6 protocol (symbol `6`).
    V6,
}

impl Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::V4 => write!(f, "4"),
            Protocol::V6 => write!(f, "6"),
        }
    }
}

/// An action a node may perform on the protocol stack while a packet leaves it.
///
/// The ordering of the variants is meaningful: it gives the index of the actions in [`ActionSet`] masks,
/// and the order in which actions are tried by the brute-force search.
///
/// Names follow the `<kind>_<a>_<b>` pattern.
/// `push_a_b` requires `a` on top and pushes `b`;
/// `pop_a_b` requires `a` on top and `b` just below it, and removes `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, AsRefStr, EnumCount)]
pub enum Action {
    /// Transmits a packet while an IPv4 header is on top.
    #[strum(serialize = "transmit_4")]
    Transmit4,
    /// Transmits a packet while an IPv6 header is on top.
    #[strum(serialize = "transmit_6")]
    Transmit6,
    /// Encapsulates IPv4 into IPv4.
    #[strum(serialize = "push_4_4")]
    Push44,
    /// Encapsulates IPv4 into IPv6.
    #[strum(serialize = "push_4_6")]
    Push46,
    /// Encapsulates IPv6 into IPv4.
    #[strum(serialize = "push_6_4")]
    Push64,
    /// Encapsulates IPv6 into IPv6.
    #[strum(serialize = "push_6_6")]
    Push66,
    /// Decapsulates IPv4 from IPv4.
    #[strum(serialize = "pop_4_4")]
    Pop44,
    /// Decapsulates IPv4, exposing IPv6.
    #[strum(serialize = "pop_4_6")]
    Pop46,
    /// Decapsulates IPv6, exposing IPv4.
    #[strum(serialize = "pop_6_4")]
    Pop64,
    /// Decapsulates IPv6 from IPv6.
    #[strum(serialize = "pop_6_6")]
    Pop66,
}

impl Action {
    /// Returns the transmit action for the given top symbol.
    pub fn transmit(top: Protocol) -> Self {
        match top {
            Protocol::V4 => Action::Transmit4,
            Protocol::V6 => Action::Transmit6,
        }
    }

    /// Returns the push action for the given top symbol and pushed symbol.
    pub fn push(top: Protocol, pushed: Protocol) -> Self {
        match (top, pushed) {
            (Protocol::V4, Protocol::V4) => Action::Push44,
            (Protocol::V4, Protocol::V6) => Action::Push46,
            (Protocol::V6, Protocol::V4) => Action::Push64,
            (Protocol::V6, Protocol::V6) => Action::Push66,
        }
    }

    /// Returns the pop action for the given top symbol and the symbol it exposes.
    pub fn pop(top: Protocol, exposed: Protocol) -> Self {
        match (top, exposed) {
            (Protocol::V4, Protocol::V4) => Action::Pop44,
            (Protocol::V4, Protocol::V6) => Action::Pop46,
            (Protocol::V6, Protocol::V4) => Action::Pop64,
            (Protocol::V6, Protocol::V6) => Action::Pop66,
        }
    }

    /// Returns the index of this action, from 0 to 9.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the action with the given index, if any.
    ///
    /// ```
    /// # use tunnelsat::tunnel::Action;
    /// assert_eq!(Some(Action::Push46), Action::from_index(3));
    /// assert_eq!(None, Action::from_index(10));
    /// ```
    pub fn from_index(index: usize) -> Option<Self> {
        Action::iter().nth(index)
    }

    /// Returns the symbol this action requires on top of the stack.
    pub fn top(self) -> Protocol {
        match self {
            Action::Transmit4 | Action::Push44 | Action::Push46 | Action::Pop44 | Action::Pop46 => {
                Protocol::V4
            }
            Action::Transmit6 | Action::Push64 | Action::Push66 | Action::Pop64 | Action::Pop66 => {
                Protocol::V6
            }
        }
    }

    /// Returns the symbol pushed by this action, or `None` if it is not a push.
    pub fn pushed(self) -> Option<Protocol> {
        match self {
            Action::Push44 | Action::Push64 => Some(Protocol::V4),
            Action::Push46 | Action::Push66 => Some(Protocol::V6),
            _ => None,
        }
    }

    /// Returns the symbol a pop requires under the top one, or `None` if it is not a pop.
    pub fn exposed(self) -> Option<Protocol> {
        match self {
            Action::Pop44 | Action::Pop64 => Some(Protocol::V4),
            Action::Pop46 | Action::Pop66 => Some(Protocol::V6),
            _ => None,
        }
    }

    /// Returns the variation of the stack height this action implies (-1, 0 or 1).
    pub fn height_delta(self) -> isize {
        if self.pushed().is_some() {
            1
        } else if self.exposed().is_some() {
            -1
        } else {
            0
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// Reads an action given its name, reporting the unknown names.
pub fn read_action(name: &str) -> Result<Action> {
    Action::from_str(name).map_err(|_| anyhow!(r#"undefined action "{}""#, name))
}

/// A set of actions, stored as a mask where bit `i` stands for the action of index `i`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActionSet(u16);

impl ActionSet {
    const FULL_MASK: u16 = (1 << 10) - 1;

    /// Returns the empty set.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Returns the set of all the actions.
    pub fn all() -> Self {
        Self(Self::FULL_MASK)
    }

    /// Builds a set from a mask, ignoring the bits that refer to no action.
    pub fn from_mask(mask: u16) -> Self {
        Self(mask & Self::FULL_MASK)
    }

    /// Returns the underlying mask.
    pub fn mask(&self) -> u16 {
        self.0
    }

    /// Adds an action to the set.
    ///
    /// Returns `false` if the action was already in the set.
    pub fn insert(&mut self, action: Action) -> bool {
        let was_absent = !self.contains(action);
        self.0 |= 1 << action.index();
        was_absent
    }

    /// Returns `true` iff the action belongs to this set.
    pub fn contains(&self, action: Action) -> bool {
        self.0 & (1 << action.index()) != 0
    }

    /// Returns `true` iff this set has no action.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates over the actions of this set, by increasing index.
    ///
    /// ```
    /// # use tunnelsat::tunnel::{Action, ActionSet};
    /// let set: ActionSet = [Action::Pop64, Action::Transmit4].into_iter().collect();
    /// assert_eq!(vec![Action::Transmit4, Action::Pop64], set.iter().collect::<Vec<_>>());
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::iter().filter(|a| self.contains(*a))
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = ActionSet::empty();
        iter.into_iter().for_each(|a| {
            set.insert(a);
        });
        set
    }
}

impl Display for ActionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.iter().map(|a| a.to_string()).collect::<Vec<String>>();
        write!(f, "{{{}}}", names.join(", "))
    }
}
