//! This module contains the model of tunneling networks: actions, protocol stacks, networks and paths.

mod action;
pub use action::read_action;
pub use action::Action;
pub use action::ActionSet;
pub use action::Protocol;

mod network;
pub use network::Network;
pub use network::TunnelNetwork;

mod stack;
pub use stack::AppliedAction;
pub use stack::ProtocolStack;

mod step;
pub use step::check_path;
pub use step::Step;

/// Returns the number of stack cells needed to handle paths of the given length.
///
/// A valid path of length `L` cannot push more than `L / 2` cells, since each one must be popped before the end.
pub fn stack_size(length: usize) -> usize {
    length / 2 + 1
}
