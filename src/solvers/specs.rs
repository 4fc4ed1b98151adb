use crate::tunnel::Step;

/// A trait for objects able to look for a path of a given length in a tunneling network.
///
/// The network and the length are given when building the path finder.
pub trait PathFinder {
    /// Looks for a path.
    ///
    /// In case no path exists, [Option::None] is returned.
    /// Otherwise, the steps of a path are returned, from the initial node to the final one.
    fn find_path(&mut self) -> Option<Vec<Step>>;
}
