//! Path finders for tunneling networks.

mod brute_force_path_finder;
pub use brute_force_path_finder::BruteForcePathFinder;

mod reduction_path_finder;
pub use reduction_path_finder::ReductionPathFinder;

mod specs;
pub use specs::PathFinder;
