//! Tunnelsat looks for paths of a given length in tunneling networks.
//!
//! A tunneling network is a directed graph which nodes may encapsulate packets of a protocol into packets of another one,
//! or decapsulate them.
//! A path is valid when the protocol stack carried by the packet is made of a single IPv4 header at both ends.
//!
//! Two strategies are available: a depth-first exploration of the paths ([`BruteForcePathFinder`](solvers::BruteForcePathFinder)),
//! and a reduction to the satisfiability of a boolean formula ([`ReductionPathFinder`](solvers::ReductionPathFinder)).

#![warn(missing_docs)]

pub mod encodings;

pub mod formula;

pub mod io;

pub mod sat;

pub mod solvers;

pub mod tunnel;
