//! Objects used to read tunneling networks and to write answers.

mod path_writer;
pub use path_writer::PathWriter;

mod specs;
pub use specs::NetworkReader;
pub use specs::WarningHandler;

mod tunnel_reader;
pub use tunnel_reader::TunnelReader;

mod warning_result;
