use crate::tunnel::TunnelNetwork;
use anyhow::Result;
use std::io::Read;

/// The type of callback functions to call when warnings are raised while reading a network.
///
/// The first parameter is the line number (starting at 1), the second one is the warning message.
pub type WarningHandler = Box<dyn Fn(usize, String)>;

/// A trait implemented by objects able to read tunneling networks.
pub trait NetworkReader {
    /// Reads a [`TunnelNetwork`].
    ///
    /// In case warnings are raised, the callback functions registered by [add_warning_handler](Self::add_warning_handler) are triggered.
    fn read(&self, reader: &mut dyn Read) -> Result<TunnelNetwork>;

    /// Adds a callback function to call when warnings are raised while reading a network.
    fn add_warning_handler(&mut self, h: WarningHandler);
}
