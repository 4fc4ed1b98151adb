use crate::tunnel::{Network, Step};
use anyhow::{Context, Result};
use std::io::Write;

/// A writer for the answers of the path finding problem.
///
/// When a path exists, a header line `PATH <length>` is written, followed by one line per step.
/// Each step line is made of the action, the source node and the target node, separated by spaces.
/// When no path exists, a single line `NO PATH` is written.
///
/// # Example
///
/// ```
/// # use tunnelsat::io::PathWriter;
/// # use tunnelsat::tunnel::{Action, ActionSet, Step, TunnelNetwork};
/// let mut network = TunnelNetwork::default();
/// network.new_node("a", ActionSet::all()).unwrap();
/// network.new_node("b", ActionSet::empty()).unwrap();
/// let mut out = Vec::new();
/// PathWriter::default()
///     .write_path(&mut out, &network, &[Step::new(Action::Transmit4, 0, 1)])
///     .unwrap();
/// assert_eq!("PATH 1\ntransmit_4 a b\n", String::from_utf8(out).unwrap());
/// ```
#[derive(Default)]
pub struct PathWriter;

impl PathWriter {
    /// Writes the fact there is no path.
    pub fn write_no_path(&self, writer: &mut dyn Write) -> Result<()> {
        let context = "while writing the absence of path";
        writeln!(writer, "NO PATH").context(context)?;
        writer.flush().context(context)
    }

    /// Writes a path.
    pub fn write_path(
        &self,
        writer: &mut dyn Write,
        network: &dyn Network,
        steps: &[Step],
    ) -> Result<()> {
        let context = "while writing a path";
        writeln!(writer, "PATH {}", steps.len()).context(context)?;
        for step in steps {
            writeln!(writer, "{}", step.describe(network)).context(context)?;
        }
        writer.flush().context(context)
    }
}
