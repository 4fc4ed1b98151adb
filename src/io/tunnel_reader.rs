use super::{warning_result::WarningResult, NetworkReader, WarningHandler};
use crate::tunnel::{read_action, ActionSet, TunnelNetwork};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::io::{BufRead, BufReader, Read};

lazy_static! {
    static ref STATEMENT_PATTERN: Regex =
        Regex::new(r"^\s*([_[:alpha:]]+)\s*\(([^()]*)\)\s*\.\s*$").unwrap();
    static ref NODE_NAME_PATTERN: Regex = Regex::new(r"^[_[:alpha:]][_[:alpha:]\d]*$").unwrap();
}

#[derive(Debug, PartialEq, Eq)]
enum Statement {
    Node(String, ActionSet),
    Edge(String, String),
    Initial(String),
    Final(String),
}

fn read_node_name(name: &str) -> Result<String> {
    if NODE_NAME_PATTERN.is_match(name) {
        Ok(name.to_string())
    } else {
        Err(anyhow!(r#"invalid node name "{}""#, name))
    }
}

fn expect_n_args(keyword: &str, args: &[&str], n: usize) -> Result<()> {
    if args.len() == n {
        Ok(())
    } else {
        Err(anyhow!(
            r#"statement "{}" expects {} argument(s), got {}"#,
            keyword,
            n,
            args.len()
        ))
    }
}

fn try_read_statement(line: &str) -> Result<WarningResult<Statement, String>> {
    let captures = STATEMENT_PATTERN
        .captures(line)
        .ok_or_else(|| anyhow!(r#"syntax error in line "{}""#, line))?;
    let keyword = captures.get(1).unwrap().as_str();
    let args = captures
        .get(2)
        .unwrap()
        .as_str()
        .split(',')
        .map(|a| a.trim())
        .collect::<Vec<&str>>();
    match keyword {
        "node" => {
            let name = read_node_name(args[0])?;
            let mut actions = ActionSet::empty();
            let mut warnings = vec![];
            for a in args.iter().skip(1) {
                let action = read_action(a).with_context(|| format!(r#"in node "{}""#, name))?;
                if !actions.insert(action) {
                    warnings.push(format!(
                        r#"action "{}" is listed twice for node "{}""#,
                        action, name
                    ));
                }
            }
            Ok(warnings
                .into_iter()
                .fold(WarningResult::Ok(Statement::Node(name, actions)), |r, w| {
                    r.with_warning(w)
                }))
        }
        "edge" => {
            expect_n_args(keyword, &args, 2)?;
            Ok(WarningResult::Ok(Statement::Edge(
                read_node_name(args[0])?,
                read_node_name(args[1])?,
            )))
        }
        "initial" => {
            expect_n_args(keyword, &args, 1)?;
            Ok(WarningResult::Ok(Statement::Initial(read_node_name(args[0])?)))
        }
        "final" => {
            expect_n_args(keyword, &args, 1)?;
            Ok(WarningResult::Ok(Statement::Final(read_node_name(args[0])?)))
        }
        _ => Err(anyhow!(r#"unknown statement "{}""#, keyword)),
    }
}

/// A reader for tunneling networks.
///
/// # Format
///
/// The input is made of statements, one per line.
/// Empty lines and lines beginning with a `%` are ignored.
/// Nodes are declared with the actions they allow; edges and endpoints refer to the node names.
/// Statements may appear in any order.
///
/// The following content defines a network of three nodes,
/// in which a IPv6 tunnel may be opened by `a` and closed by `b`.
///
/// ```text
/// % a comment
/// node(a, push_4_6).
/// node(b, pop_6_4, transmit_6).
/// node(c).
/// edge(a,b).
/// edge(b,b).
/// edge(b,c).
/// initial(a).
/// final(c).
/// ```
///
/// Listing an action twice for the same node, or defining an edge twice, triggers a warning.
/// Exactly one initial node and one final node must be defined.
///
/// # Example
///
/// ```
/// # use tunnelsat::io::{NetworkReader, TunnelReader};
/// # use tunnelsat::tunnel::Network;
/// let instance = "node(a, transmit_4).\nnode(b).\nedge(a,b).\ninitial(a).\nfinal(b).\n";
/// let network = TunnelReader::default().read(&mut instance.as_bytes()).unwrap();
/// assert_eq!(2, network.n_nodes());
/// ```
#[derive(Default)]
pub struct TunnelReader {
    warning_handlers: Vec<WarningHandler>,
}

impl TunnelReader {
    fn warn(&self, line: usize, warnings: Vec<String>) {
        for w in warnings.iter() {
            self.warning_handlers
                .iter()
                .for_each(|h| (h)(line, w.to_string()));
        }
    }
}

impl NetworkReader for TunnelReader {
    fn read(&self, reader: &mut dyn Read) -> Result<TunnelNetwork> {
        let mut statements = vec![];
        let br = BufReader::new(reader);
        for (i, line) in br.lines().enumerate() {
            let context = || format!("while reading line {}", i + 1);
            let l = line.with_context(context)?;
            let trimmed = l.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                continue;
            }
            let statement = try_read_statement(trimmed)
                .with_context(context)?
                .consume_warnings(|w| self.warn(i + 1, w));
            statements.push((i + 1, statement));
        }
        let context = |line: usize| format!("while reading line {}", line);
        let mut network = TunnelNetwork::default();
        for (line, statement) in statements.iter() {
            if let Statement::Node(name, actions) = statement {
                network
                    .new_node(name, *actions)
                    .with_context(|| context(*line))?;
            }
        }
        let mut initial_line = None;
        let mut final_line = None;
        for (line, statement) in statements.iter() {
            match statement {
                Statement::Node(..) => {}
                Statement::Edge(from, to) => {
                    if !network.new_edge(from, to).with_context(|| context(*line))? {
                        self.warn(
                            *line,
                            vec![format!(r#"edge from "{}" to "{}" is defined twice"#, from, to)],
                        );
                    }
                }
                Statement::Initial(name) => {
                    if let Some(l) = initial_line {
                        return Err(anyhow!("the initial node was already set at line {}", l))
                            .with_context(|| context(*line));
                    }
                    network
                        .set_initial_node(name)
                        .with_context(|| context(*line))?;
                    initial_line = Some(*line);
                }
                Statement::Final(name) => {
                    if let Some(l) = final_line {
                        return Err(anyhow!("the final node was already set at line {}", l))
                            .with_context(|| context(*line));
                    }
                    network.set_final_node(name).with_context(|| context(*line))?;
                    final_line = Some(*line);
                }
            }
        }
        if initial_line.is_none() {
            return Err(anyhow!("no initial node is defined"));
        }
        if final_line.is_none() {
            return Err(anyhow!("no final node is defined"));
        }
        Ok(network)
    }

    fn add_warning_handler(&mut self, h: WarningHandler) {
        self.warning_handlers.push(h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tunnel::{Action, Network};
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn test_statement_pattern_ok() {
        assert!(STATEMENT_PATTERN.is_match("node(a)."));
        assert!(STATEMENT_PATTERN.is_match("   node ( a , transmit_4 ) .  "));
        assert!(STATEMENT_PATTERN.is_match("edge(a,b)."));
    }

    const WRONG_LINES: [&str; 6] = [
        "node(a)",
        "node a.",
        "(a).",
        "node(a)).",
        "node(a).node(b).",
        "node((a)).",
    ];

    #[test]
    fn test_statement_pattern_not_ok() {
        WRONG_LINES
            .iter()
            .for_each(|l| assert!(!STATEMENT_PATTERN.is_match(l), "{}", l));
    }

    #[test]
    fn test_try_read_statement_ok() {
        let assert_statement = |expected: Statement, line: &str| {
            assert_eq!(
                expected,
                try_read_statement(line)
                    .unwrap()
                    .consume_warnings(|_| panic!())
            );
        };
        assert_statement(Statement::Node("a".to_string(), ActionSet::empty()), "node(a).");
        assert_statement(
            Statement::Node(
                "_a1".to_string(),
                [Action::Pop64, Action::Transmit4].into_iter().collect(),
            ),
            "node( _a1, pop_6_4,transmit_4 ).",
        );
        assert_statement(
            Statement::Edge("a".to_string(), "b".to_string()),
            "edge(a, b).",
        );
        assert_statement(Statement::Initial("a".to_string()), "initial(a).");
        assert_statement(Statement::Final("b".to_string()), "final( b ).");
    }

    #[test]
    fn test_try_read_statement_errors() {
        [
            "node(1a).",
            "node().",
            "node(a, push_4).",
            "edge(a).",
            "edge(a,b,c).",
            "initial(a,b).",
            "final().",
            "arc(a,b).",
        ]
        .iter()
        .chain(WRONG_LINES.iter())
        .for_each(|l| assert!(try_read_statement(l).is_err(), "{}", l));
    }

    #[test]
    fn test_try_read_statement_duplicate_action() {
        let mut warnings = vec![];
        let statement = try_read_statement("node(a, transmit_6, transmit_6).")
            .unwrap()
            .consume_warnings(|w| warnings = w);
        assert_eq!(
            Statement::Node("a".to_string(), [Action::Transmit6].into_iter().collect()),
            statement
        );
        assert_eq!(
            vec![r#"action "transmit_6" is listed twice for node "a""#.to_string()],
            warnings
        );
    }

    #[test]
    fn test_read_ok() {
        let instance = r#"
        % a tunnel
        node(a, push_4_6).
        node(b, pop_6_4, transmit_6).
        node(c).
        edge(a,b).
        edge(b,b).
        edge(b,c).
        initial(a).
        final(c).
        "#;
        let network = TunnelReader::default()
            .read(&mut instance.as_bytes())
            .unwrap();
        assert_eq!(3, network.n_nodes());
        assert_eq!(3, network.n_edges());
        assert_eq!("b", network.node_name(1));
        assert!(network.has_edge(1, 1));
        assert!(!network.has_edge(2, 1));
        assert_eq!(
            [Action::Transmit6, Action::Pop64]
                .into_iter()
                .collect::<ActionSet>(),
            network.actions(1)
        );
        assert_eq!(0, network.initial_node());
        assert_eq!(2, network.final_node());
    }

    #[test]
    fn test_read_any_order() {
        let instance = "final(b).\nedge(a,b).\ninitial(a).\nnode(b).\nnode(a).\n";
        let network = TunnelReader::default()
            .read(&mut instance.as_bytes())
            .unwrap();
        assert_eq!("b", network.node_name(0));
        assert_eq!(1, network.initial_node());
        assert!(network.has_edge(1, 0));
    }

    fn assert_read_error(instance: &str, expected: &str) {
        let err = TunnelReader::default()
            .read(&mut instance.as_bytes())
            .unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains(expected), "{}", msg);
    }

    #[test]
    fn test_read_errors() {
        assert_read_error(
            "node(a).\nnode(b).\narg(a).\n",
            "while reading line 3",
        );
        assert_read_error(
            "node(a).\nnode(a).\ninitial(a).\nfinal(a).\n",
            r#"node "a" is defined twice"#,
        );
        assert_read_error(
            "node(a).\nedge(a,b).\ninitial(a).\nfinal(a).\n",
            r#"no such node: "b""#,
        );
        assert_read_error(
            "node(a, push_6).\ninitial(a).\nfinal(a).\n",
            r#"undefined action "push_6""#,
        );
        assert_read_error("node(a).\nfinal(a).\n", "no initial node is defined");
        assert_read_error("node(a).\ninitial(a).\n", "no final node is defined");
        assert_read_error(
            "node(a).\nnode(b).\ninitial(a).\ninitial(b).\nfinal(a).\n",
            "the initial node was already set at line 3",
        );
        assert_read_error(
            "node(a).\ninitial(a).\nfinal(a).\nfinal(a).\n",
            "the final node was already set at line 3",
        );
    }

    #[test]
    fn test_read_warnings() {
        let instance = "node(a, transmit_4, transmit_4).\nnode(b).\nedge(a,b).\nedge(a,b).\ninitial(a).\nfinal(b).\n";
        let warnings = Rc::new(RefCell::new(vec![]));
        let warnings_clone = Rc::clone(&warnings);
        let mut reader = TunnelReader::default();
        reader.add_warning_handler(Box::new(move |i, w| {
            warnings_clone.borrow_mut().push((i, w))
        }));
        let network = reader.read(&mut instance.as_bytes()).unwrap();
        assert_eq!(1, network.n_edges());
        assert_eq!(
            vec![
                (
                    1,
                    r#"action "transmit_4" is listed twice for node "a""#.to_string()
                ),
                (4, r#"edge from "a" to "b" is defined twice"#.to_string()),
            ],
            warnings.borrow().clone()
        );
    }
}
