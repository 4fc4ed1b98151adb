use super::{path_var, symbol_var};
use crate::{
    formula::{FormulaModel, FormulaSolver},
    tunnel::{self, Action, Network, Protocol, Step},
};

/// Translates a model of the formula built by a [`ReductionEncoder`](super::ReductionEncoder) back into a path.
///
/// The solver must be the one used to encode the problem, since variables are retrieved by their names.
pub struct PathDecoder<'a> {
    network: &'a dyn Network,
    length: usize,
    stack_size: usize,
}

impl<'a> PathDecoder<'a> {
    /// Builds a new decoder for paths of the given length.
    pub fn new(network: &'a dyn Network, length: usize) -> Self {
        Self {
            network,
            length,
            stack_size: tunnel::stack_size(length),
        }
    }

    /// Decodes the path encoded by a model.
    ///
    /// # Panics
    ///
    /// Panics if the model does not satisfy the formula built by the encoder for the same network and length.
    pub fn decode_path(
        &self,
        solver: &mut dyn FormulaSolver,
        model: &dyn FormulaModel,
    ) -> Vec<Step> {
        let states = (0..=self.length)
            .map(|pos| {
                let mut states = self.states_at(solver, model, pos);
                assert_eq!(
                    1,
                    states.len(),
                    "expected exactly one (node, height) pair at position {}",
                    pos
                );
                states.remove(0)
            })
            .collect::<Vec<(usize, usize)>>();
        states
            .windows(2)
            .enumerate()
            .map(|(pos, w)| {
                let ((source, height), (target, next_height)) = (w[0], w[1]);
                let top = self.symbol_at(solver, model, pos, height);
                let action = if next_height == height {
                    Action::transmit(top)
                } else if next_height == height + 1 {
                    Action::push(top, self.symbol_at(solver, model, pos + 1, next_height))
                } else if next_height + 1 == height {
                    Action::pop(top, self.symbol_at(solver, model, pos, next_height))
                } else {
                    panic!(
                        "height changes from {} to {} at position {}",
                        height, next_height, pos
                    )
                };
                Step::new(action, source, target)
            })
            .collect()
    }

    /// Describes the content of a model, position by position.
    ///
    /// For each position, the (node, height) pairs set to true and the stack cells are given.
    /// Stack cells are written `4`, `6`, `X` if both symbols are set, or a blank if the cell is empty.
    /// Unexpected situations (no pair or several pairs, ill-formed stacks) are reported on dedicated lines.
    /// Contrary to [`decode_path`](Self::decode_path), this function never panics on models that are not solutions.
    pub fn describe_model(
        &self,
        solver: &mut dyn FormulaSolver,
        model: &dyn FormulaModel,
    ) -> Vec<String> {
        let mut lines = Vec::with_capacity(3 * (self.length + 1));
        for pos in 0..=self.length {
            let states = self.states_at(solver, model, pos);
            let states_str = states
                .iter()
                .map(|(n, h)| format!("({},{})", self.network.node_name(*n), h))
                .collect::<Vec<String>>()
                .join(" ");
            lines.push(format!("position {}: {}", pos, states_str));
            match states.len() {
                0 => lines.push("warning: no node at this position".to_string()),
                1 => {}
                _ => lines.push("warning: several (node, height) pairs at this position".to_string()),
            }
            let mut cells = String::from("|");
            let mut above_top = false;
            let mut ill_formed = false;
            for h in 0..self.stack_size {
                let s4 = model.value_of(symbol_var(solver, Protocol::V4, pos, h));
                let s6 = model.value_of(symbol_var(solver, Protocol::V6, pos, h));
                let c = match (s4, s6) {
                    (true, true) => 'X',
                    (true, false) => '4',
                    (false, true) => '6',
                    (false, false) => ' ',
                };
                if (s4 && s6) || (above_top && (s4 || s6)) {
                    ill_formed = true;
                }
                above_top |= !s4 && !s6;
                cells.push(c);
                cells.push('|');
            }
            lines.push(format!("stack: {}", cells));
            if ill_formed {
                lines.push("warning: ill-formed stack".to_string());
            }
        }
        lines
    }

    fn states_at(
        &self,
        solver: &mut dyn FormulaSolver,
        model: &dyn FormulaModel,
        pos: usize,
    ) -> Vec<(usize, usize)> {
        let mut states = vec![];
        for n in 0..self.network.n_nodes() {
            for h in 0..self.stack_size {
                if model.value_of(path_var(solver, n, pos, h)) {
                    states.push((n, h));
                }
            }
        }
        states
    }

    fn symbol_at(
        &self,
        solver: &mut dyn FormulaSolver,
        model: &dyn FormulaModel,
        pos: usize,
        height: usize,
    ) -> Protocol {
        if model.value_of(symbol_var(solver, Protocol::V4, pos, height)) {
            Protocol::V4
        } else {
            Protocol::V6
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        formula::{Formula, TseitinFormulaSolver},
        tunnel::{ActionSet, TunnelNetwork},
    };
    use std::collections::HashSet;

    struct TestModel(HashSet<Formula>);

    impl FormulaModel for TestModel {
        fn value_of(&self, formula: Formula) -> bool {
            self.0.contains(&formula)
        }
    }

    fn tunnel_network() -> TunnelNetwork {
        let mut network = TunnelNetwork::default();
        network.new_node("a", ActionSet::all()).unwrap();
        network.new_node("b", ActionSet::all()).unwrap();
        network.new_node("c", ActionSet::all()).unwrap();
        network.new_edge("a", "b").unwrap();
        network.new_edge("b", "c").unwrap();
        network.set_initial_node("a").unwrap();
        network.set_final_node("c").unwrap();
        network
    }

    fn tunnel_model(solver: &mut dyn FormulaSolver) -> TestModel {
        let mut vars = HashSet::new();
        vars.insert(path_var(solver, 0, 0, 0));
        vars.insert(path_var(solver, 1, 1, 1));
        vars.insert(path_var(solver, 2, 2, 0));
        vars.insert(symbol_var(solver, Protocol::V4, 0, 0));
        vars.insert(symbol_var(solver, Protocol::V4, 1, 0));
        vars.insert(symbol_var(solver, Protocol::V6, 1, 1));
        vars.insert(symbol_var(solver, Protocol::V4, 2, 0));
        TestModel(vars)
    }

    #[test]
    fn test_decode_push_pop() {
        let network = tunnel_network();
        let mut solver = TseitinFormulaSolver::default();
        let model = tunnel_model(&mut solver);
        let path = PathDecoder::new(&network, 2).decode_path(&mut solver, &model);
        assert_eq!(
            vec![
                Step::new(Action::Push46, 0, 1),
                Step::new(Action::Pop64, 1, 2)
            ],
            path
        );
    }

    #[test]
    fn test_decode_tunnel_loop() {
        let mut network = TunnelNetwork::default();
        network
            .new_node("n0", [Action::Push46].into_iter().collect())
            .unwrap();
        network
            .new_node("n1", [Action::Pop64].into_iter().collect())
            .unwrap();
        network.new_node("n2", ActionSet::empty()).unwrap();
        network.new_edge("n0", "n1").unwrap();
        network.new_edge("n1", "n1").unwrap();
        network.new_edge("n1", "n2").unwrap();
        network.set_initial_node("n0").unwrap();
        network.set_final_node("n1").unwrap();
        let mut solver = TseitinFormulaSolver::default();
        let mut vars = HashSet::new();
        vars.insert(path_var(&mut solver, 0, 0, 0));
        vars.insert(path_var(&mut solver, 1, 1, 1));
        vars.insert(path_var(&mut solver, 1, 2, 0));
        vars.insert(symbol_var(&mut solver, Protocol::V4, 0, 0));
        vars.insert(symbol_var(&mut solver, Protocol::V4, 1, 0));
        vars.insert(symbol_var(&mut solver, Protocol::V6, 1, 1));
        vars.insert(symbol_var(&mut solver, Protocol::V4, 2, 0));
        let path = PathDecoder::new(&network, 2).decode_path(&mut solver, &TestModel(vars));
        assert_eq!(
            vec![
                Step::new(Action::Push46, 0, 1),
                Step::new(Action::Pop64, 1, 1)
            ],
            path
        );
        crate::tunnel::check_path(&network, 2, &path).unwrap();
    }

    #[test]
    fn test_decode_transmit() {
        let network = tunnel_network();
        let mut solver = TseitinFormulaSolver::default();
        let mut vars = HashSet::new();
        vars.insert(path_var(&mut solver, 0, 0, 0));
        vars.insert(path_var(&mut solver, 1, 1, 0));
        vars.insert(path_var(&mut solver, 2, 2, 0));
        vars.insert(symbol_var(&mut solver, Protocol::V4, 0, 0));
        vars.insert(symbol_var(&mut solver, Protocol::V4, 1, 0));
        vars.insert(symbol_var(&mut solver, Protocol::V4, 2, 0));
        let path = PathDecoder::new(&network, 2).decode_path(&mut solver, &TestModel(vars));
        assert_eq!(
            vec![
                Step::new(Action::Transmit4, 0, 1),
                Step::new(Action::Transmit4, 1, 2)
            ],
            path
        );
    }

    #[test]
    #[should_panic(expected = "expected exactly one (node, height) pair at position 1")]
    fn test_decode_missing_state() {
        let network = tunnel_network();
        let mut solver = TseitinFormulaSolver::default();
        let mut vars = HashSet::new();
        vars.insert(path_var(&mut solver, 0, 0, 0));
        vars.insert(path_var(&mut solver, 2, 2, 0));
        PathDecoder::new(&network, 2).decode_path(&mut solver, &TestModel(vars));
    }

    #[test]
    fn test_describe_model() {
        let network = tunnel_network();
        let mut solver = TseitinFormulaSolver::default();
        let model = tunnel_model(&mut solver);
        let lines = PathDecoder::new(&network, 2).describe_model(&mut solver, &model);
        assert_eq!(
            vec![
                "position 0: (a,0)",
                "stack: |4| |",
                "position 1: (b,1)",
                "stack: |4|6|",
                "position 2: (c,0)",
                "stack: |4| |",
            ],
            lines
        );
    }

    #[test]
    fn test_describe_ill_formed_model() {
        let network = tunnel_network();
        let mut solver = TseitinFormulaSolver::default();
        let mut vars = HashSet::new();
        vars.insert(path_var(&mut solver, 0, 0, 0));
        vars.insert(path_var(&mut solver, 1, 0, 1));
        vars.insert(symbol_var(&mut solver, Protocol::V4, 0, 1));
        vars.insert(symbol_var(&mut solver, Protocol::V6, 0, 1));
        let lines = PathDecoder::new(&network, 2).describe_model(&mut solver, &TestModel(vars));
        assert_eq!(
            vec![
                "position 0: (a,0) (b,1)",
                "warning: several (node, height) pairs at this position",
                "stack: | |X|",
                "warning: ill-formed stack",
                "position 1: ",
                "warning: no node at this position",
                "stack: | | |",
                "position 2: ",
                "warning: no node at this position",
                "stack: | | |",
            ],
            lines
        );
    }
}
