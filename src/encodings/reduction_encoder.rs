use crate::{
    formula::{Formula, FormulaSolver},
    tunnel::{self, Action, Network, Protocol},
};
use log::{debug, info};

/// Returns the variable stating the path is at `node` at position `pos`, with its top stack cell at index `height`.
pub fn path_var(solver: &mut dyn FormulaSolver, node: usize, pos: usize, height: usize) -> Formula {
    solver.bool_var(&format!("occupied({},{},{})", node, pos, height))
}

/// Returns the variable stating the stack cell `height` holds `protocol` at position `pos`.
pub fn symbol_var(
    solver: &mut dyn FormulaSolver,
    protocol: Protocol,
    pos: usize,
    height: usize,
) -> Formula {
    solver.bool_var(&format!("symbol{}({},{})", protocol, pos, height))
}

/// Encodes the existence of a path of a given length into a boolean formula.
///
/// The variables are the ones given by [`path_var`] and [`symbol_var`],
/// where positions range from `0` to the length of the path (included)
/// and heights range from `0` to [`stack_size`](crate::tunnel::stack_size) (excluded).
/// A height refers to the index of the top cell: a height of `0` means the stack holds its bottom cell only.
///
/// The formula is the conjunction of six families of constraints:
/// 1. the path starts (resp. ends) at the initial (resp. final) node, with a stack made of a single IPv4 cell;
/// 2. at each position, exactly one couple (node, height) holds;
/// 3. consecutive positions are linked by edges of the network;
/// 4. stack cells hold at most one symbol, and empty cells are only followed by empty cells;
/// 5. the top cell of the current height holds a symbol, and the cell above it is empty;
/// 6. consecutive positions are linked by an action of the source node, which preserves the cells it does not touch.
///
/// Models of the formula are in one-to-one correspondence with the valid paths.
pub struct ReductionEncoder<'a> {
    network: &'a dyn Network,
    length: usize,
    stack_size: usize,
}

impl<'a> ReductionEncoder<'a> {
    /// Builds a new encoder for paths of the given length.
    ///
    /// # Panics
    ///
    /// Panics if the length is 0.
    pub fn new(network: &'a dyn Network, length: usize) -> Self {
        assert!(length >= 1, "the length of the path must be at least 1");
        Self {
            network,
            length,
            stack_size: tunnel::stack_size(length),
        }
    }

    /// Builds the formula which models are the paths.
    pub fn encode(&self, solver: &mut dyn FormulaSolver) -> Formula {
        info!(
            "encoding paths of length {} on a network of {} nodes (stack size is {})",
            self.length,
            self.network.n_nodes(),
            self.stack_size
        );
        let families = vec![
            self.encode_initial_and_final(solver),
            self.encode_uniqueness(solver),
            self.encode_edges(solver),
            self.encode_stack_shape(solver),
            self.encode_occupancy(solver),
            self.encode_transitions(solver),
        ];
        solver.and(families)
    }

    fn states(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.network.n_nodes()).flat_map(move |n| (0..self.stack_size).map(move |h| (n, h)))
    }

    fn n_states(&self) -> usize {
        self.network.n_nodes() * self.stack_size
    }

    fn encode_initial_and_final(&self, solver: &mut dyn FormulaSolver) -> Formula {
        let mut constraints = Vec::with_capacity(2 * (self.n_states() + 1));
        for (pos, endpoint) in [
            (0, self.network.initial_node()),
            (self.length, self.network.final_node()),
        ] {
            for (n, h) in self.states() {
                let var = path_var(solver, n, pos, h);
                if n == endpoint && h == 0 {
                    constraints.push(var);
                } else {
                    constraints.push(solver.not(var));
                }
            }
            constraints.push(symbol_var(solver, Protocol::V4, pos, 0));
        }
        debug!("initial and final constraints: {} terms", constraints.len());
        solver.and(constraints)
    }

    fn encode_uniqueness(&self, solver: &mut dyn FormulaSolver) -> Formula {
        let n_states = self.n_states();
        let mut constraints =
            Vec::with_capacity((self.length + 1) * (1 + n_states * n_states.saturating_sub(1) / 2));
        for pos in 0..=self.length {
            let vars = self
                .states()
                .map(|(n, h)| path_var(solver, n, pos, h))
                .collect::<Vec<Formula>>();
            constraints.push(solver.or(vars.clone()));
            for (i, v1) in vars.iter().enumerate() {
                for v2 in vars.iter().skip(i + 1) {
                    let not_v1 = solver.not(*v1);
                    let not_v2 = solver.not(*v2);
                    constraints.push(solver.or(vec![not_v1, not_v2]));
                }
            }
        }
        debug!("uniqueness constraints: {} terms", constraints.len());
        solver.and(constraints)
    }

    fn encode_edges(&self, solver: &mut dyn FormulaSolver) -> Formula {
        let mut constraints = Vec::with_capacity(self.length * self.n_states());
        let successors = (0..self.network.n_nodes())
            .map(|n| self.network.successors(n))
            .collect::<Vec<Vec<usize>>>();
        for pos in 0..self.length {
            for (n, h) in self.states() {
                let current = path_var(solver, n, pos, h);
                let next_states = successors[n]
                    .iter()
                    .flat_map(|m| (0..self.stack_size).map(move |h_next| (*m, h_next)))
                    .map(|(m, h_next)| path_var(solver, m, pos + 1, h_next))
                    .collect::<Vec<Formula>>();
                let any_next = solver.or(next_states);
                constraints.push(solver.implies(current, any_next));
            }
        }
        debug!("edge constraints: {} terms", constraints.len());
        solver.and(constraints)
    }

    fn empty_cell(&self, solver: &mut dyn FormulaSolver, pos: usize, height: usize) -> Formula {
        let not_4 = symbol_var(solver, Protocol::V4, pos, height);
        let not_4 = solver.not(not_4);
        let not_6 = symbol_var(solver, Protocol::V6, pos, height);
        let not_6 = solver.not(not_6);
        solver.and(vec![not_4, not_6])
    }

    fn encode_stack_shape(&self, solver: &mut dyn FormulaSolver) -> Formula {
        let mut constraints = Vec::with_capacity(2 * (self.length + 1) * self.stack_size);
        for pos in 0..=self.length {
            for h in 0..self.stack_size {
                let s4 = symbol_var(solver, Protocol::V4, pos, h);
                let s6 = symbol_var(solver, Protocol::V6, pos, h);
                let both = solver.and(vec![s4, s6]);
                constraints.push(solver.not(both));
                if h + 1 < self.stack_size {
                    let empty = self.empty_cell(solver, pos, h);
                    let empty_above = self.empty_cell(solver, pos, h + 1);
                    constraints.push(solver.implies(empty, empty_above));
                }
            }
        }
        debug!("stack shape constraints: {} terms", constraints.len());
        solver.and(constraints)
    }

    fn encode_occupancy(&self, solver: &mut dyn FormulaSolver) -> Formula {
        let mut constraints = Vec::with_capacity((self.length + 1) * self.n_states());
        for pos in 0..=self.length {
            for (n, h) in self.states() {
                let occupied = path_var(solver, n, pos, h);
                let s4 = symbol_var(solver, Protocol::V4, pos, h);
                let s6 = symbol_var(solver, Protocol::V6, pos, h);
                let mut cell_constraints = vec![solver.or(vec![s4, s6])];
                if h + 1 < self.stack_size {
                    cell_constraints.push(self.empty_cell(solver, pos, h + 1));
                }
                let cells = solver.and(cell_constraints);
                constraints.push(solver.implies(occupied, cells));
            }
        }
        debug!("occupancy constraints: {} terms", constraints.len());
        solver.and(constraints)
    }

    /// Returns, for each height `k`, the formula stating cells `0` to `k` are the same at `pos` and `pos + 1`.
    fn frames(&self, solver: &mut dyn FormulaSolver, pos: usize) -> Vec<Formula> {
        let mut frames = Vec::with_capacity(self.stack_size);
        let mut previous = solver.constant(true);
        for k in 0..self.stack_size {
            let mut same_cell = Vec::with_capacity(3);
            same_cell.push(previous);
            for p in [Protocol::V4, Protocol::V6] {
                let before = symbol_var(solver, p, pos, k);
                let after = symbol_var(solver, p, pos + 1, k);
                same_cell.push(solver.iff(before, after));
            }
            previous = solver.and(same_cell);
            frames.push(previous);
        }
        frames
    }

    fn action_pattern(
        &self,
        solver: &mut dyn FormulaSolver,
        action: Action,
        pos: usize,
        height: usize,
    ) -> Formula {
        let top = symbol_var(solver, action.top(), pos, height);
        if let Some(pushed) = action.pushed() {
            let new_top = symbol_var(solver, pushed, pos + 1, height + 1);
            solver.and(vec![top, new_top])
        } else if let Some(exposed) = action.exposed() {
            let below = symbol_var(solver, exposed, pos, height - 1);
            solver.and(vec![top, below])
        } else {
            top
        }
    }

    fn encode_transitions(&self, solver: &mut dyn FormulaSolver) -> Formula {
        let mut constraints = Vec::with_capacity(self.length * self.n_states() * self.stack_size);
        for pos in 0..self.length {
            let frames = self.frames(solver, pos);
            for (n, h) in self.states() {
                let actions = self.network.actions(n);
                let current = path_var(solver, n, pos, h);
                for m in self.network.successors(n) {
                    for h_next in 0..self.stack_size {
                        let next = path_var(solver, m, pos + 1, h_next);
                        let both = solver.and(vec![current, next]);
                        let delta = h_next as isize - h as isize;
                        if delta.abs() > 1 {
                            constraints.push(solver.not(both));
                            continue;
                        }
                        let patterns = actions
                            .iter()
                            .filter(|a| a.height_delta() == delta)
                            .map(|a| self.action_pattern(solver, a, pos, h))
                            .collect::<Vec<Formula>>();
                        let any_action = solver.or(patterns);
                        let transition = solver.and(vec![frames[usize::min(h, h_next)], any_action]);
                        constraints.push(solver.implies(both, transition));
                    }
                }
            }
        }
        debug!("transition constraints: {} terms", constraints.len());
        solver.and(constraints)
    }
}
