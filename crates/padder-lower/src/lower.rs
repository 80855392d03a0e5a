//! Prefix matrix to gate DAG lowering
//!
//! For an `n`-bit adder the DAG is laid out as:
//!
//! ```text
//! 0 .. n          A operand bits
//! n .. 2n         B operand bits
//! 2n .. 3n        bitwise generate   g_i = a_i AND b_i
//! 3n .. 4n        bitwise propagate  p_i = a_i XOR b_i
//! 4n ..           one black cell per matrix node, row by row
//!                 n-1 sum XORs       s_i = p_i XOR G[i-1]
//! ```
//!
//! A black cell at `(row, col)` with value `v` updates bit `b = col + 1`:
//!
//! ```text
//! G[b] = G[b] OR (P[b] AND G[v])
//! P[b] = P[b] AND P[v]        (skipped when no later cell reads P[b])
//! ```

use crate::gate::{Endianness, GateDag, GateNode, GateOp};
use padder_graph::{PrefixMatrix, Result};

struct DagBuilder {
    inputs: usize,
    gates: Vec<GateNode>,
}

impl DagBuilder {
    fn push(&mut self, a: usize, b: usize, op: GateOp) -> usize {
        self.gates.push(GateNode { a, b, op });
        self.inputs + self.gates.len() - 1
    }
}

/// A matrix node in emission order
struct Node {
    bit: usize,
    value: usize,
    propagates: bool,
}

/// Nodes in emission order, each marked with whether its propagate update is
/// read again.
///
/// Liveness runs backwards: a node always reads the current `P[bit]` for its
/// carry term, and reads `P[value]` only when its own update is emitted.
fn schedule(matrix: &PrefixMatrix) -> Vec<Node> {
    let mut nodes: Vec<Node> = matrix
        .rows()
        .flat_map(|row| {
            row.iter().enumerate().rev().filter_map(|(col, cell)| {
                cell.map(|value| Node {
                    bit: col + 1,
                    value,
                    propagates: false,
                })
            })
        })
        .collect();

    let mut live = vec![false; matrix.bit_width()];
    for node in nodes.iter_mut().rev() {
        node.propagates = live[node.bit];
        live[node.bit] = true;
        if node.propagates {
            live[node.value] = true;
        }
    }
    nodes
}

/// Lower `matrix` into a gate DAG.
///
/// Invalid matrices are lowered as they are. The circuit then does not add
/// correctly, but still computes what the prefix graph describes.
pub fn lower(matrix: &PrefixMatrix, endianness: Endianness) -> GateDag {
    let n = matrix.bit_width();
    if !matrix.reachability().is_complete() {
        log::warn!(
            "lowering a {}-bit prefix matrix that is not a working adder (error {})",
            n,
            matrix.error_hamming_distance()
        );
    }

    let mut dag = DagBuilder {
        inputs: 2 * n,
        gates: Vec::new(),
    };
    let mut generate: Vec<usize> = (0..n).map(|i| dag.push(i, n + i, GateOp::And)).collect();
    let mut propagate: Vec<usize> = (0..n).map(|i| dag.push(i, n + i, GateOp::Xor)).collect();
    let half_sums = propagate.clone();

    for node in schedule(matrix) {
        let (bit, v) = (node.bit, node.value);
        let carry = dag.push(propagate[bit], generate[v], GateOp::And);
        generate[bit] = dag.push(generate[bit], carry, GateOp::Or);
        if node.propagates {
            propagate[bit] = dag.push(propagate[bit], propagate[v], GateOp::And);
        }
    }

    let mut outputs = Vec::with_capacity(n + 1);
    outputs.push(half_sums[0]);
    for i in 1..n {
        outputs.push(dag.push(half_sums[i], generate[i - 1], GateOp::Xor));
    }
    outputs.push(generate[n - 1]);

    let mut gates = dag.gates;
    if endianness == Endianness::Big {
        let inputs = 2 * n;
        let remap = |r: usize| if r < inputs { inputs - 1 - r } else { r };
        for gate in &mut gates {
            gate.a = remap(gate.a);
            gate.b = remap(gate.b);
        }
        outputs.reverse();
    }

    log::debug!(
        "lowered {}-bit adder with {} nodes into {} gates",
        n,
        matrix.node_count(),
        gates.len()
    );
    GateDag {
        bit_width: n,
        endianness,
        gates,
        outputs,
    }
}

/// Like [`lower`], but refuses matrices that fail [`PrefixMatrix::verify`]
pub fn lower_verified(matrix: &PrefixMatrix, endianness: Endianness) -> Result<GateDag> {
    matrix.verify()?;
    Ok(lower(matrix, endianness))
}
