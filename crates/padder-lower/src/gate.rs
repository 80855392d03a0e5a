//! Two-input gates and the gate DAG

use padder_graph::{PrefixError, Result};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Gate operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateOp {
    And,
    Xor,
    Or,
}

impl GateOp {
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            GateOp::And => a & b,
            GateOp::Xor => a ^ b,
            GateOp::Or => a | b,
        }
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GateOp::And => "AND",
            GateOp::Xor => "XOR",
            GateOp::Or => "OR",
        };
        f.write_str(name)
    }
}

/// One gate: two input references and an operator.
///
/// References index the primary inputs `0..2n` followed by the gates in
/// emission order. Serialized as `[a, b, "OP"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "(usize, usize, GateOp)", from = "(usize, usize, GateOp)")]
pub struct GateNode {
    pub a: usize,
    pub b: usize,
    pub op: GateOp,
}

impl From<GateNode> for (usize, usize, GateOp) {
    fn from(node: GateNode) -> Self {
        (node.a, node.b, node.op)
    }
}

impl From<(usize, usize, GateOp)> for GateNode {
    fn from((a, b, op): (usize, usize, GateOp)) -> Self {
        GateNode { a, b, op }
    }
}

/// Primary input and output ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endianness {
    /// Inputs `A[0..n]` then `B[0..n]`; outputs sum bit 0 first, carry last
    #[default]
    Little,
    /// Every primary input reference `r` becomes `2n - 1 - r`; outputs
    /// carry first
    Big,
}

/// Gate counts per operator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateStats {
    pub and: usize,
    pub xor: usize,
    pub or: usize,
}

impl GateStats {
    pub fn total(&self) -> usize {
        self.and + self.xor + self.or
    }
}

/// A lowered adder: gates in emission order plus the output references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDag {
    pub(crate) bit_width: usize,
    pub(crate) endianness: Endianness,
    pub(crate) gates: Vec<GateNode>,
    pub(crate) outputs: Vec<usize>,
}

impl GateDag {
    pub fn bit_width(&self) -> usize {
        self.bit_width
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Number of primary inputs (`2n`)
    pub fn input_count(&self) -> usize {
        2 * self.bit_width
    }

    pub fn gates(&self) -> &[GateNode] {
        &self.gates
    }

    /// Sum bit references followed by the carry-out (reversed for big endian)
    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }

    pub fn op_counts(&self) -> GateStats {
        let mut stats = GateStats::default();
        for gate in &self.gates {
            match gate.op {
                GateOp::And => stats.and += 1,
                GateOp::Xor => stats.xor += 1,
                GateOp::Or => stats.or += 1,
            }
        }
        stats
    }

    /// Longest input-to-output path, in gates
    pub fn depth(&self) -> usize {
        let inputs = self.input_count();
        let mut depths = vec![0usize; inputs + self.gates.len()];
        for (i, gate) in self.gates.iter().enumerate() {
            depths[inputs + i] = depths[gate.a].max(depths[gate.b]) + 1;
        }
        self.outputs.iter().map(|&r| depths[r]).max().unwrap_or(0)
    }

    /// Evaluate the DAG on raw primary input values
    pub fn evaluate(&self, inputs: &[bool]) -> Result<Vec<bool>> {
        if inputs.len() != self.input_count() {
            return Err(PrefixError::Configuration(format!(
                "{}-bit adder takes {} inputs, got {}",
                self.bit_width,
                self.input_count(),
                inputs.len()
            )));
        }
        let mut values = Vec::with_capacity(inputs.len() + self.gates.len());
        values.extend_from_slice(inputs);
        for gate in &self.gates {
            let value = gate.op.apply(values[gate.a], values[gate.b]);
            values.push(value);
        }
        Ok(self.outputs.iter().map(|&r| values[r]).collect())
    }

    /// Add two operands through the DAG.
    ///
    /// Only the low `n` bits of each operand are used. Widths above 127 bits
    /// do not fit the result and are rejected.
    pub fn simulate(&self, a: u128, b: u128) -> Result<u128> {
        let n = self.bit_width;
        if n >= 128 {
            return Err(PrefixError::Configuration(format!(
                "cannot simulate a {}-bit adder with 128-bit operands",
                n
            )));
        }
        let bit = |x: u128, i: usize| (x >> i) & 1 == 1;
        let mut inputs: Vec<bool> = (0..n)
            .map(|i| bit(a, i))
            .chain((0..n).map(|i| bit(b, i)))
            .collect();
        if self.endianness == Endianness::Big {
            inputs.reverse();
        }

        let mut outputs = self.evaluate(&inputs)?;
        if self.endianness == Endianness::Big {
            outputs.reverse();
        }
        Ok(outputs
            .iter()
            .enumerate()
            .fold(0, |sum, (i, &bit)| sum | (u128::from(bit) << i)))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for GateDag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.gates.len() + 1))?;
        for gate in &self.gates {
            seq.serialize_element(gate)?;
        }
        seq.serialize_element(&self.outputs)?;
        seq.end()
    }
}
