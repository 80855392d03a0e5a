//! padder lower - gate-level lowering of prefix adders
//!
//! Turns a [`padder_graph::PrefixMatrix`] into a DAG of two-input AND, XOR
//! and OR gates that computes `a + b` with a carry-out, exports it as JSON
//! and evaluates it.
//!
//! # Example
//!
//! ```ignore
//! use padder_lower::{lower, Endianness};
//!
//! let matrix = padder_topology::kogge_stone(8)?;
//! let dag = lower(&matrix, Endianness::Little);
//! assert_eq!(dag.simulate(200, 100)?, 300);
//! println!("{}", dag.to_json()?);
//! ```

pub mod gate;
pub mod lower;

pub use gate::{Endianness, GateDag, GateNode, GateOp, GateStats};
pub use lower::{lower, lower_verified};
