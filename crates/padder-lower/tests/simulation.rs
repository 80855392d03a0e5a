//! Lowered adders add

use padder_graph::PrefixMatrix;
use padder_lower::{lower, lower_verified, Endianness, GateDag};
use padder_topology::{registry, Topology, TopologyKind};
use proptest::prelude::*;

fn topologies() -> Vec<Topology> {
    let mut topologies: Vec<Topology> = registry::kinds()
        .map(TopologyKind::default_topology)
        .collect();
    topologies.push(Topology::LadnerFischer { levels: 2 });
    topologies.push(Topology::HanCarlson { levels: 2 });
    topologies.push(Topology::RippleCarryBrentKung { levels: 2 });
    topologies
}

fn lowered(topology: &Topology, n: usize, endianness: Endianness) -> GateDag {
    let matrix = topology.generate(n).unwrap();
    lower_verified(&matrix, endianness).unwrap()
}

#[test]
fn test_exhaustive_small_widths() {
    for n in 1..=6u32 {
        for topology in topologies() {
            for endianness in [Endianness::Little, Endianness::Big] {
                let dag = lowered(&topology, n as usize, endianness);
                for a in 0..1u128 << n {
                    for b in 0..1u128 << n {
                        assert_eq!(
                            dag.simulate(a, b).unwrap(),
                            a + b,
                            "{} {:?} {}-bit: {} + {}",
                            topology,
                            endianness,
                            n,
                            a,
                            b
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_gate_count_follows_node_count() {
    for n in 2..=32 {
        for topology in topologies() {
            let matrix = topology.generate(n).unwrap();
            let dag = lower(&matrix, Endianness::Little);
            let nodes = matrix.node_count();
            let used_columns = (0..matrix.size())
                .filter(|&col| (0..matrix.size()).any(|r| matrix.get(r, col).is_some()))
                .count();

            let stats = dag.op_counts();
            assert_eq!(stats.xor, n + n - 1);
            assert_eq!(stats.or, nodes);
            assert_eq!(stats.and, n + nodes + nodes - used_columns);
            assert_eq!(stats.total(), dag.gates().len());
            assert_eq!(dag.outputs().len(), n + 1);
        }
    }
}

#[test]
fn test_references_point_backwards() {
    for topology in topologies() {
        let dag = lowered(&topology, 24, Endianness::Big);
        let inputs = dag.input_count();
        for (i, gate) in dag.gates().iter().enumerate() {
            assert!(gate.a < inputs + i && gate.b < inputs + i);
        }
        assert!(dag.outputs().iter().all(|&r| r < inputs + dag.gates().len()));
    }
}

#[test]
fn test_big_endian_mirrors_little_endian() {
    for topology in topologies() {
        let matrix = topology.generate(16).unwrap();
        let little = lower(&matrix, Endianness::Little);
        let big = lower(&matrix, Endianness::Big);
        let inputs = little.input_count();

        for (l, b) in little.gates().iter().zip(big.gates()) {
            let remap = |r: usize| if r < inputs { inputs - 1 - r } else { r };
            assert_eq!((remap(l.a), remap(l.b), l.op), (b.a, b.b, b.op));
        }
        let mut outputs = little.outputs().to_vec();
        outputs.reverse();
        assert_eq!(outputs, big.outputs());
    }
}

#[test]
fn test_depth_tracks_levels() {
    // Bitwise stage, then an AND and an OR per level
    let kogge_stone = lowered(&Topology::KoggeStone, 32, Endianness::Little);
    let ripple = lowered(&Topology::RippleCarry, 32, Endianness::Little);
    assert!(kogge_stone.depth() < ripple.depth());
    assert_eq!(kogge_stone.depth(), 1 + 2 * 5);
}

fn any_matrix() -> impl Strategy<Value = PrefixMatrix> {
    (2usize..=7).prop_flat_map(|n| {
        let size = n - 1;
        let cell = (prop::bool::weighted(0.4), any::<usize>());
        prop::collection::vec(prop::collection::vec(cell, size), size).prop_map(move |raw| {
            let rows = raw
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .enumerate()
                        .map(|(col, (filled, v))| filled.then_some(v % (col + 1)))
                        .collect()
                })
                .collect();
            PrefixMatrix::from_rows(n, rows).unwrap()
        })
    })
}

/// Sum computed straight from the prefix graph, both signals updated at every node
fn graph_sum(matrix: &PrefixMatrix, a: u128, b: u128) -> u128 {
    let n = matrix.bit_width();
    let mut g: Vec<bool> = (0..n).map(|i| (a >> i) & (b >> i) & 1 == 1).collect();
    let mut p: Vec<bool> = (0..n).map(|i| ((a >> i) ^ (b >> i)) & 1 == 1).collect();
    let half_sums = p.clone();
    for row in matrix.rows() {
        for (col, cell) in row.iter().enumerate().rev() {
            if let Some(v) = *cell {
                g[col + 1] |= p[col + 1] && g[v];
                p[col + 1] &= p[v];
            }
        }
    }
    (1..n).fold(half_sums[0] as u128, |sum, i| {
        sum | ((half_sums[i] ^ g[i - 1]) as u128) << i
    }) | (g[n - 1] as u128) << n
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_any_matrix_lowers_to_its_graph(matrix in any_matrix()) {
        let n = matrix.bit_width();
        let dag = lower(&matrix, Endianness::Little);
        for a in 0..1u128 << n {
            for b in 0..1u128 << n {
                prop_assert_eq!(dag.simulate(a, b).unwrap(), graph_sum(&matrix, a, b));
            }
        }
    }

    #[test]
    fn prop_wide_adders_add(n in 7usize..=64, a in any::<u64>(), b in any::<u64>()) {
        let mask = if n == 64 { u64::MAX } else { (1u64 << n) - 1 };
        let (a, b) = (u128::from(a & mask), u128::from(b & mask));
        for topology in topologies() {
            for endianness in [Endianness::Little, Endianness::Big] {
                let dag = lowered(&topology, n, endianness);
                prop_assert_eq!(dag.simulate(a, b).unwrap(), a + b);
            }
        }
    }
}
