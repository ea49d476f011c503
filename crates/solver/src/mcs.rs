use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::info;
use mcs_graph::Graph;

use crate::bidomain::initial_domains;
use crate::incumbent::AtomicIncumbent;
use crate::pool::{HelperPool, Position};
use crate::search::{solve, SearchCtx, WorkerState};
use crate::timeout::Timeout;
use crate::{McsConfig, Solution, VtxPair};

/// Finds a maximum common induced subgraph of `g0` and `g1`.
///
/// The graphs are first reordered by degree so that branching starts on
/// the most constrained vertices, then searched with the configured
/// number of threads. The returned mapping refers to the original vertex
/// ids, in ascending `v` order.
pub fn max_common_subgraph(g0: &Graph, g1: &Graph, config: McsConfig) -> Solution {
    let start = Instant::now();
    let threads = match config.threads {
        0 => num_cpus::get(),
        threads => threads,
    };

    let deg0 = g0.degrees();
    let deg1 = g1.degrees();

    // Branch on high-degree vertices of the sparser graph first; flip to
    // ascending when the other graph is dense so complements behave
    // symmetrically.
    let vv0 = degree_order(&deg0, is_dense(g1.node_count(), &deg1));
    let vv1 = degree_order(&deg1, is_dense(g0.node_count(), &deg0));

    let g0_sorted = Arc::new(g0.induced_subgraph(&vv0));
    let g1_sorted = Arc::new(g1.induced_subgraph(&vv1));

    let timeout = Timeout::start(config.timeout);
    let (mut mapping, nodes) = search(g0_sorted, g1_sorted, config, threads, timeout.abort_flag());

    // Back to the indices of the unsorted input graphs.
    for pair in &mut mapping {
        pair.v = vv0[pair.v];
        pair.w = vv1[pair.w];
    }
    mapping.sort_unstable_by_key(|pair| pair.v);

    let aborted = timeout.finish();
    debug_assert!(validate_mapping(g0, g1, &mapping));

    Solution {
        mapping,
        nodes,
        elapsed: start.elapsed(),
        aborted,
    }
}

/// Checks that `mapping` is a common induced subgraph of `g0` and `g1`:
/// injective on both sides, label-preserving and arc-preserving.
pub fn validate_mapping(g0: &Graph, g1: &Graph, mapping: &[VtxPair]) -> bool {
    let mut used_left = vec![false; g0.node_count()];
    let mut used_right = vec![false; g1.node_count()];

    for (i, p0) in mapping.iter().enumerate() {
        if p0.v >= g0.node_count() || p0.w >= g1.node_count() {
            return false;
        }
        if used_left[p0.v] || used_right[p0.w] {
            return false;
        }
        used_left[p0.v] = true;
        used_right[p0.w] = true;

        if g0.label(p0.v) != g1.label(p0.w) {
            return false;
        }
        for p1 in &mapping[i + 1..] {
            if g0.edge_label(p0.v, p1.v) != g1.edge_label(p0.w, p1.w) {
                return false;
            }
        }
    }

    true
}

fn is_dense(node_count: usize, degrees: &[usize]) -> bool {
    degrees.iter().sum::<usize>() > node_count * node_count.saturating_sub(1)
}

fn degree_order(degrees: &[usize], ascending: bool) -> Vec<usize> {
    let mut order: Vec<usize> = (0..degrees.len()).collect();
    // Stable, so vertices of equal degree keep their id order.
    if ascending {
        order.sort_by(|&a, &b| degrees[a].cmp(&degrees[b]));
    } else {
        order.sort_by(|&a, &b| degrees[b].cmp(&degrees[a]));
    }
    order
}

fn search(
    g0: Arc<Graph>,
    g1: Arc<Graph>,
    config: McsConfig,
    threads: usize,
    abort: Arc<AtomicBool>,
) -> (Vec<VtxPair>, u64) {
    let (left, right, domains) = initial_domains(&g0, &g1);
    let incumbent = Arc::new(AtomicIncumbent::new());
    let mut best: Vec<VtxPair> = Vec::new();
    let mut nodes = 0;

    let goals: Vec<usize> = if config.big_first {
        (1..=g0.node_count()).rev().collect()
    } else {
        vec![1]
    };

    for goal in goals {
        let ctx = Arc::new(SearchCtx {
            g0: Arc::clone(&g0),
            g1: Arc::clone(&g1),
            config,
            goal,
            incumbent: Arc::clone(&incumbent),
            abort: Arc::clone(&abort),
        });
        let pool = HelperPool::new(threads.saturating_sub(1));

        let mut worker = WorkerState::default();
        let mut current = Vec::new();
        let mut domains = domains.clone();
        let mut left = left.clone();
        let mut right = right.clone();

        solve(
            &ctx,
            &pool,
            0,
            &mut current,
            &mut domains,
            &mut left,
            &mut right,
            Position::default(),
            &mut worker,
        );

        let mut states = pool.shutdown();
        states.push(worker);
        for state in states {
            nodes += state.nodes;
            if state.incumbent.len() > best.len() {
                best = state.incumbent;
            }
        }

        if incumbent.get() == goal || abort.load(Ordering::SeqCst) {
            break;
        }
        info!("Upper bound: {}", goal - 1);
    }

    (best, nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcs_graph::GraphBuilder;

    #[test]
    fn degree_order_is_stable() {
        let degrees = vec![2, 1, 2, 3, 1];

        assert_eq!(degree_order(&degrees, false), vec![3, 0, 2, 1, 4]);
        assert_eq!(degree_order(&degrees, true), vec![1, 4, 0, 2, 3]);
    }

    #[test]
    fn dense_needs_more_than_all_simple_edges() {
        // A complete graph on 3 vertices has degree sum 6 = n(n-1).
        assert!(!is_dense(3, &[2, 2, 2]));
        // A loopy or multi-arc degree sum beyond that counts as dense.
        assert!(is_dense(3, &[3, 2, 2]));
    }

    #[test]
    fn validate_accepts_a_correct_mapping() {
        let g0 = GraphBuilder::new(3).edge(0, 1).edge(1, 2).build().unwrap();
        let g1 = GraphBuilder::new(3).edge(0, 1).edge(0, 2).build().unwrap();

        // 0-1-2 mapped onto 1-0-2 preserves the single shared path.
        let mapping = [
            VtxPair { v: 0, w: 1 },
            VtxPair { v: 1, w: 0 },
            VtxPair { v: 2, w: 2 },
        ];

        assert!(validate_mapping(&g0, &g1, &mapping));
    }

    #[test]
    fn validate_rejects_broken_mappings() {
        let g0 = GraphBuilder::new(3).edge(0, 1).edge(1, 2).build().unwrap();
        let g1 = GraphBuilder::new(3).edge(0, 1).edge(0, 2).build().unwrap();

        // Not injective.
        assert!(!validate_mapping(
            &g0,
            &g1,
            &[VtxPair { v: 0, w: 1 }, VtxPair { v: 1, w: 1 }]
        ));
        // Maps the edge 0-1 onto the non-edge 1-2.
        assert!(!validate_mapping(
            &g0,
            &g1,
            &[VtxPair { v: 0, w: 1 }, VtxPair { v: 1, w: 2 }]
        ));
        // Label mismatch.
        let g2 = GraphBuilder::new(1).labels(vec![7]).build().unwrap();
        let g3 = GraphBuilder::new(1).labels(vec![8]).build().unwrap();
        assert!(!validate_mapping(&g2, &g3, &[VtxPair { v: 0, w: 0 }]));
    }
}
