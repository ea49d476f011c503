use std::collections::BTreeSet;

use mcs_graph::Graph;

use crate::{Heuristic, McsConfig};

/// A pair of candidate vertex sets, stored as slices of the flat `left`
/// and `right` index buffers. Every vertex in the left slice can be
/// mapped to every vertex in the right slice without violating labels or
/// adjacency to the pairs matched so far. `is_adjacent` records that the
/// left vertices are adjacent to at least one matched vertex, which is
/// what makes the bidomain branchable in connected mode.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bidomain {
    pub(crate) l: usize,
    pub(crate) r: usize,
    pub(crate) left_len: usize,
    pub(crate) right_len: usize,
    pub(crate) is_adjacent: bool,
}

/// One bidomain per vertex label present in both graphs, in ascending
/// label order. Loop vertices land in their own classes via the label
/// loop bit.
pub(crate) fn initial_domains(g0: &Graph, g1: &Graph) -> (Vec<usize>, Vec<usize>, Vec<Bidomain>) {
    let left_labels: BTreeSet<u32> = g0.labels().iter().copied().collect();
    let right_labels: BTreeSet<u32> = g1.labels().iter().copied().collect();

    let mut left = Vec::with_capacity(g0.node_count());
    let mut right = Vec::with_capacity(g1.node_count());
    let mut domains = Vec::new();

    for &label in left_labels.intersection(&right_labels) {
        let l = left.len();
        let r = right.len();
        left.extend((0..g0.node_count()).filter(|&v| g0.label(v) == label));
        right.extend((0..g1.node_count()).filter(|&w| g1.label(w) == label));
        domains.push(Bidomain {
            l,
            r,
            left_len: left.len() - l,
            right_len: right.len() - r,
            is_adjacent: false,
        });
    }

    (left, right, domains)
}

/// Upper bound on the number of pairs still matchable: each bidomain
/// contributes at most its smaller side.
pub(crate) fn calc_bound(domains: &[Bidomain]) -> usize {
    domains
        .iter()
        .map(|bd| bd.left_len.min(bd.right_len))
        .sum()
}

/// Picks the bidomain with the smallest heuristic key, breaking ties on
/// the smallest vertex in the left slice. In connected mode with a
/// non-empty mapping only adjacent bidomains qualify; `None` then means
/// there is nothing left to branch on.
pub(crate) fn select_bidomain(
    domains: &[Bidomain],
    left: &[usize],
    current_matching_size: usize,
    config: &McsConfig,
) -> Option<usize> {
    let mut best = None;
    let mut min_size = usize::MAX;
    let mut min_tie_breaker = usize::MAX;

    for (i, bd) in domains.iter().enumerate() {
        if config.connected && current_matching_size > 0 && !bd.is_adjacent {
            continue;
        }
        let len = match config.heuristic {
            Heuristic::MinMax => bd.left_len.max(bd.right_len),
            Heuristic::MinProduct => bd.left_len * bd.right_len,
        };
        if len < min_size {
            min_size = len;
            min_tie_breaker = find_min_value(left, bd.l, bd.left_len);
            best = Some(i);
        } else if len == min_size {
            let tie_breaker = find_min_value(left, bd.l, bd.left_len);
            if tie_breaker < min_tie_breaker {
                min_tie_breaker = tie_breaker;
                best = Some(i);
            }
        }
    }

    best
}

pub(crate) fn find_min_value(arr: &[usize], start: usize, len: usize) -> usize {
    arr[start..start + len]
        .iter()
        .copied()
        .min()
        .unwrap_or(usize::MAX)
}

/// Moves the vertices of `vv[start..start + len]` that are adjacent to
/// the partition pivot (nonzero cell in `adj_row`) to the front of the
/// slice and returns how many there are.
pub(crate) fn partition(vv: &mut [usize], start: usize, len: usize, adj_row: &[u32]) -> usize {
    let mut i = 0;
    for j in 0..len {
        if adj_row[vv[start + j]] != 0 {
            vv.swap(start + i, start + j);
            i += 1;
        }
    }
    i
}

/// Index (relative to `start`) of the smallest value above `last` in
/// `arr[start..start + len]`; `None` means every value has been visited.
pub(crate) fn index_of_next_smallest(
    arr: &[usize],
    start: usize,
    len: usize,
    last: Option<usize>,
) -> Option<usize> {
    let mut idx = None;
    let mut smallest = usize::MAX;
    for (i, &value) in arr[start..start + len].iter().enumerate() {
        if last.map_or(true, |last| value > last) && value < smallest {
            smallest = value;
            idx = Some(i);
        }
    }
    idx
}

/// Drops `v` from the left slice of `bd` by swapping it past the end.
pub(crate) fn remove_vtx_from_left_domain(left: &mut [usize], bd: &mut Bidomain, v: usize) {
    let i = left[bd.l..bd.l + bd.left_len]
        .iter()
        .position(|&x| x == v)
        .expect("vertex is in its left domain");
    left.swap(bd.l + i, bd.l + bd.left_len - 1);
    bd.left_len -= 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcs_graph::GraphBuilder;

    fn config(heuristic: Heuristic, connected: bool) -> McsConfig {
        McsConfig {
            heuristic,
            connected,
            ..McsConfig::default()
        }
    }

    #[test]
    fn initial_domains_group_by_label_ascending() {
        let g0 = GraphBuilder::new(4).labels(vec![2, 0, 2, 5]).build().unwrap();
        let g1 = GraphBuilder::new(3).labels(vec![2, 9, 0]).build().unwrap();

        let (left, right, domains) = initial_domains(&g0, &g1);

        // Shared labels are 0 and 2; label 5 and 9 have no partner.
        assert_eq!(domains.len(), 2);
        assert_eq!(left, vec![1, 0, 2]);
        assert_eq!(right, vec![2, 0]);

        assert_eq!((domains[0].left_len, domains[0].right_len), (1, 1));
        assert_eq!((domains[1].left_len, domains[1].right_len), (2, 1));
        assert!(domains.iter().all(|bd| !bd.is_adjacent));
    }

    #[test]
    fn loop_vertices_get_their_own_domain() {
        let g0 = GraphBuilder::new(2).loop_at(0).build().unwrap();
        let g1 = GraphBuilder::new(2).loop_at(1).build().unwrap();

        let (left, right, domains) = initial_domains(&g0, &g1);

        assert_eq!(domains.len(), 2);
        assert_eq!(left, vec![1, 0]);
        assert_eq!(right, vec![0, 1]);
    }

    #[test]
    fn bound_sums_smaller_sides() {
        let domains = vec![
            Bidomain { l: 0, r: 0, left_len: 3, right_len: 1, is_adjacent: false },
            Bidomain { l: 3, r: 1, left_len: 2, right_len: 5, is_adjacent: true },
        ];

        assert_eq!(calc_bound(&domains), 3);
    }

    #[test]
    fn selection_prefers_smallest_key() {
        let left = vec![4, 5, 6, 0, 1];
        let domains = vec![
            Bidomain { l: 0, r: 0, left_len: 3, right_len: 3, is_adjacent: false },
            Bidomain { l: 3, r: 3, left_len: 2, right_len: 4, is_adjacent: false },
        ];

        // min_max: max(3, 3) = 3 < max(2, 4) = 4.
        assert_eq!(select_bidomain(&domains, &left, 0, &config(Heuristic::MinMax, false)), Some(0));
        // min_product: 2 * 4 = 8 < 3 * 3 = 9.
        assert_eq!(
            select_bidomain(&domains, &left, 0, &config(Heuristic::MinProduct, false)),
            Some(1)
        );
    }

    #[test]
    fn selection_breaks_ties_on_smallest_left_vertex() {
        let left = vec![4, 5, 1, 9];
        let domains = vec![
            Bidomain { l: 0, r: 0, left_len: 2, right_len: 2, is_adjacent: false },
            Bidomain { l: 2, r: 2, left_len: 2, right_len: 2, is_adjacent: false },
        ];

        assert_eq!(
            select_bidomain(&domains, &left, 0, &config(Heuristic::MinMax, false)),
            Some(1)
        );
    }

    #[test]
    fn connected_mode_needs_an_adjacent_domain() {
        let left = vec![0, 1];
        let domains = vec![Bidomain { l: 0, r: 0, left_len: 2, right_len: 2, is_adjacent: false }];
        let config = config(Heuristic::MinMax, true);

        // Fine while the mapping is empty, unbranchable afterwards.
        assert_eq!(select_bidomain(&domains, &left, 0, &config), Some(0));
        assert_eq!(select_bidomain(&domains, &left, 1, &config), None);
    }

    #[test]
    fn partition_splits_on_adjacency() {
        let mut vv = vec![0, 1, 2, 3];
        let adj_row = vec![0, 1, 0, 1];

        let adjacent = partition(&mut vv, 0, 4, &adj_row);

        assert_eq!(adjacent, 2);
        assert_eq!(&vv[..2], &[1, 3]);
        let mut rest = vv[2..].to_vec();
        rest.sort_unstable();
        assert_eq!(rest, vec![0, 2]);
    }

    #[test]
    fn next_smallest_walks_values_in_ascending_order() {
        let arr = vec![7, 3, 9, 5];

        let mut last = None;
        let mut seen = Vec::new();
        while let Some(idx) = index_of_next_smallest(&arr, 0, 4, last) {
            seen.push(arr[idx]);
            last = Some(arr[idx]);
        }

        assert_eq!(seen, vec![3, 5, 7, 9]);
    }

    #[test]
    fn remove_vtx_swaps_to_the_back() {
        let mut left = vec![4, 2, 8];
        let mut bd = Bidomain { l: 0, r: 0, left_len: 3, right_len: 3, is_adjacent: false };

        remove_vtx_from_left_domain(&mut left, &mut bd, 2);

        assert_eq!(bd.left_len, 2);
        assert_eq!(left, vec![4, 8, 2]);
    }
}
