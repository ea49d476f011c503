use mcs_graph::Graph;

use crate::bidomain::{partition, Bidomain};

/// Derives the bidomain list after committing to the pair `(v, w)`.
///
/// Each bidomain is split in place: left vertices adjacent to `v` and
/// right vertices adjacent to `w` move to the front of their slices. The
/// non-adjacent tails form one new bidomain when both are non-empty. The
/// adjacent heads form one new bidomain in simple mode, or one per arc
/// type shared by both sides in multiway mode (directed and/or
/// edge-labelled graphs), where the arc type is the raw adjacency cell.
///
/// Only the order of vertices inside the parent slices changes, never
/// their membership, so the caller's buffers stay valid for its
/// remaining branches.
pub(crate) fn filter_domains(
    domains: &[Bidomain],
    left: &mut [usize],
    right: &mut [usize],
    g0: &Graph,
    g1: &Graph,
    v: usize,
    w: usize,
    multiway: bool,
) -> Vec<Bidomain> {
    let mut new_domains = Vec::with_capacity(domains.len());
    let adj_row_v = g0.adj_row(v);
    let adj_row_w = g1.adj_row(w);

    for old_bd in domains {
        let l = old_bd.l;
        let r = old_bd.r;
        let left_len = partition(left, l, old_bd.left_len, adj_row_v);
        let right_len = partition(right, r, old_bd.right_len, adj_row_w);
        let left_len_noedge = old_bd.left_len - left_len;
        let right_len_noedge = old_bd.right_len - right_len;

        if left_len_noedge > 0 && right_len_noedge > 0 {
            new_domains.push(Bidomain {
                l: l + left_len,
                r: r + right_len,
                left_len: left_len_noedge,
                right_len: right_len_noedge,
                is_adjacent: old_bd.is_adjacent,
            });
        }

        if left_len == 0 || right_len == 0 {
            continue;
        }

        if multiway {
            left[l..l + left_len].sort_unstable_by_key(|&a| adj_row_v[a]);
            right[r..r + right_len].sort_unstable_by_key(|&a| adj_row_w[a]);

            let l_top = l + left_len;
            let r_top = r + right_len;
            let mut l_cur = l;
            let mut r_cur = r;
            while l_cur < l_top && r_cur < r_top {
                let left_label = adj_row_v[left[l_cur]];
                let right_label = adj_row_w[right[r_cur]];
                if left_label < right_label {
                    l_cur += 1;
                } else if left_label > right_label {
                    r_cur += 1;
                } else {
                    let l_min = l_cur;
                    let r_min = r_cur;
                    l_cur += 1;
                    while l_cur < l_top && adj_row_v[left[l_cur]] == left_label {
                        l_cur += 1;
                    }
                    r_cur += 1;
                    while r_cur < r_top && adj_row_w[right[r_cur]] == left_label {
                        r_cur += 1;
                    }
                    new_domains.push(Bidomain {
                        l: l_min,
                        r: r_min,
                        left_len: l_cur - l_min,
                        right_len: r_cur - r_min,
                        is_adjacent: true,
                    });
                }
            }
        } else {
            new_domains.push(Bidomain {
                l,
                r,
                left_len,
                right_len,
                is_adjacent: true,
            });
        }
    }

    new_domains
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bidomain::initial_domains;
    use mcs_graph::GraphBuilder;

    #[test]
    fn simple_split_produces_edge_and_non_edge_halves() {
        // A path 0-1-2 in both graphs; match (1, 1).
        let g0 = GraphBuilder::new(3).edge(0, 1).edge(1, 2).build().unwrap();
        let g1 = g0.clone();

        let (mut left, mut right, domains) = initial_domains(&g0, &g1);
        let new_domains = filter_domains(&domains, &mut left, &mut right, &g0, &g1, 1, 1, false);

        // Neighbours of 1 ({0, 2} on both sides) and the lone vertex 1
        // itself; the latter tail pairs 1 with 1.
        assert_eq!(new_domains.len(), 2);

        let adjacent: Vec<_> = new_domains.iter().filter(|bd| bd.is_adjacent).collect();
        assert_eq!(adjacent.len(), 1);
        assert_eq!((adjacent[0].left_len, adjacent[0].right_len), (2, 2));

        let rest: Vec<_> = new_domains.iter().filter(|bd| !bd.is_adjacent).collect();
        assert_eq!((rest[0].left_len, rest[0].right_len), (1, 1));
    }

    #[test]
    fn empty_sides_drop_their_half() {
        // 0-1 in g0; g1 has an isolated pair. Matching (0, 0) leaves no
        // adjacent right vertices, so no adjacent bidomain survives.
        let g0 = GraphBuilder::new(2).edge(0, 1).build().unwrap();
        let g1 = GraphBuilder::new(2).build().unwrap();

        let (mut left, mut right, domains) = initial_domains(&g0, &g1);
        let new_domains = filter_domains(&domains, &mut left, &mut right, &g0, &g1, 0, 0, false);

        assert_eq!(new_domains.len(), 1);
        assert!(!new_domains[0].is_adjacent);
        // Tails: {1}'s partner 0 stays left, both of g1's vertices stay right.
        assert_eq!((new_domains[0].left_len, new_domains[0].right_len), (1, 2));
    }

    #[test]
    fn multiway_groups_by_edge_label() {
        let g0 = GraphBuilder::new(3)
            .edge_with_label(0, 1, 3)
            .edge_with_label(0, 2, 5)
            .build()
            .unwrap();
        let g1 = GraphBuilder::new(4)
            .edge_with_label(0, 1, 3)
            .edge_with_label(0, 2, 5)
            .edge_with_label(0, 3, 7)
            .build()
            .unwrap();

        let (mut left, mut right, domains) = initial_domains(&g0, &g1);
        let new_domains = filter_domains(&domains, &mut left, &mut right, &g0, &g1, 0, 0, true);

        // One bidomain per shared arc type (3 and 5); label 7 only
        // exists on the right and pairs with nothing.
        let adjacent: Vec<_> = new_domains.iter().filter(|bd| bd.is_adjacent).collect();
        assert_eq!(adjacent.len(), 2);
        for bd in adjacent {
            assert_eq!((bd.left_len, bd.right_len), (1, 1));
            assert_eq!(
                g0.adj_row(0)[left[bd.l]],
                g1.adj_row(0)[right[bd.r]]
            );
        }
    }

    #[test]
    fn multiway_separates_arc_directions() {
        // g0: 0 -> 1, g1: 1 -> 0. Matching (0, 0) must not pair vertex 1
        // with vertex 1, because the arcs point in opposite directions.
        let g0 = GraphBuilder::new(2).directed(true).edge(0, 1).build().unwrap();
        let g1 = GraphBuilder::new(2).directed(true).edge(1, 0).build().unwrap();

        let (mut left, mut right, domains) = initial_domains(&g0, &g1);
        let new_domains = filter_domains(&domains, &mut left, &mut right, &g0, &g1, 0, 0, true);

        assert!(new_domains.iter().all(|bd| !bd.is_adjacent));
    }

    #[test]
    fn membership_is_preserved_within_slices() {
        let g0 = GraphBuilder::new(4).edge(0, 2).edge(0, 3).build().unwrap();
        let g1 = g0.clone();

        let (mut left, mut right, domains) = initial_domains(&g0, &g1);
        let before: std::collections::BTreeSet<_> = left.iter().copied().collect();

        filter_domains(&domains, &mut left, &mut right, &g0, &g1, 0, 0, false);

        let after: std::collections::BTreeSet<_> = left.iter().copied().collect();
        assert_eq!(before, after);
    }
}
