use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use mcs_graph::Graph;

use crate::bidomain::{
    calc_bound, find_min_value, index_of_next_smallest, remove_vtx_from_left_domain,
    select_bidomain, Bidomain,
};
use crate::filter::filter_domains;
use crate::incumbent::AtomicIncumbent;
use crate::pool::{HelperPool, Position, TaskFn, SPLIT_LEVELS};
use crate::{McsConfig, VtxPair};

/// Read-only state shared by every worker of one search pass.
pub(crate) struct SearchCtx {
    pub(crate) g0: Arc<Graph>,
    pub(crate) g1: Arc<Graph>,
    pub(crate) config: McsConfig,
    /// Target size of this pass; 1 unless running big-first.
    pub(crate) goal: usize,
    pub(crate) incumbent: Arc<AtomicIncumbent>,
    pub(crate) abort: Arc<AtomicBool>,
}

impl SearchCtx {
    fn multiway(&self) -> bool {
        self.config.directed || self.config.edge_labelled
    }

    fn aborted(&self) -> bool {
        self.abort.load(Ordering::SeqCst)
    }
}

/// What one worker accumulates privately: its node count and the best
/// mapping it has personally seen.
#[derive(Debug, Default)]
pub(crate) struct WorkerState {
    pub(crate) nodes: u64,
    pub(crate) incumbent: Vec<VtxPair>,
}

impl WorkerState {
    fn record(&mut self, ctx: &SearchCtx, current: &[VtxPair]) {
        if self.incumbent.len() < current.len() {
            self.incumbent.clear();
            self.incumbent.extend_from_slice(current);
            ctx.incumbent.update(current.len());
        }
    }
}

/// Sequential search below the work-sharing levels.
pub(crate) fn solve_nopar(
    ctx: &Arc<SearchCtx>,
    current: &mut Vec<VtxPair>,
    domains: &mut Vec<Bidomain>,
    left: &mut Vec<usize>,
    right: &mut Vec<usize>,
    worker: &mut WorkerState,
) {
    if ctx.aborted() {
        return;
    }
    worker.nodes += 1;
    worker.record(ctx, current);

    let bound = current.len() + calc_bound(domains);
    if bound <= ctx.incumbent.get() || bound < ctx.goal {
        return;
    }
    if ctx.config.big_first && ctx.incumbent.get() == ctx.goal {
        return;
    }

    let Some(bd_idx) = select_bidomain(domains, left, current.len(), &ctx.config) else {
        return;
    };

    domains[bd_idx].right_len -= 1;
    let branch_count = domains[bd_idx].right_len + 2;

    let v = find_min_value(left, domains[bd_idx].l, domains[bd_idx].left_len);
    remove_vtx_from_left_domain(left, &mut domains[bd_idx], v);
    let mut last_w = None;

    for i in 0..branch_count {
        if i != branch_count - 1 {
            let w = next_candidate(right, &domains[bd_idx], last_w);
            last_w = Some(w);

            let mut new_domains =
                filter_domains(domains, left, right, &ctx.g0, &ctx.g1, v, w, ctx.multiway());
            current.push(VtxPair { v, w });
            solve_nopar(ctx, current, &mut new_domains, left, right, worker);
            current.pop();
        } else {
            // The last branch leaves v unmatched: restore the right
            // candidates and drop v's bidomain if it became empty.
            domains[bd_idx].right_len += 1;
            if domains[bd_idx].left_len == 0 {
                domains.swap_remove(bd_idx);
            }
            solve_nopar(ctx, current, domains, left, right, worker);
        }
    }
}

/// Work-sharing search for the near-root levels.
///
/// The frame claims branch indices from a counter it shares with any
/// helpers that pick up its advertised task; every participant walks the
/// same candidate sequence and executes exactly the indices it claimed.
pub(crate) fn solve(
    ctx: &Arc<SearchCtx>,
    pool: &Arc<HelperPool>,
    depth: usize,
    current: &mut Vec<VtxPair>,
    domains: &mut Vec<Bidomain>,
    left: &mut Vec<usize>,
    right: &mut Vec<usize>,
    position: Position,
    worker: &mut WorkerState,
) {
    if ctx.aborted() {
        return;
    }
    worker.nodes += 1;
    worker.record(ctx, current);

    let bound = current.len() + calc_bound(domains);
    if bound <= ctx.incumbent.get() || bound < ctx.goal {
        return;
    }
    if ctx.config.big_first && ctx.incumbent.get() == ctx.goal {
        return;
    }

    let Some(bd_idx) = select_bidomain(domains, left, current.len(), &ctx.config) else {
        return;
    };

    domains[bd_idx].right_len -= 1;
    let branch_count = domains[bd_idx].right_len + 2;
    let shared_branch = Arc::new(AtomicUsize::new(0));

    if depth <= SPLIT_LEVELS {
        // Snapshot the frame before the branch loop mutates it; helpers
        // replay from the snapshot.
        let helper = helper_task(ctx, pool, &shared_branch, depth, position, branch_count,
            current, domains, left, right);

        // Claim the first branch before advertising.
        let my_branch = shared_branch.fetch_add(1, Ordering::SeqCst);
        pool.get_help_with(
            position,
            |worker| {
                run_branches(
                    ctx, pool, depth, current, domains, left, right, position, worker, bd_idx,
                    branch_count, &shared_branch, my_branch,
                );
            },
            helper,
            worker,
        );
    } else {
        let my_branch = shared_branch.fetch_add(1, Ordering::SeqCst);
        run_branches(
            ctx, pool, depth, current, domains, left, right, position, worker, bd_idx,
            branch_count, &shared_branch, my_branch,
        );
    }
}

/// The branch loop shared by donors and helpers. Candidate `w` values
/// are visited in ascending order; the final branch rejects `v`. Every
/// participant iterates the whole sequence (the in-place swaps are what
/// keep the buffers consistent) but only recurses into claimed indices.
#[allow(clippy::too_many_arguments)]
fn run_branches(
    ctx: &Arc<SearchCtx>,
    pool: &Arc<HelperPool>,
    depth: usize,
    current: &mut Vec<VtxPair>,
    domains: &mut Vec<Bidomain>,
    left: &mut Vec<usize>,
    right: &mut Vec<usize>,
    position: Position,
    worker: &mut WorkerState,
    bd_idx: usize,
    branch_count: usize,
    shared_branch: &AtomicUsize,
    mut my_branch: usize,
) {
    let v = find_min_value(left, domains[bd_idx].l, domains[bd_idx].left_len);
    remove_vtx_from_left_domain(left, &mut domains[bd_idx], v);
    let mut last_w = None;

    for i in 0..branch_count {
        if i != branch_count - 1 {
            let w = next_candidate(right, &domains[bd_idx], last_w);
            last_w = Some(w);

            if i == my_branch {
                my_branch = shared_branch.fetch_add(1, Ordering::SeqCst);

                let mut new_domains =
                    filter_domains(domains, left, right, &ctx.g0, &ctx.g1, v, w, ctx.multiway());
                current.push(VtxPair { v, w });
                if depth > SPLIT_LEVELS {
                    solve_nopar(ctx, current, &mut new_domains, left, right, worker);
                } else {
                    let next = position.child(depth, (i + 1) as u32);
                    solve(
                        ctx, pool, depth + 1, current, &mut new_domains, left, right, next, worker,
                    );
                }
                current.pop();
            }
        } else {
            domains[bd_idx].right_len += 1;
            if domains[bd_idx].left_len == 0 {
                domains.swap_remove(bd_idx);
            }

            if i == my_branch {
                my_branch = shared_branch.fetch_add(1, Ordering::SeqCst);

                if depth > SPLIT_LEVELS {
                    solve_nopar(ctx, current, domains, left, right, worker);
                } else {
                    let next = position.child(depth, (i + 1) as u32);
                    solve(ctx, pool, depth + 1, current, domains, left, right, next, worker);
                }
            }
        }
    }
}

/// Picks the next unexplored right candidate in ascending order and
/// parks it just past the live window, so refinement never sees it
/// again at this level.
fn next_candidate(right: &mut [usize], bd: &Bidomain, last_w: Option<usize>) -> usize {
    let idx = index_of_next_smallest(right, bd.r, bd.right_len + 1, last_w)
        .expect("an unexplored right candidate remains");
    let w = right[bd.r + idx];
    right[bd.r + idx] = right[bd.r + bd.right_len];
    right[bd.r + bd.right_len] = w;
    w
}

/// Builds the task body a helper runs when it joins this frame: a
/// self-contained replay over snapshots of the frame's buffers.
#[allow(clippy::too_many_arguments)]
fn helper_task(
    ctx: &Arc<SearchCtx>,
    pool: &Arc<HelperPool>,
    shared_branch: &Arc<AtomicUsize>,
    depth: usize,
    position: Position,
    branch_count: usize,
    current: &[VtxPair],
    domains: &[Bidomain],
    left: &[usize],
    right: &[usize],
) -> TaskFn {
    let ctx = Arc::clone(ctx);
    let pool = Arc::clone(pool);
    let shared_branch = Arc::clone(shared_branch);
    let current = current.to_vec();
    let domains = domains.to_vec();
    let left = left.to_vec();
    let right = right.to_vec();

    Arc::new(move |worker: &mut WorkerState| {
        let my_branch = shared_branch.fetch_add(1, Ordering::SeqCst);
        if my_branch >= branch_count {
            // Everything is claimed; don't bother rebuilding the frame.
            return;
        }

        let mut current = current.clone();
        let mut domains = domains.clone();
        let mut left = left.clone();
        let mut right = right.clone();

        let Some(bd_idx) = select_bidomain(&domains, &left, current.len(), &ctx.config) else {
            return;
        };

        run_branches(
            &ctx, &pool, depth, &mut current, &mut domains, &mut left, &mut right, position,
            worker, bd_idx, branch_count, &shared_branch, my_branch,
        );
    })
}
