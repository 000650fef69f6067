//! Greedy O(ND) diff.
//!
//! Myers' algorithm: explore edit-distance frontiers `d = 0, 1, 2, …` and
//! stop at the first frontier that reaches the end of both sequences. Only
//! one row of frontier endpoints is live per step, so the full similarity
//! matrix never materializes; a snapshot per frontier is kept for
//! reconstruction. Minimal in edit count, like the matrix walk, though the
//! two may shape ties differently.

use crate::Processor;
use crate::action::Operator;
use crate::debug;
use crate::error::DiffError;
use crate::handler::DiffHandler;
use crate::token::{Token, TokenComparator};

/// Diff algorithm using greedy frontier exploration.
///
/// O((n+m)·d) time where `d` is the edit distance, O((n+m)·d) space for the
/// frontier snapshots. Much cheaper than [`MatrixProcessor`] when the
/// sequences are mostly similar. On score ties it deletes first.
///
/// [`MatrixProcessor`]: crate::lcs::MatrixProcessor
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyProcessor;

impl GreedyProcessor {
    /// New greedy processor.
    pub fn new() -> Self {
        Self
    }
}

impl Processor for GreedyProcessor {
    fn process(
        &self,
        first: &[Token],
        second: &[Token],
        cmp: TokenComparator,
        handler: &mut dyn DiffHandler,
    ) -> Result<(), DiffError> {
        let ops = shortest_edit(first, second, cmp);
        debug!(
            ops = ops.len(),
            edits = ops.iter().filter(|(op, _)| op.is_edit()).count(),
            "greedy script found"
        );
        for (operator, index) in ops {
            let token = match operator {
                Operator::Insert => &second[index],
                Operator::Match | Operator::Delete => &first[index],
            };
            handler.handle(operator, token);
        }
        Ok(())
    }
}

/// Computes a shortest edit script as `(operator, index)` pairs in script
/// order. MATCH and DELETE indices address the first sequence, INSERT
/// indices the second.
fn shortest_edit(
    first: &[Token],
    second: &[Token],
    cmp: TokenComparator,
) -> Vec<(Operator, usize)> {
    let n = first.len();
    let m = second.len();
    let max = n + m;
    if max == 0 {
        return Vec::new();
    }

    // Frontier endpoints: v[offset + k] is the furthest x reached on
    // diagonal k (where k = x - y) at the current edit distance. One
    // snapshot per distance is kept for the backward reconstruction.
    let offset = max as isize;
    let mut v = vec![0usize; 2 * max + 1];
    let mut trace: Vec<Vec<usize>> = Vec::new();
    let mut found_d: isize = -1;

    'search: for d in 0..=(max as isize) {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            let idx = (k + offset) as usize;
            // Extending the k+1 diagonal is a downward step (insert);
            // extending k-1 is a rightward step (delete). Deleting wins
            // ties, so the choice is deterministic.
            let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };
            let mut y = x.wrapping_sub(k as usize);
            while x < n && y < m && cmp.matches(&first[x], &second[y]) {
                x += 1;
                y += 1;
            }
            v[idx] = x;
            if x >= n && y >= m {
                found_d = d;
                break 'search;
            }
            k += 2;
        }
    }
    debug_assert!(found_d >= 0, "a path always exists within n + m edits");

    // Walk back from (n, m), replaying each frontier's choice in reverse.
    let mut ops: Vec<(Operator, usize)> = Vec::new();
    let mut x = n;
    let mut y = m;
    for d in (1..=found_d).rev() {
        let v = &trace[d as usize];
        let k = x as isize - y as isize;
        let prev_k = if k == -d || (k != d && v[(k - 1 + offset) as usize] < v[(k + 1 + offset) as usize])
        {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[(prev_k + offset) as usize];
        let prev_y = prev_x.wrapping_sub(prev_k as usize);
        while x > prev_x && y > prev_y {
            ops.push((Operator::Match, x - 1));
            x -= 1;
            y -= 1;
        }
        if x == prev_x {
            ops.push((Operator::Insert, prev_y));
        } else {
            ops.push((Operator::Delete, prev_x));
        }
        x = prev_x;
        y = prev_y;
    }
    // The d = 0 frontier is a pure diagonal down to the origin.
    while x > 0 && y > 0 {
        ops.push((Operator::Match, x - 1));
        x -= 1;
        y -= 1;
    }
    ops.reverse();
    ops
}
