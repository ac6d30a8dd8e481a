//! Ordered tree edit distance (Zhang & Shasha, 1989).
//!
//! Insert, delete and relabel each cost 1. Both trees are flattened into
//! post-order arrays together with each node's leftmost leaf descendant, and
//! forest distances are only computed from the keyroots, which bounds the
//! work to `O(|T1|·|T2|·min(depth, leaves)²)` instead of enumerating every
//! pair of sub-forests.

use crate::tree::OrderedTree;

/// Post-order flattening of a tree.
struct PostOrder<'a> {
    labels: Vec<&'a str>,
    /// `leftmost[i]` is the post-order index of the leftmost leaf under node `i`.
    leftmost: Vec<usize>,
    /// Nodes with no ancestor sharing their leftmost leaf, ascending.
    keyroots: Vec<usize>,
}

impl<'a> PostOrder<'a> {
    fn new(tree: &'a OrderedTree) -> Self {
        let mut labels = Vec::with_capacity(tree.size());
        let mut leftmost = Vec::with_capacity(tree.size());
        Self::visit(tree, &mut labels, &mut leftmost);

        // Walking from the root downwards, the first node seen for a given
        // leftmost leaf is the highest one, i.e. the keyroot.
        let mut seen = vec![false; labels.len()];
        let mut keyroots = Vec::new();
        for node in (0..labels.len()).rev() {
            let leaf = leftmost[node];
            if !seen[leaf] {
                seen[leaf] = true;
                keyroots.push(node);
            }
        }
        keyroots.reverse();

        Self {
            labels,
            leftmost,
            keyroots,
        }
    }

    /// Returns the post-order index of `node`.
    fn visit(node: &'a OrderedTree, labels: &mut Vec<&'a str>, leftmost: &mut Vec<usize>) -> usize {
        let mut first_leaf = None;
        for child in node.children() {
            let child_idx = Self::visit(child, labels, leftmost);
            if first_leaf.is_none() {
                first_leaf = Some(leftmost[child_idx]);
            }
        }
        let idx = labels.len();
        labels.push(node.label());
        leftmost.push(first_leaf.unwrap_or(idx));
        idx
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}

/// Minimum number of unit-cost insert, delete and relabel operations that
/// turn `a` into `b`.
pub fn raw_tree_edit_distance(a: &OrderedTree, b: &OrderedTree) -> usize {
    let a = PostOrder::new(a);
    let b = PostOrder::new(b);

    let mut tree_dist = vec![vec![0usize; b.len()]; a.len()];
    for &i in &a.keyroots {
        for &j in &b.keyroots {
            forest_distance(&a, &b, i, j, &mut tree_dist);
        }
    }
    tree_dist[a.len() - 1][b.len() - 1]
}

/// Fill `tree_dist` for every pair of subtrees rooted on the leftmost paths
/// of keyroots `i` and `j`.
fn forest_distance(
    a: &PostOrder<'_>,
    b: &PostOrder<'_>,
    i: usize,
    j: usize,
    tree_dist: &mut [Vec<usize>],
) {
    let li = a.leftmost[i];
    let lj = b.leftmost[j];
    let rows = i - li + 2;
    let cols = j - lj + 2;

    // forest[x][y]: distance between a[li..li+x] and b[lj..lj+y]
    let mut forest = vec![vec![0usize; cols]; rows];
    for x in 1..rows {
        forest[x][0] = forest[x - 1][0] + 1;
    }
    for y in 1..cols {
        forest[0][y] = forest[0][y - 1] + 1;
    }

    for x in 1..rows {
        let ia = li + x - 1;
        for y in 1..cols {
            let jb = lj + y - 1;
            let delete = forest[x - 1][y] + 1;
            let insert = forest[x][y - 1] + 1;

            if a.leftmost[ia] == li && b.leftmost[jb] == lj {
                // Both prefixes are whole trees.
                let relabel = usize::from(a.labels[ia] != b.labels[jb]);
                let cost = delete.min(insert).min(forest[x - 1][y - 1] + relabel);
                forest[x][y] = cost;
                tree_dist[ia][jb] = cost;
            } else {
                let p = a.leftmost[ia] - li;
                let q = b.leftmost[jb] - lj;
                forest[x][y] = delete.min(insert).min(forest[p][q] + tree_dist[ia][jb]);
            }
        }
    }
}

/// Edit distance divided by the combined node count of both trees.
///
/// The result lies in `[0, 1]`: turning one tree into another never takes more
/// than deleting every node of `a` and inserting every node of `b`.
pub fn tree_edit_distance(a: &OrderedTree, b: &OrderedTree) -> f64 {
    raw_tree_edit_distance(a, b) as f64 / (a.size() + b.size()) as f64
}
