//! Whole-tree consistency checks.
//!
//! Each predicate walks the full tree and is meant for tests and debug
//! assertions, not hot paths.

use crate::types::LlrbNode;
use crate::util::{is_red, rank, select, size};

/// Symmetric order: every key lies strictly between its ancestors' bounds.
///
/// Since the order is strict this also rules out shared or cyclic links.
pub fn is_bst<K, V, C>(arena: &[LlrbNode<K, V>], root: Option<u32>, comparator: &C) -> bool
where
    C: Fn(&K, &K) -> i32,
{
    fn walk<K, V, C>(
        arena: &[LlrbNode<K, V>],
        node: Option<u32>,
        min: Option<&K>,
        max: Option<&K>,
        comparator: &C,
    ) -> bool
    where
        C: Fn(&K, &K) -> i32,
    {
        let Some(i) = node else {
            return true;
        };
        let n = &arena[i as usize];
        if min.is_some_and(|min| comparator(&n.k, min) <= 0) {
            return false;
        }
        if max.is_some_and(|max| comparator(&n.k, max) >= 0) {
            return false;
        }
        walk(arena, n.l, min, Some(&n.k), comparator) && walk(arena, n.r, Some(&n.k), max, comparator)
    }

    walk(arena, root, None, None, comparator)
}

/// Every stored size equals `1 + size(l) + size(r)`.
pub fn is_size_consistent<K, V>(arena: &[LlrbNode<K, V>], root: Option<u32>) -> bool {
    let Some(i) = root else {
        return true;
    };
    let n = &arena[i as usize];
    n.n == size(arena, n.l) + size(arena, n.r) + 1
        && is_size_consistent(arena, n.l)
        && is_size_consistent(arena, n.r)
}

/// `rank` and `select` are inverses over the whole tree.
pub fn is_rank_consistent<K, V, C>(
    arena: &[LlrbNode<K, V>],
    root: Option<u32>,
    comparator: &C,
) -> bool
where
    C: Fn(&K, &K) -> i32,
{
    for r in 0..size(arena, root) {
        match select(arena, root, r) {
            Some(i) if rank(arena, root, &arena[i as usize].k, comparator) == r => {}
            _ => return false,
        }
    }

    let mut stack = Vec::new();
    stack.extend(root);
    while let Some(i) = stack.pop() {
        let n = &arena[i as usize];
        let r = rank(arena, root, &n.k, comparator);
        match select(arena, root, r) {
            Some(j) if comparator(&arena[j as usize].k, &n.k) == 0 => {}
            _ => return false,
        }
        stack.extend(n.l);
        stack.extend(n.r);
    }
    true
}

/// No red right links and no two red links in a row.
pub fn is_two_three<K, V>(arena: &[LlrbNode<K, V>], root: Option<u32>) -> bool {
    fn walk<K, V>(arena: &[LlrbNode<K, V>], node: Option<u32>, is_root: bool) -> bool {
        let Some(i) = node else {
            return true;
        };
        let n = &arena[i as usize];
        if is_red(arena, n.r) {
            return false;
        }
        if !is_root && n.is_red() && is_red(arena, n.l) {
            return false;
        }
        walk(arena, n.l, false) && walk(arena, n.r, false)
    }

    walk(arena, root, true)
}

/// Every path from the root to an empty link has the same number of black
/// links.
pub fn is_balanced<K, V>(arena: &[LlrbNode<K, V>], root: Option<u32>) -> bool {
    fn walk<K, V>(arena: &[LlrbNode<K, V>], node: Option<u32>, mut black: usize) -> bool {
        let Some(i) = node else {
            return black == 0;
        };
        let n = &arena[i as usize];
        if n.is_black() {
            if black == 0 {
                return false;
            }
            black -= 1;
        }
        walk(arena, n.l, black) && walk(arena, n.r, black)
    }

    let mut black = 0;
    let mut curr = root;
    while let Some(i) = curr {
        if arena[i as usize].is_black() {
            black += 1;
        }
        curr = arena[i as usize].l;
    }
    walk(arena, root, black)
}

/// Run every check, reporting the first violation.
pub fn assert_llrb_tree<K, V, C>(
    arena: &[LlrbNode<K, V>],
    root: Option<u32>,
    comparator: &C,
) -> Result<(), String>
where
    C: Fn(&K, &K) -> i32,
{
    if is_red(arena, root) {
        return Err("Root is not black".to_string());
    }
    if !is_bst(arena, root, comparator) {
        return Err("Not in symmetric order".to_string());
    }
    if !is_size_consistent(arena, root) {
        return Err("Subtree counts not consistent".to_string());
    }
    if !is_rank_consistent(arena, root, comparator) {
        return Err("Ranks not consistent".to_string());
    }
    if !is_two_three(arena, root) {
        return Err("Not a 2-3 tree".to_string());
    }
    if !is_balanced(arena, root) {
        return Err("Black height mismatch".to_string());
    }
    if size(arena, root) != arena.len() {
        return Err(format!(
            "Arena holds {} nodes but the tree reaches {}",
            arena.len(),
            size(arena, root)
        ));
    }
    Ok(())
}
