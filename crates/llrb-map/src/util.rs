//! Arena-level LLRB primitives.
//!
//! Functions take the node arena and a subtree root index and return the
//! subtree's new root, so callers re-link children on the way back up the
//! recursion. Empty links are black and have size 0.

use crate::types::LlrbNode;

/// Check if a node is red (non-black).
pub fn is_red<K, V>(arena: &[LlrbNode<K, V>], node: Option<u32>) -> bool {
    node.map(|i| !arena[i as usize].b).unwrap_or(false)
}

/// Number of nodes in the subtree.
pub fn size<K, V>(arena: &[LlrbNode<K, V>], node: Option<u32>) -> usize {
    node.map(|i| arena[i as usize].n).unwrap_or(0)
}

#[inline]
fn left<K, V>(arena: &[LlrbNode<K, V>], node: u32) -> Option<u32> {
    arena[node as usize].l
}

#[inline]
fn right<K, V>(arena: &[LlrbNode<K, V>], node: u32) -> Option<u32> {
    arena[node as usize].r
}

fn update_size<K, V>(arena: &mut [LlrbNode<K, V>], node: u32) {
    let n = size(arena, left(arena, node)) + size(arena, right(arena, node)) + 1;
    arena[node as usize].n = n;
}

/// Flip colors of node and its children.
pub fn color_flip<K, V>(arena: &mut [LlrbNode<K, V>], node: u32) {
    let (l, r) = (left(arena, node), right(arena, node));
    debug_assert!(l.is_some() && r.is_some(), "color_flip requires two children");
    arena[node as usize].b = !arena[node as usize].b;
    if let Some(l) = l {
        arena[l as usize].b = !arena[l as usize].b;
    }
    if let Some(r) = r {
        arena[r as usize].b = !arena[r as usize].b;
    }
}

/// Rotate left: the right child takes `node`'s place and color, `node`
/// becomes its red left child.
pub fn rotate_left<K, V>(arena: &mut [LlrbNode<K, V>], node: u32) -> u32 {
    let x = right(arena, node).expect("rotate_left requires right child");
    arena[node as usize].r = left(arena, x);
    arena[x as usize].l = Some(node);
    arena[x as usize].b = arena[node as usize].b;
    arena[node as usize].b = false;
    arena[x as usize].n = arena[node as usize].n;
    update_size(arena, node);
    x
}

/// Rotate right, mirror of [`rotate_left`].
pub fn rotate_right<K, V>(arena: &mut [LlrbNode<K, V>], node: u32) -> u32 {
    let x = left(arena, node).expect("rotate_right requires left child");
    arena[node as usize].l = right(arena, x);
    arena[x as usize].r = Some(node);
    arena[x as usize].b = arena[node as usize].b;
    arena[node as usize].b = false;
    arena[x as usize].n = arena[node as usize].n;
    update_size(arena, node);
    x
}

/// Move red link to the left.
///
/// Assumes `node` is red and both `node.l` and `node.l.l` are black; makes
/// `node.l` or one of its children red.
pub fn move_red_left<K, V>(arena: &mut [LlrbNode<K, V>], mut node: u32) -> u32 {
    color_flip(arena, node);
    if let Some(r) = right(arena, node) {
        if is_red(arena, left(arena, r)) {
            let r = rotate_right(arena, r);
            arena[node as usize].r = Some(r);
            node = rotate_left(arena, node);
            color_flip(arena, node);
        }
    }
    node
}

/// Move red link to the right.
///
/// Assumes `node` is red and both `node.r` and `node.r.l` are black; makes
/// `node.r` or one of its children red.
pub fn move_red_right<K, V>(arena: &mut [LlrbNode<K, V>], mut node: u32) -> u32 {
    color_flip(arena, node);
    if let Some(l) = left(arena, node) {
        if is_red(arena, left(arena, l)) {
            node = rotate_right(arena, node);
            color_flip(arena, node);
        }
    }
    node
}

/// Restore the left-leaning shape of `node` and recompute its size.
pub fn balance<K, V>(arena: &mut [LlrbNode<K, V>], mut node: u32) -> u32 {
    if is_red(arena, right(arena, node)) && !is_red(arena, left(arena, node)) {
        node = rotate_left(arena, node);
    }
    if is_red(arena, left(arena, node))
        && is_red(arena, left(arena, node).and_then(|l| left(arena, l)))
    {
        node = rotate_right(arena, node);
    }
    if is_red(arena, left(arena, node)) && is_red(arena, right(arena, node)) {
        color_flip(arena, node);
    }
    update_size(arena, node);
    node
}

/// Insert or replace `key` in the subtree.
///
/// Returns the new subtree root and the replaced value, if the key was
/// already present. New nodes are pushed to the end of the arena as red
/// leaves; the caller blackens the tree root.
pub fn put<K, V, C>(
    arena: &mut Vec<LlrbNode<K, V>>,
    node: Option<u32>,
    key: K,
    value: V,
    comparator: &C,
) -> (u32, Option<V>)
where
    C: Fn(&K, &K) -> i32,
{
    let Some(node) = node else {
        arena.push(LlrbNode::new(key, value));
        return ((arena.len() - 1) as u32, None);
    };

    let cmp = comparator(&key, &arena[node as usize].k);
    let replaced = if cmp < 0 {
        let l = left(arena, node);
        let (l, replaced) = put(arena, l, key, value, comparator);
        arena[node as usize].l = Some(l);
        replaced
    } else if cmp > 0 {
        let r = right(arena, node);
        let (r, replaced) = put(arena, r, key, value, comparator);
        arena[node as usize].r = Some(r);
        replaced
    } else {
        Some(std::mem::replace(&mut arena[node as usize].v, value))
    };

    (balance(arena, node), replaced)
}

/// Find the node holding `key`.
pub fn find<K, V, C>(
    arena: &[LlrbNode<K, V>],
    root: Option<u32>,
    key: &K,
    comparator: &C,
) -> Option<u32>
where
    C: Fn(&K, &K) -> i32,
{
    let mut curr = root;
    while let Some(i) = curr {
        let cmp = comparator(key, &arena[i as usize].k);
        if cmp == 0 {
            return Some(i);
        }
        curr = if cmp < 0 { left(arena, i) } else { right(arena, i) };
    }
    None
}

/// Find the node whose child link points at `node`.
///
/// `node` must be reachable from `root`; `None` means it is the root.
pub fn parent_of<K, V, C>(
    arena: &[LlrbNode<K, V>],
    root: Option<u32>,
    node: u32,
    comparator: &C,
) -> Option<u32>
where
    C: Fn(&K, &K) -> i32,
{
    let key = &arena[node as usize].k;
    let mut parent = None;
    let mut curr = root;
    while let Some(i) = curr {
        if i == node {
            return parent;
        }
        parent = Some(i);
        curr = if comparator(key, &arena[i as usize].k) < 0 {
            left(arena, i)
        } else {
            right(arena, i)
        };
    }
    None
}

/// Find the minimum node in the subtree.
pub fn min<K, V>(arena: &[LlrbNode<K, V>], mut node: u32) -> u32 {
    while let Some(l) = left(arena, node) {
        node = l;
    }
    node
}

/// Find the maximum node in the subtree.
pub fn max<K, V>(arena: &[LlrbNode<K, V>], mut node: u32) -> u32 {
    while let Some(r) = right(arena, node) {
        node = r;
    }
    node
}

/// Delete the minimum node from the subtree.
///
/// Returns the new subtree root and the index of the unlinked node. The
/// unlinked node stays in the arena; reclaiming its slot is up to the caller.
pub fn delete_min<K, V>(arena: &mut [LlrbNode<K, V>], node: u32) -> (Option<u32>, u32) {
    let Some(l) = left(arena, node) else {
        return (None, node);
    };

    let mut node = node;
    if !is_red(arena, Some(l)) && !is_red(arena, left(arena, l)) {
        node = move_red_left(arena, node);
    }

    let l = left(arena, node).expect("left exists after move_red_left");
    let (l, removed) = delete_min(arena, l);
    arena[node as usize].l = l;

    (Some(balance(arena, node)), removed)
}

/// Delete the maximum node from the subtree.
///
/// Same contract as [`delete_min`].
pub fn delete_max<K, V>(arena: &mut [LlrbNode<K, V>], node: u32) -> (Option<u32>, u32) {
    let mut node = node;
    if is_red(arena, left(arena, node)) {
        node = rotate_right(arena, node);
    }

    let Some(r) = right(arena, node) else {
        return (None, node);
    };

    if !is_red(arena, Some(r)) && !is_red(arena, left(arena, r)) {
        node = move_red_right(arena, node);
    }

    let r = right(arena, node).expect("right exists after move_red_right");
    let (r, removed) = delete_max(arena, r);
    arena[node as usize].r = r;

    (Some(balance(arena, node)), removed)
}

fn swap_key_value<K, V>(arena: &mut [LlrbNode<K, V>], a: u32, b: u32) {
    let ai = a as usize;
    let bi = b as usize;
    if ai == bi {
        return;
    }

    let (lo, hi) = if ai < bi { (ai, bi) } else { (bi, ai) };
    let (head, tail) = arena.split_at_mut(hi);
    let an = &mut head[lo];
    let bn = &mut tail[0];
    std::mem::swap(&mut an.k, &mut bn.k);
    std::mem::swap(&mut an.v, &mut bn.v);
}

/// Delete the node holding `key` from the subtree.
///
/// `key` must be present. Returns the new subtree root and the index of the
/// unlinked node, which holds the deleted key and value. When the matched
/// node has a right subtree, its in-order successor's key and value are
/// moved into it and the successor's node is the one unlinked.
pub fn delete_node<K, V, C>(
    arena: &mut [LlrbNode<K, V>],
    node: u32,
    key: &K,
    comparator: &C,
) -> (Option<u32>, u32)
where
    C: Fn(&K, &K) -> i32,
{
    let mut node = node;
    let removed;

    if comparator(key, &arena[node as usize].k) < 0 {
        let l = left(arena, node).expect("key present in left subtree");
        if !is_red(arena, Some(l)) && !is_red(arena, left(arena, l)) {
            node = move_red_left(arena, node);
        }

        let l = left(arena, node).expect("left exists after move_red_left");
        let (l, unlinked) = delete_node(arena, l, key, comparator);
        arena[node as usize].l = l;
        removed = unlinked;
    } else {
        if is_red(arena, left(arena, node)) {
            node = rotate_right(arena, node);
        }

        if comparator(key, &arena[node as usize].k) == 0 && right(arena, node).is_none() {
            return (None, node);
        }

        let r = right(arena, node).expect("key present in right subtree");
        if !is_red(arena, Some(r)) && !is_red(arena, left(arena, r)) {
            node = move_red_right(arena, node);
        }

        let r = right(arena, node).expect("right exists after move_red_right");
        if comparator(key, &arena[node as usize].k) == 0 {
            let successor = min(arena, r);
            swap_key_value(arena, node, successor);
            let (r, unlinked) = delete_min(arena, r);
            arena[node as usize].r = r;
            removed = unlinked;
        } else {
            let (r, unlinked) = delete_node(arena, r, key, comparator);
            arena[node as usize].r = r;
            removed = unlinked;
        }
    }

    (Some(balance(arena, node)), removed)
}

/// Height of the subtree; `-1` for an empty link, `0` for a single node.
pub fn height<K, V>(arena: &[LlrbNode<K, V>], node: Option<u32>) -> isize {
    match node {
        None => -1,
        Some(i) => 1 + height(arena, left(arena, i)).max(height(arena, right(arena, i))),
    }
}

/// Node with the largest key less than or equal to `key`.
pub fn floor<K, V, C>(
    arena: &[LlrbNode<K, V>],
    node: Option<u32>,
    key: &K,
    comparator: &C,
) -> Option<u32>
where
    C: Fn(&K, &K) -> i32,
{
    let i = node?;
    let cmp = comparator(key, &arena[i as usize].k);
    if cmp == 0 {
        return Some(i);
    }
    if cmp < 0 {
        return floor(arena, left(arena, i), key, comparator);
    }
    floor(arena, right(arena, i), key, comparator).or(Some(i))
}

/// Node with the smallest key greater than or equal to `key`.
pub fn ceiling<K, V, C>(
    arena: &[LlrbNode<K, V>],
    node: Option<u32>,
    key: &K,
    comparator: &C,
) -> Option<u32>
where
    C: Fn(&K, &K) -> i32,
{
    let i = node?;
    let cmp = comparator(key, &arena[i as usize].k);
    if cmp == 0 {
        return Some(i);
    }
    if cmp > 0 {
        return ceiling(arena, right(arena, i), key, comparator);
    }
    ceiling(arena, left(arena, i), key, comparator).or(Some(i))
}

/// Node with the given zero-based in-order rank.
pub fn select<K, V>(arena: &[LlrbNode<K, V>], root: Option<u32>, mut rank: usize) -> Option<u32> {
    let mut curr = root;
    while let Some(i) = curr {
        let left_size = size(arena, left(arena, i));
        if rank < left_size {
            curr = left(arena, i);
        } else if rank > left_size {
            rank -= left_size + 1;
            curr = right(arena, i);
        } else {
            return Some(i);
        }
    }
    None
}

/// Number of keys strictly less than `key`.
pub fn rank<K, V, C>(arena: &[LlrbNode<K, V>], root: Option<u32>, key: &K, comparator: &C) -> usize
where
    C: Fn(&K, &K) -> i32,
{
    let mut acc = 0;
    let mut curr = root;
    while let Some(i) = curr {
        let cmp = comparator(key, &arena[i as usize].k);
        if cmp < 0 {
            curr = left(arena, i);
        } else if cmp > 0 {
            acc += size(arena, left(arena, i)) + 1;
            curr = right(arena, i);
        } else {
            return acc + size(arena, left(arena, i));
        }
    }
    acc
}

/// Push keys within `[lo, hi]` onto `out`, in order.
pub fn collect_keys<'a, K, V, C>(
    arena: &'a [LlrbNode<K, V>],
    node: Option<u32>,
    lo: &K,
    hi: &K,
    comparator: &C,
    out: &mut Vec<&'a K>,
) where
    C: Fn(&K, &K) -> i32,
{
    let Some(i) = node else {
        return;
    };
    let n = &arena[i as usize];
    let cmp_lo = comparator(lo, &n.k);
    let cmp_hi = comparator(hi, &n.k);
    if cmp_lo < 0 {
        collect_keys(arena, n.l, lo, hi, comparator, out);
    }
    if cmp_lo <= 0 && cmp_hi >= 0 {
        out.push(&n.k);
    }
    if cmp_hi > 0 {
        collect_keys(arena, n.r, lo, hi, comparator, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::default_comparator;

    fn cmp(a: &i32, b: &i32) -> i32 {
        default_comparator(a, b)
    }

    fn node(k: i32, black: bool) -> LlrbNode<i32, i32> {
        let mut n = LlrbNode::new(k, k * 10);
        n.b = black;
        n
    }

    /// 2 (black) with children 1 (black) and 3 (black).
    fn three_black() -> Vec<LlrbNode<i32, i32>> {
        let mut arena = vec![node(2, true), node(1, true), node(3, true)];
        arena[0].l = Some(1);
        arena[0].r = Some(2);
        arena[0].n = 3;
        arena
    }

    #[test]
    fn empty_link_is_black_and_empty() {
        let arena: Vec<LlrbNode<i32, i32>> = Vec::new();
        assert!(!is_red(&arena, None));
        assert_eq!(size(&arena, None), 0);
        assert_eq!(height(&arena, None), -1);
    }

    #[test]
    fn rotate_left_promotes_right_child() {
        let mut arena = three_black();
        arena[2].b = false;
        let root = rotate_left(&mut arena, 0);
        assert_eq!(root, 2);
        assert!(arena[2].is_black());
        assert!(arena[0].is_red());
        assert_eq!(arena[2].l, Some(0));
        assert_eq!(arena[0].r, None);
        assert_eq!(arena[2].n, 3);
        assert_eq!(arena[0].n, 2);
    }

    #[test]
    fn rotate_right_promotes_left_child() {
        let mut arena = three_black();
        let root = rotate_right(&mut arena, 0);
        assert_eq!(root, 1);
        assert!(arena[1].is_black());
        assert!(arena[0].is_red());
        assert_eq!(arena[1].r, Some(0));
        assert_eq!(arena[0].l, None);
        assert_eq!(arena[1].n, 3);
        assert_eq!(arena[0].n, 2);
    }

    #[test]
    fn color_flip_toggles_three_nodes() {
        let mut arena = three_black();
        color_flip(&mut arena, 0);
        assert!(arena.iter().all(|n| n.is_red()));
        color_flip(&mut arena, 0);
        assert!(arena.iter().all(|n| n.is_black()));
    }

    #[test]
    fn balance_splits_double_red() {
        let mut arena = three_black();
        arena[1].b = false;
        arena[2].b = false;
        let root = balance(&mut arena, 0);
        assert_eq!(root, 0);
        assert!(arena[0].is_red());
        assert!(arena[1].is_black() && arena[2].is_black());
    }

    #[test]
    fn balance_fixes_left_left_chain() {
        // 3 -> 2 (red) -> 1 (red)
        let mut arena = vec![node(3, true), node(2, false), node(1, false)];
        arena[0].l = Some(1);
        arena[1].l = Some(2);
        arena[1].n = 2;
        arena[0].n = 3;
        let root = balance(&mut arena, 0);
        assert_eq!(root, 1);
        assert!(arena[1].is_red());
        assert!(arena[0].is_black() && arena[2].is_black());
        assert_eq!(arena[1].n, 3);
    }

    #[test]
    fn move_red_left_borrows_from_right_sibling() {
        // 2 (red) with black children 1 and 4, where 4 has red left child 3.
        let mut arena = vec![node(2, false), node(1, true), node(4, true), node(3, false)];
        arena[0].l = Some(1);
        arena[0].r = Some(2);
        arena[2].l = Some(3);
        arena[2].n = 2;
        arena[0].n = 4;
        let root = move_red_left(&mut arena, 0);
        assert_eq!(root, 3);
        assert_eq!(arena[3].l, Some(0));
        assert_eq!(arena[3].r, Some(2));
        assert!(arena[3].is_red());
        assert!(arena[0].is_black() && arena[2].is_black());
        assert!(arena[1].is_red());
        assert_eq!(arena[3].n, 4);
    }

    #[test]
    fn put_builds_balanced_tree() {
        let mut arena = Vec::new();
        let mut root = None;
        for k in 1..=7 {
            let (r, replaced) = put(&mut arena, root, k, k, &cmp);
            assert!(replaced.is_none());
            arena[r as usize].b = true;
            root = Some(r);
        }
        assert_eq!(size(&arena, root), 7);
        assert_eq!(height(&arena, root), 2);
        let (_, replaced) = put(&mut arena, root, 4, 40, &cmp);
        assert_eq!(replaced, Some(4));
    }

    #[test]
    fn order_statistics_on_small_tree() {
        let arena = three_black();
        let root = Some(0);
        assert_eq!(select(&arena, root, 0), Some(1));
        assert_eq!(select(&arena, root, 2), Some(2));
        assert_eq!(select(&arena, root, 3), None);
        assert_eq!(rank(&arena, root, &3, &cmp), 2);
        assert_eq!(rank(&arena, root, &10, &cmp), 3);
        assert_eq!(rank(&arena, root, &0, &cmp), 0);
        assert_eq!(floor(&arena, root, &0, &cmp), None);
        assert_eq!(ceiling(&arena, root, &4, &cmp), None);
        assert_eq!(parent_of(&arena, root, 2, &cmp), Some(0));
        assert_eq!(parent_of(&arena, root, 0, &cmp), None);
    }
}
