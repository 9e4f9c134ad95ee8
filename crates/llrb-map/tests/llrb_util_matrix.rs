use llrb_map::check::{is_balanced, is_bst, is_rank_consistent, is_size_consistent, is_two_three};
use llrb_map::util::{delete_max, delete_min, delete_node, find, height, put, size};
use llrb_map::LlrbNode;

fn cmp(a: &i32, b: &i32) -> i32 {
    a.cmp(b) as i32
}

fn assert_shape(arena: &[LlrbNode<i32, i32>], root: Option<u32>, step: &str) {
    assert!(!root.is_some_and(|r| arena[r as usize].is_red()), "{step}: red root");
    assert!(is_bst(arena, root, &cmp), "{step}: not ordered");
    assert!(is_size_consistent(arena, root), "{step}: bad sizes");
    assert!(is_rank_consistent(arena, root, &cmp), "{step}: bad ranks");
    assert!(is_two_three(arena, root), "{step}: not 2-3");
    assert!(is_balanced(arena, root), "{step}: unbalanced");
}

fn blacken(arena: &mut [LlrbNode<i32, i32>], root: Option<u32>) -> Option<u32> {
    if let Some(r) = root {
        arena[r as usize].b = true;
    }
    root
}

/// Same root preparation the map does before a top-down delete.
fn redden(arena: &mut [LlrbNode<i32, i32>], root: u32) {
    let n = &arena[root as usize];
    let l_black = n.l.map(|i| arena[i as usize].is_black()).unwrap_or(true);
    let r_black = n.r.map(|i| arena[i as usize].is_black()).unwrap_or(true);
    if l_black && r_black {
        arena[root as usize].b = false;
    }
}

fn insert_value(arena: &mut Vec<LlrbNode<i32, i32>>, root: Option<u32>, value: i32) -> Option<u32> {
    let (r, _) = put(arena, root, value, value, &cmp);
    let root = blacken(arena, Some(r));
    assert_shape(arena, root, &format!("insert({value})"));
    root
}

fn delete_value(arena: &mut [LlrbNode<i32, i32>], root: Option<u32>, value: i32) -> Option<u32> {
    let Some(r) = root else {
        return None;
    };
    if find(arena, root, &value, &cmp).is_none() {
        return root;
    }
    redden(arena, r);
    let (root, removed) = delete_node(arena, r, &value, &cmp);
    assert_eq!(arena[removed as usize].k, value);
    let root = blacken(arena, root);
    assert_shape(arena, root, &format!("delete({value})"));
    root
}

#[test]
fn llrb_util_insert_delete_various_numbers_matrix() {
    let mut arena = Vec::new();
    let mut root = None;

    for value in [10, 11, 12, 50, 60, 25, 100, 88, 33, 22, 55, 59, 51] {
        root = insert_value(&mut arena, root, value);
    }
    assert_eq!(size(&arena, root), 13);

    root = delete_value(&mut arena, root, 100);
    assert_eq!(size(&arena, root), 12);

    root = delete_value(&mut arena, root, 33);
    root = delete_value(&mut arena, root, 33);
    assert_eq!(size(&arena, root), 11);

    root = delete_value(&mut arena, root, 10);
    assert_eq!(size(&arena, root), 10);

    root = delete_value(&mut arena, root, 60);
    assert_eq!(size(&arena, root), 9);

    root = delete_value(&mut arena, root, 22);
    assert_eq!(size(&arena, root), 8);
}

#[test]
fn llrb_util_numbers_from_0_to_100_matrix() {
    let mut arena = Vec::new();
    let mut root = None;

    for i in 0..=100 {
        root = insert_value(&mut arena, root, i);
        assert_eq!(size(&arena, root), (i + 1) as usize);
    }
    assert!(height(&arena, root) <= 2 * 7);
    for i in 0..=100 {
        root = delete_value(&mut arena, root, i);
        assert_eq!(size(&arena, root), (100 - i) as usize);
    }
    assert_eq!(root, None);
}

#[test]
fn llrb_util_numbers_both_directions_from_50_matrix() {
    let mut arena = Vec::new();
    let mut root = None;

    for i in 0..=100 {
        root = insert_value(&mut arena, root, 50 + i);
        if i > 0 {
            root = insert_value(&mut arena, root, 50 - i);
        }
    }
    assert_eq!(size(&arena, root), 201);
    for i in 0..=100 {
        root = delete_value(&mut arena, root, 50 - i);
        root = delete_value(&mut arena, root, 50 + i);
    }
    assert_eq!(root, None);
}

#[test]
fn llrb_util_delete_min_max_matrix() {
    let mut arena = Vec::new();
    let mut root = None;
    for i in 0..64 {
        root = insert_value(&mut arena, root, (i * 37) % 64);
    }

    for expected in 0..32 {
        let r = root.unwrap();
        redden(&mut arena, r);
        let (next, removed) = delete_min(&mut arena, r);
        assert_eq!(arena[removed as usize].k, expected);
        root = blacken(&mut arena, next);
        assert_shape(&arena, root, &format!("delete_min -> {expected}"));
    }
    for expected in (32..64).rev() {
        let r = root.unwrap();
        redden(&mut arena, r);
        let (next, removed) = delete_max(&mut arena, r);
        assert_eq!(arena[removed as usize].k, expected);
        root = blacken(&mut arena, next);
        assert_shape(&arena, root, &format!("delete_max -> {expected}"));
    }
    assert_eq!(root, None);
}
