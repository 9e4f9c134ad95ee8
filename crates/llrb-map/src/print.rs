use std::fmt::Debug;

use crate::types::LlrbNode;

/// Debug printer for LLRB subtrees.
pub fn print<K, V>(arena: &[LlrbNode<K, V>], node: Option<u32>, tab: &str) -> String
where
    K: Debug,
    V: Debug,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i as usize];
            let color = if n.is_black() { "black" } else { "red" };
            let left = print(arena, n.l, &format!("{tab}  "));
            let right = print(arena, n.r, &format!("{tab}  "));
            format!(
                "Node[{i}] {color} n={} {{ {:?} = {:?} }}\n{tab}L={left}\n{tab}R={right}",
                n.n, n.k, n.v
            )
        }
    }
}
