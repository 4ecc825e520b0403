//! Canonical flattening of the reply forest.
//!
//! Both protocol sides must produce the same linear comment order and the
//! same parent resolution, including the tolerant `prefix_id` fallback, or
//! the selector indices stop lining up.

use std::collections::{HashMap, HashSet};

use crate::carrier::CommentNode;

/// Depth-first pre-order view of a comment forest.
pub struct FlatThread<'a> {
    order: Vec<&'a CommentNode>,
    id_index: HashMap<&'a str, usize>,
}

impl<'a> FlatThread<'a> {
    /// Flatten the forest: roots in given order, each node followed by its
    /// replies. Nodes whose id was already visited are skipped, which also
    /// terminates adversarial duplicate-id loops.
    pub fn build(forest: &'a [CommentNode]) -> Self {
        let mut order = Vec::new();
        let mut id_index: HashMap<&str, usize> = HashMap::new();
        let mut seen: HashSet<&str> = HashSet::new();

        fn visit<'a>(
            node: &'a CommentNode,
            order: &mut Vec<&'a CommentNode>,
            id_index: &mut HashMap<&'a str, usize>,
            seen: &mut HashSet<&'a str>,
        ) {
            if !node.id.is_empty() {
                if !seen.insert(node.id.as_str()) {
                    return;
                }
                id_index.insert(node.id.as_str(), order.len());
            }
            order.push(node);
            for reply in &node.replies {
                visit(reply, order, id_index, seen);
            }
        }

        for root in forest {
            visit(root, &mut order, &mut id_index, &mut seen);
        }
        Self { order, id_index }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Comment at position `idx` in canonical order.
    pub fn get(&self, idx: usize) -> Option<&'a CommentNode> {
        self.order.get(idx).copied()
    }

    /// Comments in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &'a CommentNode> + '_ {
        self.order.iter().copied()
    }

    /// Position of a comment id in canonical order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.id_index.get(id).copied()
    }

    /// Resolve a parent id, tolerating type prefixes: when the full id is
    /// unknown and the id contains an underscore, the suffix after the last
    /// underscore is tried as well. Both protocol sides apply this rule.
    pub fn resolve(&self, parent_id: &str) -> Option<&'a CommentNode> {
        if let Some(&idx) = self.id_index.get(parent_id) {
            return Some(self.order[idx]);
        }
        let (_, suffix) = parent_id.rsplit_once('_')?;
        self.id_index.get(suffix).map(|&idx| self.order[idx])
    }

    /// Walk parent ids from `node` to the thread root, returning the chain
    /// root-first with `node` last. Walking stops at the thread root id, at
    /// an unresolvable parent, or on a repeated visit.
    pub fn ancestor_chain(&self, node: &'a CommentNode) -> Vec<&'a CommentNode> {
        let mut chain = vec![node];
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(node.id.as_str());
        let mut current = node;
        loop {
            if current.parent_id.is_empty() || current.parent_id == current.link_id {
                break;
            }
            let parent = match self.resolve(&current.parent_id) {
                Some(p) => p,
                None => break,
            };
            if !visited.insert(parent.id.as_str()) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: &str, replies: Vec<CommentNode>) -> CommentNode {
        CommentNode {
            id: id.to_string(),
            parent_id: parent.to_string(),
            link_id: "t3_root".to_string(),
            body: format!("body of {id}"),
            replies,
            ..CommentNode::default()
        }
    }

    #[test]
    fn flatten_is_preorder() {
        let forest = vec![
            node("a", "t3_root", vec![node("b", "t1_a", vec![node("c", "t1_b", vec![])])]),
            node("d", "t3_root", vec![]),
        ];
        let flat = FlatThread::build(&forest);
        let ids: Vec<&str> = flat.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
    }

    #[test]
    fn prefixed_parent_resolves_via_suffix() {
        let forest = vec![node("a", "t3_root", vec![]), node("b", "t1_a", vec![])];
        let flat = FlatThread::build(&forest);
        let resolved = flat.resolve("t1_a").expect("suffix fallback");
        assert_eq!(resolved.id, "a");
    }

    #[test]
    fn chain_runs_root_first() {
        let forest = vec![node(
            "a",
            "t3_root",
            vec![node("b", "t1_a", vec![node("c", "t1_b", vec![])])],
        )];
        let flat = FlatThread::build(&forest);
        let c = flat.get(2).unwrap();
        let chain: Vec<&str> = flat
            .ancestor_chain(c)
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(chain, ["a", "b", "c"]);
    }

    #[test]
    fn parent_cycle_terminates() {
        // b points at c and c points back at b; the walk must not spin
        let forest = vec![
            node("b", "t1_c", vec![]),
            node("c", "t1_b", vec![]),
        ];
        let flat = FlatThread::build(&forest);
        let b = flat.get(0).unwrap();
        let chain = flat.ancestor_chain(b);
        assert!(chain.len() <= 2);
        assert_eq!(chain.last().unwrap().id, "b");
    }

    #[test]
    fn duplicate_ids_flatten_once() {
        let forest = vec![node("a", "t3_root", vec![]), node("a", "t3_root", vec![])];
        let flat = FlatThread::build(&forest);
        assert_eq!(flat.len(), 1);
    }
}
