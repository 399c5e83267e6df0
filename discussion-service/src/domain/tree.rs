//! Reply tree assembly.
//!
//! Pure transformation from the flat comment list the store returns into a
//! nested forest. No I/O, no locking: the tree is rebuilt fresh per read from
//! an index map plus an adjacency table rather than kept as a persistent
//! pointer graph.
//!
//! Cycle detection is deliberately out of scope. Acyclic `parent_id` chains
//! are a write-time guarantee (the store rejects cross-post parents and
//! parents are immutable), so the builder trusts its input.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::models::CommentWithAuthor;

/// A comment with its direct replies nested beneath it
#[derive(Debug, Clone, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: CommentWithAuthor,
    pub children: Vec<CommentNode>,
}

/// How siblings are ordered within each reply list.
///
/// This is a caller-facing configuration point: the HTTP layer ships the flat
/// list and clients usually build the tree themselves, but server-side views
/// can pick the ordering that fits their rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiblingOrder {
    /// Oldest first (default)
    #[default]
    CreatedAsc,
    /// Most upvoted first, ties broken oldest-first
    UpvotesDesc,
}

/// Assemble a flat comment list into a forest of reply trees.
///
/// Two passes, O(n) time and space: the first indexes every comment by id,
/// the second attaches each comment under its parent when the parent is
/// present in the input, and roots it otherwise. Rooting the orphans (rather
/// than dropping them or erroring) keeps comments reachable when their parent
/// was hard-deleted out from under them.
pub fn build(comments: Vec<CommentWithAuthor>, order: SiblingOrder) -> Vec<CommentNode> {
    let index: HashMap<uuid::Uuid, usize> = comments
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (i, comment) in comments.iter().enumerate() {
        match comment.parent_id.and_then(|p| index.get(&p).copied()) {
            Some(parent_idx) => children[parent_idx].push(i),
            None => roots.push(i),
        }
    }

    let by_order = |a: &usize, b: &usize| {
        let (a, b) = (&comments[*a], &comments[*b]);
        match order {
            SiblingOrder::CreatedAsc => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
            SiblingOrder::UpvotesDesc => b
                .upvotes
                .cmp(&a.upvotes)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id)),
        }
    };
    roots.sort_by(by_order);
    for list in &mut children {
        list.sort_by(by_order);
    }

    let mut slots: Vec<Option<CommentWithAuthor>> = comments.into_iter().map(Some).collect();
    roots
        .iter()
        .map(|&root| assemble(root, &children, &mut slots))
        .collect()
}

fn assemble(
    idx: usize,
    children: &[Vec<usize>],
    slots: &mut [Option<CommentWithAuthor>],
) -> CommentNode {
    let nested = children[idx]
        .iter()
        .map(|&child| assemble(child, children, slots))
        .collect();

    // SAFETY: every index is reachable from exactly one parent or the root
    // list, so each slot is taken exactly once.
    let comment = slots[idx].take().expect("comment slot visited once");

    CommentNode {
        comment,
        children: nested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn comment(
        id: Uuid,
        parent_id: Option<Uuid>,
        minutes: i64,
        upvotes: i32,
    ) -> CommentWithAuthor {
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        CommentWithAuthor {
            id,
            post_id: Uuid::nil(),
            author_id: Uuid::nil(),
            parent_id,
            content: format!("comment {id}"),
            upvotes,
            deleted: false,
            created_at: base + Duration::minutes(minutes),
            updated_at: base + Duration::minutes(minutes),
            author_display_name: "author".to_string(),
        }
    }

    fn node_count(nodes: &[CommentNode]) -> usize {
        nodes
            .iter()
            .map(|n| 1 + node_count(&n.children))
            .sum()
    }

    #[test]
    fn nests_replies_under_parents() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let input = vec![
            comment(a, None, 0, 0),
            comment(b, Some(a), 1, 0),
            comment(c, None, 2, 0),
        ];

        let forest = build(input, SiblingOrder::CreatedAsc);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].comment.id, a);
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].comment.id, b);
        assert_eq!(forest[1].comment.id, c);
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn every_comment_appears_exactly_once() {
        let ids: Vec<Uuid> = (0..7).map(|_| Uuid::new_v4()).collect();
        let input = vec![
            comment(ids[0], None, 0, 0),
            comment(ids[1], Some(ids[0]), 1, 0),
            comment(ids[2], Some(ids[0]), 2, 0),
            comment(ids[3], Some(ids[1]), 3, 0),
            comment(ids[4], Some(ids[3]), 4, 0),
            comment(ids[5], None, 5, 0),
            comment(ids[6], Some(ids[5]), 6, 0),
        ];

        let forest = build(input, SiblingOrder::CreatedAsc);

        assert_eq!(node_count(&forest), 7);
    }

    #[test]
    fn parent_edges_match_parent_id() {
        fn check(nodes: &[CommentNode]) {
            for node in nodes {
                for child in &node.children {
                    assert_eq!(child.comment.parent_id, Some(node.comment.id));
                }
                check(&node.children);
            }
        }

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let input = vec![
            comment(a, None, 0, 0),
            comment(b, Some(a), 1, 0),
            comment(c, Some(b), 2, 0),
        ];

        check(&build(input, SiblingOrder::CreatedAsc));
    }

    #[test]
    fn orphans_become_roots() {
        let missing_parent = Uuid::new_v4();
        let orphan = Uuid::new_v4();
        let root = Uuid::new_v4();
        let input = vec![
            comment(root, None, 0, 0),
            comment(orphan, Some(missing_parent), 1, 0),
        ];

        let forest = build(input, SiblingOrder::CreatedAsc);

        assert_eq!(forest.len(), 2);
        assert!(forest.iter().any(|n| n.comment.id == orphan));
    }

    #[test]
    fn siblings_ordered_by_created_at_by_default() {
        let a = Uuid::new_v4();
        let newer = Uuid::new_v4();
        let older = Uuid::new_v4();
        let input = vec![
            comment(a, None, 0, 0),
            comment(newer, Some(a), 10, 5),
            comment(older, Some(a), 1, 0),
        ];

        let forest = build(input, SiblingOrder::CreatedAsc);

        let children: Vec<Uuid> = forest[0].children.iter().map(|n| n.comment.id).collect();
        assert_eq!(children, vec![older, newer]);
    }

    #[test]
    fn siblings_ordered_by_upvotes_when_configured() {
        let a = Uuid::new_v4();
        let popular = Uuid::new_v4();
        let early = Uuid::new_v4();
        let input = vec![
            comment(a, None, 0, 0),
            comment(early, Some(a), 1, 1),
            comment(popular, Some(a), 10, 5),
        ];

        let forest = build(input, SiblingOrder::UpvotesDesc);

        let children: Vec<Uuid> = forest[0].children.iter().map(|n| n.comment.id).collect();
        assert_eq!(children, vec![popular, early]);
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        assert!(build(Vec::new(), SiblingOrder::CreatedAsc).is_empty());
    }
}
