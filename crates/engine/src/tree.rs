//! Family tree derivation and layout.
//!
//! Turns a household's edge set into a rooted, leveled layout: children map
//! from edges, root election, breadth-first leveling, then a centered
//! per-level horizontal spread. Layered layout was chosen over anything
//! force-directed: O(n), deterministic, and good enough for single-household
//! fan-out.
//!
//! The link graph is a general directed graph; nothing guarantees
//! acyclicity. Cycles are tolerated, not rejected: the first level a member
//! receives during BFS is final, so traversal always terminates.

use std::collections::{HashMap, VecDeque};

use rustc_hash::FxHashSet;

use crate::config::LayoutConfig;
use crate::model::{
    ChildEdge, FamilyTree, MemberId, MemberIdentity, NodePosition, RelationLink, TreeOutcome,
};

/// Build the tree for one household's members and links.
///
/// Roots are members with no inbound edge; if everything has an inbound edge
/// (cyclic or fully linked), the first member stands in. The primary root is
/// the oldest root, ties going to the earlier member. Members unreachable
/// from the primary root are placed one level below the deepest reached
/// level so they render under the connected core instead of over it.
pub fn build_family_tree(
    members: &[MemberIdentity],
    links: &[RelationLink],
    layout: &LayoutConfig,
) -> TreeOutcome {
    if members.is_empty() {
        return TreeOutcome::Unavailable;
    }

    let mut children: HashMap<MemberId, Vec<ChildEdge>> = HashMap::new();
    let mut has_incoming: FxHashSet<MemberId> = FxHashSet::default();
    for link in links {
        children.entry(link.from).or_default().push(ChildEdge {
            child: link.to,
            relation: link.relation,
        });
        has_incoming.insert(link.to);
    }

    let root = elect_root(members, &has_incoming);
    let levels = assign_levels(members, &children, root);
    let positions = lay_out(members, &levels, layout);

    TreeOutcome::Tree(FamilyTree {
        root,
        levels,
        children,
        positions,
        members: members.iter().map(|m| (m.id, m.clone())).collect(),
    })
}

fn elect_root(members: &[MemberIdentity], has_incoming: &FxHashSet<MemberId>) -> MemberId {
    let mut best: Option<&MemberIdentity> = None;
    for member in members {
        if has_incoming.contains(&member.id) {
            continue;
        }
        // Strict comparison keeps the earlier member on age ties
        if best.map_or(true, |b| member.age > b.age) {
            best = Some(member);
        }
    }
    best.map(|m| m.id).unwrap_or(members[0].id)
}

fn assign_levels(
    members: &[MemberIdentity],
    children: &HashMap<MemberId, Vec<ChildEdge>>,
    root: MemberId,
) -> HashMap<MemberId, u32> {
    let mut levels: HashMap<MemberId, u32> = HashMap::new();
    let mut queue: VecDeque<MemberId> = VecDeque::new();

    levels.insert(root, 0);
    queue.push_back(root);

    while let Some(id) = queue.pop_front() {
        let level = levels[&id];
        if let Some(kids) = children.get(&id) {
            for edge in kids {
                // First assignment wins; a member reachable through several
                // edges keeps its earliest-discovered depth.
                if !levels.contains_key(&edge.child) {
                    levels.insert(edge.child, level + 1);
                    queue.push_back(edge.child);
                }
            }
        }
    }

    // Everyone the BFS never reached lands one level below the deepest
    // reached level.
    let overflow = levels.values().copied().max().unwrap_or(0) + 1;
    for member in members {
        levels.entry(member.id).or_insert(overflow);
    }

    levels
}

/// Bucket members by level (in roll order within a level), spread each level
/// evenly around x = 0, stack levels vertically.
fn lay_out(
    members: &[MemberIdentity],
    levels: &HashMap<MemberId, u32>,
    layout: &LayoutConfig,
) -> HashMap<MemberId, NodePosition> {
    let deepest = members
        .iter()
        .filter_map(|m| levels.get(&m.id))
        .copied()
        .max()
        .unwrap_or(0);

    let mut by_level: Vec<Vec<MemberId>> = vec![Vec::new(); deepest as usize + 1];
    for member in members {
        if let Some(&level) = levels.get(&member.id) {
            by_level[level as usize].push(member.id);
        }
    }

    let mut positions: HashMap<MemberId, NodePosition> = HashMap::new();
    for (level, ids) in by_level.iter().enumerate() {
        if ids.is_empty() {
            continue;
        }
        let count = ids.len() as f32;
        let span = count * layout.node_width + (count - 1.0) * layout.h_gap;
        let y = level as f32 * (layout.node_height + layout.v_gap);

        let mut x = -span / 2.0 + layout.node_width / 2.0;
        for id in ids {
            positions.insert(*id, NodePosition { x, y });
            x += layout.node_width + layout.h_gap;
        }
    }

    positions
}
