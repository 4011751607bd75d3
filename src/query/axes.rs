//! Axis resolution
//!
//! Maps an axis name plus an optional integer argument to a new node set.
//! Every axis except `nth` yields Empty on an empty input; `nth` validates
//! its position even against a zero-length set, so it always fails there.
//!
//! Most axes operate on the first member of the input set. `children`,
//! `siblings`, and `random` fan out across the whole set.

use super::set::NodeSet;
use crate::dom::{NodeId, XmlDocument};
use crate::error::QueryError;
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Navigation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    First,
    Last,
    Nth,
    Prev,
    Next,
    Parent,
    Root,
    Children,
    Random,
    Siblings,
}

impl Axis {
    /// Parse an axis name, case-insensitively
    pub fn parse(name: &str) -> Option<Axis> {
        let axis = match name.to_ascii_lowercase().as_str() {
            "first" => Axis::First,
            "last" => Axis::Last,
            "nth" => Axis::Nth,
            "prev" => Axis::Prev,
            "next" => Axis::Next,
            "parent" => Axis::Parent,
            "root" => Axis::Root,
            "children" => Axis::Children,
            "random" => Axis::Random,
            "siblings" => Axis::Siblings,
            _ => return None,
        };
        Some(axis)
    }
}

/// Resolve an axis against an input set.
///
/// `pos` is the integer argument: required by `nth`, optional for
/// `children`, and absent for every other axis (the dispatcher enforces
/// arity before calling here).
pub fn resolve(
    doc: &XmlDocument,
    set: &NodeSet,
    axis: Axis,
    pos: Option<i64>,
) -> Result<NodeSet, QueryError> {
    // nth validates range even on an empty input
    if axis == Axis::Nth {
        return set.nth(pos.unwrap_or(-1));
    }

    if set.is_empty() {
        return Ok(NodeSet::empty());
    }

    let result = match axis {
        Axis::First => set.first(),
        Axis::Last => set.last(),
        Axis::Parent => match first_parent(doc, set) {
            Some(parent) => NodeSet::from_node(parent),
            None => NodeSet::empty(),
        },
        Axis::Root => resolve_root(doc, set),
        Axis::Next => resolve_sibling(doc, set, |n| n.next_sibling),
        Axis::Prev => resolve_sibling(doc, set, |n| n.prev_sibling),
        Axis::Children => resolve_children(doc, set, pos),
        Axis::Random => resolve_random(set),
        Axis::Siblings => resolve_siblings(doc, set),
        Axis::Nth => unreachable!(),
    };
    Ok(result)
}

fn first_parent(doc: &XmlDocument, set: &NodeSet) -> Option<NodeId> {
    doc.get_node(set.get(0)?).and_then(|n| n.parent)
}

/// Climb from the first member to the topmost container, then take its last
/// child. The last child is used rather than the first because the container
/// may hold preamble nodes (comments, processing instructions) ahead of the
/// root element.
fn resolve_root(doc: &XmlDocument, set: &NodeSet) -> NodeSet {
    let Some(mut current) = set.get(0) else {
        return NodeSet::empty();
    };
    while let Some(parent) = doc.get_node(current).and_then(|n| n.parent) {
        current = parent;
    }
    match doc.get_node(current).and_then(|n| n.last_child) {
        Some(last) => NodeSet::from_node(last),
        None => NodeSet::empty(),
    }
}

fn resolve_sibling(
    doc: &XmlDocument,
    set: &NodeSet,
    pick: impl Fn(&crate::dom::XmlNode) -> Option<NodeId>,
) -> NodeSet {
    let sibling = set.get(0).and_then(|id| doc.get_node(id)).and_then(pick);
    match sibling {
        Some(id) => NodeSet::from_node(id),
        None => NodeSet::empty(),
    }
}

/// With no position: every direct child of every member, in order. With a
/// position: that child of the first member only, where an out-of-range
/// position silently yields Empty rather than an error.
fn resolve_children(doc: &XmlDocument, set: &NodeSet, pos: Option<i64>) -> NodeSet {
    match pos {
        None => {
            let mut nodes = Vec::new();
            for member in set.iter() {
                nodes.extend(doc.children(member));
            }
            NodeSet::new(nodes)
        }
        Some(pos) => {
            let Some(first) = set.get(0) else {
                return NodeSet::empty();
            };
            if pos < 0 {
                return NodeSet::empty();
            }
            match doc.children(first).nth(pos as usize) {
                Some(child) => NodeSet::from_node(child),
                None => NodeSet::empty(),
            }
        }
    }
}

/// Union of all siblings (same parent, excluding self) of every member.
/// De-duplicated, first-seen order.
fn resolve_siblings(doc: &XmlDocument, set: &NodeSet) -> NodeSet {
    let mut results: Vec<NodeId> = Vec::new();
    for member in set.iter() {
        let is_element = doc.get_node(member).is_some_and(|n| n.is_element());
        if !is_element {
            continue;
        }
        let Some(parent) = doc.get_node(member).and_then(|n| n.parent) else {
            continue;
        };
        for sibling in doc.children(parent) {
            if sibling != member && !results.contains(&sibling) {
                results.push(sibling);
            }
        }
    }
    NodeSet::new(results)
}

/// Pick one member of the set at a pseudo-random position. The generator is
/// seeded once per process from the clock; repeated calls cover the full
/// range of positions.
fn resolve_random(set: &NodeSet) -> NodeSet {
    let pos = rng().lock().map_or(0, |mut rng| rng.usize(0..set.count()));
    match set.get(pos) {
        Some(node) => NodeSet::from_node(node),
        None => NodeSet::empty(),
    }
}

fn rng() -> &'static Mutex<fastrand::Rng> {
    static RNG: OnceLock<Mutex<fastrand::Rng>> = OnceLock::new();
    RNG.get_or_init(|| {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0x5eed, |d| d.as_nanos() as u64);
        Mutex::new(fastrand::Rng::with_seed(seed))
    })
}
