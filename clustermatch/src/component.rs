//! Connected components of the old/new bipartite graph.
//!
//! A new group and an old group are adjacent when they share an entity. The
//! graph is never materialized: adjacency is read off the reverse indices,
//! and a depth-first walk alternates between the two sides.

use std::hash::Hash;

use crate::partition::{GroupIndex, IndexedPartition, Partition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    New = 0,
    Old = 1,
}

impl Side {
    fn other(self) -> Self {
        match self {
            Self::New => Self::Old,
            Self::Old => Self::New,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A connected component, as group positions within each partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ComponentIndex {
    pub(crate) new: Vec<usize>,
    pub(crate) old: Vec<usize>,
}

struct Frame {
    side: Side,
    group: usize,
    next: usize,
}

/// Yields components in the order their first new group appears.
///
/// Within a component, groups are listed in depth-first discovery order,
/// which fixes the row and column order of the cost matrix.
pub(crate) struct Decomposer<'p, 'a, E> {
    sides: [&'p GroupIndex<'a, E>; 2],
    visited: [Vec<bool>; 2],
    next_root: usize,
}

impl<'p, 'a, E: Eq + Hash> Decomposer<'p, 'a, E> {
    pub(crate) fn new(new: &'p GroupIndex<'a, E>, old: &'p GroupIndex<'a, E>) -> Self {
        Self {
            sides: [new, old],
            visited: [vec![false; new.len()], vec![false; old.len()]],
            next_root: 0,
        }
    }

    fn visit(
        &mut self,
        side: Side,
        group: usize,
        found: &mut [Vec<usize>; 2],
        stack: &mut Vec<Frame>,
    ) {
        self.visited[side.index()][group] = true;
        found[side.index()].push(group);
        stack.push(Frame { side, group, next: 0 });
    }
}

impl<E: Eq + Hash> Iterator for Decomposer<'_, '_, E> {
    type Item = ComponentIndex;

    fn next(&mut self) -> Option<ComponentIndex> {
        let roots = &self.visited[Side::New.index()];
        let root = (self.next_root..roots.len()).find(|&i| !roots[i])?;
        self.next_root = root + 1;

        let mut found = [Vec::new(), Vec::new()];
        let mut stack = Vec::new();
        self.visit(Side::New, root, &mut found, &mut stack);

        while let Some(frame) = stack.last_mut() {
            let side = frame.side;
            let members = self.sides[side.index()].members(frame.group);
            let Some(entity) = members.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;

            let other = side.other();
            if let Some(group) = self.sides[other.index()].owner_of(entity) {
                if !self.visited[other.index()][group] {
                    self.visit(other, group, &mut found, &mut stack);
                }
            }
        }

        let [new, old] = found;
        Some(ComponentIndex { new, old })
    }
}

/// A connected component: new and old groups linked by shared entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component<'a, N, O> {
    pub new: Vec<&'a N>,
    pub old: Vec<&'a O>,
}

/// Splits the groups of `new` and `old` into connected components.
///
/// Every new group belongs to exactly one component, possibly with no old
/// groups. Old groups sharing no entity with any new group are not reported.
pub fn components<'a, N, O, E>(
    old: &'a Partition<O, E>,
    new: &'a Partition<N, E>,
) -> Vec<Component<'a, N, O>>
where
    E: Eq + Hash,
{
    let old = IndexedPartition::new(old);
    let new = IndexedPartition::new(new);
    Decomposer::new(&new.groups, &old.groups)
        .map(|c| Component {
            new: c.new.iter().map(|&i| new.keys[i]).collect(),
            old: c.old.iter().map(|&i| old.keys[i]).collect(),
        })
        .collect()
}
