use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::component::{ComponentIndex, Decomposer};
use crate::cost::CostFunction;
use crate::hungarian;
use crate::partition::{IndexedPartition, Overrides, Partition};

/// Result of [`cluster_assignment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment<O, E> {
    /// Every old group with the entities it ends up holding, possibly none.
    pub assigned: BTreeMap<O, Vec<E>>,

    /// Entities of new groups that matched no old group, one list per new group.
    pub unassigned: Vec<Vec<E>>,
}

impl<O, E> Assignment<O, E> {
    pub fn into_parts(self) -> (BTreeMap<O, Vec<E>>, Vec<Vec<E>>) {
        (self.assigned, self.unassigned)
    }
}

/// Overrides translated to old group positions.
struct Resolved<'a, E> {
    claimants: HashMap<&'a E, usize>,
    rejections: HashMap<usize, HashSet<&'a E>>,
}

impl<'a, E: Eq + Hash> Resolved<'a, E> {
    /// Expects `overrides` to be validated against `old`; unknown groups are skipped.
    fn new<O: Ord>(overrides: &'a Overrides<O, E>, old: &IndexedPartition<'_, O, E>) -> Self {
        let position = |key: &O| old.keys.binary_search_by(|k| (*k).cmp(key)).ok();

        let mut claimants = HashMap::new();
        for (key, entities) in &overrides.claims {
            if let Some(group) = position(key) {
                claimants.extend(entities.iter().map(|e| (e, group)));
            }
        }

        let rejections = overrides
            .rejection_sets()
            .into_iter()
            .filter_map(|(key, set)| Some((position(key)?, set)))
            .collect();

        Self {
            claimants,
            rejections,
        }
    }
}

enum Route {
    Old(usize),
    Unassigned,
}

/// Matches freshly computed groups (`new`) to existing ones (`old`).
///
/// Groups sharing entities are split into connected components. For each
/// component, every new group is paired with at most one old group, or with
/// none, so that the summed `cost` is minimal. Its entities then move to the
/// paired old group, subject to `overrides`:
///
/// - a claimed entity always goes to the old group claiming it;
/// - an entity rejected by the paired old group returns to the old group it
///   belongs to, or stays unassigned when it belongs to none.
///
/// Entities of a new group paired with no old group are returned together
/// in [`Assignment::unassigned`].
///
/// `cost` is called once for every (new group, column) pair inside a
/// component: once per old group, then once per "no old group" column with
/// an empty old side. Its errors are returned unchanged.
///
/// Entities must be disjoint across the groups of `old`, and likewise of
/// `new`. Every group named in `overrides` must exist in `old`.
pub fn cluster_assignment<N, O, E, C>(
    old: &Partition<O, E>,
    new: &Partition<N, E>,
    mut cost: C,
    overrides: &Overrides<O, E>,
) -> Result<Assignment<O, E>, C::Error>
where
    O: Ord + Clone + Debug,
    E: Eq + Hash + Clone,
    C: CostFunction<E>,
{
    overrides.validate(old)?;

    let old_index = IndexedPartition::new(old);
    let new_index = IndexedPartition::new(new);
    let resolved = Resolved::new(overrides, &old_index);

    let mut placed: Vec<Vec<E>> = vec![Vec::new(); old_index.len()];
    let mut unassigned = Vec::new();
    let mut components = 0usize;

    for component in Decomposer::new(&new_index.groups, &old_index.groups) {
        let costs = cost_matrix(&component, &new_index, &old_index, overrides, &mut cost)?;
        let pairs = hungarian::solve(&costs)?;
        debug!(
            component = components,
            new_groups = component.new.len(),
            old_groups = component.old.len(),
            "solved component"
        );
        components += 1;

        for (row, column) in pairs {
            // Columns past the old groups are the "no old group" slots.
            let target = component.old.get(column).copied();
            let mut leftover = Vec::new();

            for entity in new_index.members(component.new[row]) {
                match route(entity, target, &resolved, &old_index) {
                    Route::Old(group) => placed[group].push(entity.clone()),
                    Route::Unassigned => leftover.push(entity.clone()),
                }
            }

            if !leftover.is_empty() {
                unassigned.push(leftover);
            }
        }
    }

    info!(
        old_groups = old_index.len(),
        new_groups = new_index.len(),
        components,
        unassigned = unassigned.len(),
        "cluster assignment finished"
    );

    let assigned = old_index
        .keys
        .iter()
        .zip(placed)
        .map(|(key, entities)| ((*key).clone(), entities))
        .collect();

    Ok(Assignment {
        assigned,
        unassigned,
    })
}

/// Rows are the component's new groups; columns are its old groups followed
/// by one "no old group" column per new group.
fn cost_matrix<N, O, E, C>(
    component: &ComponentIndex,
    new: &IndexedPartition<'_, N, E>,
    old: &IndexedPartition<'_, O, E>,
    overrides: &Overrides<O, E>,
    cost: &mut C,
) -> Result<Vec<Vec<f64>>, C::Error>
where
    O: Ord,
    E: Eq + Hash,
    C: CostFunction<E>,
{
    let width = component.old.len() + component.new.len();
    let mut rows = Vec::with_capacity(component.new.len());

    for &g in &component.new {
        let group = new.members(g);
        let mut row = Vec::with_capacity(width);
        for &o in &component.old {
            let key = old.keys[o];
            row.push(cost.cost(
                group,
                old.members(o),
                overrides.claims_for(key),
                overrides.rejections_for(key),
            )?);
        }
        for _ in 0..component.new.len() {
            row.push(cost.cost(group, &[], &[], &[])?);
        }
        rows.push(row);
    }

    Ok(rows)
}

fn route<O, E: Eq + Hash>(
    entity: &E,
    target: Option<usize>,
    resolved: &Resolved<'_, E>,
    old: &IndexedPartition<'_, O, E>,
) -> Route {
    if let Some(&claimant) = resolved.claimants.get(entity) {
        if target != Some(claimant) {
            trace!(from = ?target, to = claimant, "claimed entity rerouted");
        }
        return Route::Old(claimant);
    }

    match target {
        Some(group) if resolved.rejections.get(&group).is_some_and(|r| r.contains(entity)) => {
            let origin = old.owner_of(entity);
            trace!(rejected_by = group, to = ?origin, "rejected entity rerouted");
            origin.map_or(Route::Unassigned, Route::Old)
        }
        Some(group) => Route::Old(group),
        None => Route::Unassigned,
    }
}
