//! Cost functions pairing a new group with an old group.
//!
//! Lower cost means a more desirable pairing. Costs may be negative, which is
//! the usual way to reward large overlaps.

use std::collections::HashSet;
use std::hash::Hash;

use crate::error::MatchError;

/// Prices assigning a new group to an old group.
///
/// `claims` and `rejections` are the overrides recorded for the old group.
/// Overrides are enforced after the assignment is solved, so a cost function
/// may ignore them.
///
/// The pairing of a new group with "no old group" is priced by calling
/// `cost` with empty `old_group`, `claims` and `rejections`, once for each
/// such column of the component.
///
/// Any closure `FnMut(&[E], &[E], &[E], &[E]) -> f64` is a cost function.
/// Implement the trait directly when computing a cost can fail; the error is
/// handed back to the caller of [`cluster_assignment`](crate::cluster_assignment)
/// as is.
pub trait CostFunction<E> {
    type Error: From<MatchError>;

    fn cost(
        &mut self,
        new_group: &[E],
        old_group: &[E],
        claims: &[E],
        rejections: &[E],
    ) -> Result<f64, Self::Error>;
}

impl<E, F> CostFunction<E> for F
where
    F: FnMut(&[E], &[E], &[E], &[E]) -> f64,
{
    type Error = MatchError;

    fn cost(
        &mut self,
        new_group: &[E],
        old_group: &[E],
        claims: &[E],
        rejections: &[E],
    ) -> Result<f64, MatchError> {
        Ok(self(new_group, old_group, claims, rejections))
    }
}

fn intersection_len<E: Eq + Hash>(a: &[E], b: &[E]) -> usize {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let lookup: HashSet<&E> = large.iter().collect();
    small
        .iter()
        .collect::<HashSet<&E>>()
        .into_iter()
        .filter(|e| lookup.contains(*e))
        .count()
}

/// Every pairing costs the same. Ties are then broken by the solver alone.
pub fn constant<E>(_new: &[E], _old: &[E], _claims: &[E], _rejections: &[E]) -> f64 {
    1.0
}

/// `-|new ∩ old|`: the larger the overlap, the cheaper the pairing.
pub fn intersection<E: Eq + Hash>(new: &[E], old: &[E], _claims: &[E], _rejections: &[E]) -> f64 {
    -(intersection_len(new, old) as f64)
}

/// `-|new ∩ old| + |old \ new|`: rewards overlap and penalizes old members
/// the new group would drop.
pub fn overlap<E: Eq + Hash>(new: &[E], old: &[E], _claims: &[E], _rejections: &[E]) -> f64 {
    let common = intersection_len(new, old);
    let old_distinct = old.iter().collect::<HashSet<&E>>().len();
    (old_distinct - common) as f64 - common as f64
}
