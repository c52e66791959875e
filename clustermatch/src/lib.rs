//! Match freshly computed clusters to existing records so that record
//! identifiers survive re-clustering.
//!
//! Old clusters are tied to stable identifiers (e.g. database record ids);
//! new clusters come out of a clustering run that knows nothing about them.
//! [`cluster_assignment`] pairs every new cluster with at most one old cluster
//! by solving a minimum-cost assignment problem, then honors manual claims
//! and rejections.
//!
//! # Usage
//!
//! ```
//! use clustermatch::{cluster_assignment, cost, Overrides, Partition};
//!
//! let old: Partition<u32, u32> = [(1, vec![1]), (2, vec![2, 3])].into();
//! let new: Partition<&str, u32> = [("a", vec![1, 2, 3])].into();
//!
//! let result = cluster_assignment(&old, &new, cost::intersection, &Overrides::new()).unwrap();
//! assert_eq!(result.assigned[&1], Vec::<u32>::new());
//! assert_eq!(result.assigned[&2], vec![1, 2, 3]);
//! assert!(result.unassigned.is_empty());
//! ```
//!
//! # Design
//!
//! The assignment problem is never solved over the whole input. Old and new
//! clusters form a bipartite graph (an edge per shared entity) and each
//! connected component is solved on its own, with one extra "no old cluster"
//! column per new cluster so a solution always exists.

mod assign;
mod component;
pub mod cost;
mod error;
pub mod hungarian;
mod partition;

pub use assign::{Assignment, cluster_assignment};
pub use component::{Component, components};
pub use cost::CostFunction;
pub use error::MatchError;
pub use partition::{Overrides, Partition};
