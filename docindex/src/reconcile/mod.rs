//! Comparing declared indexes with a collection's catalog and acting on the
//! difference.
//!
//! [`ReconcilePlan`] is the pure diff. [`Reconciler`] reads the collection,
//! builds the plan, applies the safety gate and, when allowed, creates and
//! drops indexes.

mod plan;
mod reconciler;

pub use plan::*;
pub use reconciler::*;
