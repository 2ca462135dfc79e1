//! Storage seam between the physics loop and whatever owns the bodies

use crate::body::Body;
use std::fmt::Debug;

/// Anything that holds bodies addressable by a stable id
///
/// The physics world reads and writes bodies through this trait so it never
/// needs to know about entities, render data or id allocation.
pub trait BodyStore {
    /// Identifier for one body
    type Id: Copy + Eq + Debug;

    /// Append the id of every stored body to `out`
    ///
    /// `out` is not cleared first.
    fn collect_ids(&self, out: &mut Vec<Self::Id>);

    /// Get a body by id
    fn body(&self, id: Self::Id) -> Option<&Body>;

    /// Get a mutable body by id
    fn body_mut(&mut self, id: Self::Id) -> Option<&mut Body>;

    /// Visit every stored body
    fn for_each_body<F: FnMut(Self::Id, &Body)>(&self, f: F);
}

impl BodyStore for Vec<Body> {
    type Id = usize;

    fn collect_ids(&self, out: &mut Vec<usize>) {
        out.extend(0..self.len());
    }

    fn body(&self, id: usize) -> Option<&Body> {
        self.get(id)
    }

    fn body_mut(&mut self, id: usize) -> Option<&mut Body> {
        self.get_mut(id)
    }

    fn for_each_body<F: FnMut(usize, &Body)>(&self, mut f: F) {
        for (id, body) in self.iter().enumerate() {
            f(id, body);
        }
    }
}
