//! Type hierarchy closure.
//!
//! The closure of a type is the search order used by implicit-method
//! lookup: the type itself, then its superclass chain, then interfaces,
//! with duplicates dropped at their first occurrence.
//!
//! ```text
//! ImmutableList
//!   → AbstractList → AbstractCollection → Object      (superclass chain)
//!   → Collection → Iterable                           (AbstractCollection's interfaces)
//!   → List                                            (AbstractList's interfaces)
//!   → RandomAccess                                    (ImmutableList's interfaces)
//! ```
//!
//! Interfaces are collected while unwinding the superclass walk, so the
//! interfaces of the topmost ancestor come first. Array types other than the
//! universal object array collapse to their innermost component type in
//! place of a superclass.

use rustc_hash::FxHashSet;

use crate::runner::ds::types::TypeRef;

/// Read-only view of a type graph.
pub trait TypeGraph {
    /// Declared superclass of `ty`, if any. Never called for arrays that
    /// collapse to their component type.
    fn superclass(&self, ty: &TypeRef) -> Option<TypeRef>;

    /// Directly declared interfaces of `ty`, in declaration order.
    fn interfaces(&self, ty: &TypeRef) -> Vec<TypeRef>;
}

/// Compute the ordered, deduplicated closure of `ty`. The first element is
/// always `ty` itself.
pub fn type_closure<G: TypeGraph + ?Sized>(graph: &G, ty: &TypeRef) -> Vec<TypeRef> {
    let mut walk = ClosureWalk {
        graph,
        order: Vec::new(),
        seen: FxHashSet::default(),
    };
    walk.insert(ty);
    walk.inheritance(ty);
    walk.order
}

struct ClosureWalk<'g, G: ?Sized> {
    graph: &'g G,
    order: Vec<TypeRef>,
    seen: FxHashSet<TypeRef>,
}

impl<'g, G: TypeGraph + ?Sized> ClosureWalk<'g, G> {
    /// Returns `false` when `ty` was already present. A type already present
    /// has had its ancestors inserted, so callers skip expanding it again.
    fn insert(&mut self, ty: &TypeRef) -> bool {
        if self.seen.insert(ty.clone()) {
            self.order.push(ty.clone());
            true
        } else {
            false
        }
    }

    fn inheritance(&mut self, ty: &TypeRef) {
        if let Some(superclass) = effective_superclass(self.graph, ty) {
            if self.insert(&superclass) {
                self.inheritance(&superclass);
            }
        }
        self.interface_inheritance(ty);
    }

    fn interface_inheritance(&mut self, ty: &TypeRef) {
        for interface in self.graph.interfaces(ty) {
            if self.insert(&interface) {
                self.interface_inheritance(&interface);
            }
        }
    }
}

fn effective_superclass<G: TypeGraph + ?Sized>(graph: &G, ty: &TypeRef) -> Option<TypeRef> {
    if ty.is_array() && !ty.is_object_array() {
        return Some(ty.innermost_component().clone());
    }
    graph.superclass(ty)
}
