//! Entity trait: identity that survives across evaluation runs.

/// Entity marker + minimal interface.
///
/// Catalog items are entities: two snapshots with the same id describe the same
/// SKU even if their stock levels differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
