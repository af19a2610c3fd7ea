//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Ledger rows are entities: a balance row keeps its identity while its amount
/// changes, and at most one row may exist per identity.
pub trait Entity {
    /// Storage key of the entity.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
