//! Entities: records with identity that are not event-sourced (suppliers,
//! menu items, promotions).

pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
