//! Infrastructure layer - in-process storage and the reference combat resolver.

pub mod dice_combat;
pub mod memory_store;

pub use dice_combat::DiceCombatResolver;
pub use memory_store::InMemoryMatchStore;
