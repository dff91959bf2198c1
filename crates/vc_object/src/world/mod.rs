// -----------------------------------------------------------------------------
// Modules

mod impls;
mod methods;

// -----------------------------------------------------------------------------
// Exports

pub use impls::{PathTarget, World};
pub use methods::{DeferredActor, SpawnParams};
