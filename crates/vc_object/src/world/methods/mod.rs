mod create;
mod destroy;
mod hooks;
mod lookup;
mod modify;

pub use create::{DeferredActor, SpawnParams};
