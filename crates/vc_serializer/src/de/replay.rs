use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::Cell;

use vc_object::World;
use vc_reflect::{ObjectId, Value};

/// Change notifications of one object, held back while its fields load.
///
/// Each notify is queued once with the value the first field using it had
/// before loading. [`fire`](Self::fire) runs them at most once.
#[derive(Debug)]
pub struct NotifyReplay {
    object: ObjectId,
    queued: Vec<(Box<str>, Value)>,
    fired: Cell<bool>,
}

impl NotifyReplay {
    #[inline]
    pub(crate) fn new(object: ObjectId) -> Self {
        Self {
            object,
            queued: Vec::new(),
            fired: Cell::new(false),
        }
    }

    /// Returns `false` if the notify was already queued.
    pub(crate) fn queue(&mut self, notify: &str, prior: Value) -> bool {
        if self.queued.iter().any(|(name, _)| &**name == notify) {
            return false;
        }
        self.queued.push((notify.into(), prior));
        true
    }

    #[inline]
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// Names of the queued notifies, in queue order.
    pub fn queued(&self) -> impl Iterator<Item = &str> {
        self.queued.iter().map(|(name, _)| &**name)
    }

    #[inline]
    pub fn is_fired(&self) -> bool {
        self.fired.get()
    }

    /// Calls every queued notify with its prior value, once.
    pub fn fire(&self, world: &mut World) {
        if self.fired.replace(true) {
            return;
        }
        for (notify, prior) in &self.queued {
            world.call_notify(self.object, notify, prior);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use std::sync::Mutex;

    use vc_object::{ClassHooks, World};
    use vc_reflect::info::ClassInfo;
    use vc_reflect::{FieldType, NamedField, TypeRegistry, Value, builtin};

    use super::NotifyReplay;

    #[test]
    fn fires_once() {
        let mut registry = TypeRegistry::new();
        let door = registry
            .register_class(
                ClassInfo::new("game.Door", Some(builtin::OBJECT))
                    .with_field(NamedField::new("Open", FieldType::Bool).with_notify("OnRep_Open")),
            )
            .unwrap();
        let mut world = World::new(Arc::new(registry));

        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        world.set_hooks(
            door,
            ClassHooks::new().on_notify("OnRep_Open", move |_, _, prior| {
                sink.lock().unwrap().push(prior.clone());
            }),
        );
        let outer = world.transient_package();
        let id = world.new_object(door, outer, Some("Front")).unwrap();

        let mut replay = NotifyReplay::new(id);
        assert!(replay.queue("OnRep_Open", Value::Bool(false)));
        assert!(!replay.queue("OnRep_Open", Value::Bool(true)));
        assert_eq!(replay.queued().collect::<Vec<_>>(), ["OnRep_Open"]);

        replay.fire(&mut world);
        replay.fire(&mut world);
        assert!(replay.is_fired());
        assert_eq!(*calls.lock().unwrap(), [Value::Bool(false)]);
    }
}
