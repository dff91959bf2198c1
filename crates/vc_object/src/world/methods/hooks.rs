use alloc::sync::Arc;
use alloc::vec::Vec;

use vc_reflect::{ObjectId, TypeHandle, Value};

use crate::hooks::{ClassHooks, ObjectFn};
use crate::world::World;

impl World {
    /// Replaces the hooks of a class.
    #[inline]
    pub fn set_hooks(&mut self, class: TypeHandle, hooks: ClassHooks) {
        self.hooks.insert(class, hooks);
    }

    #[inline]
    pub fn hooks(&self, class: TypeHandle) -> Option<&ClassHooks> {
        self.hooks.get(&class)
    }

    // Base class first.
    fn collect_object_hooks(&self, id: ObjectId, pick: fn(&ClassHooks) -> Option<&ObjectFn>) -> Vec<ObjectFn> {
        let Some(class) = self.class_of(id) else {
            return Vec::new();
        };
        let mut hooks: Vec<ObjectFn> = self
            .registry
            .super_chain(class)
            .filter_map(|h| self.hooks.get(&h).and_then(pick).cloned())
            .collect();
        hooks.reverse();
        hooks
    }

    pub(crate) fn run_construct(&mut self, id: ObjectId) {
        for hook in self.collect_object_hooks(id, ClassHooks::construct) {
            hook(self, id);
        }
    }

    /// Runs the game-init hooks of an object.
    pub fn game_init(&mut self, id: ObjectId) {
        for hook in self.collect_object_hooks(id, ClassHooks::game_init) {
            hook(self, id);
        }
    }

    /// `false` if any class in the hierarchy refuses serialization.
    pub fn can_serialize(&self, id: ObjectId) -> bool {
        let Some(class) = self.class_of(id) else {
            return false;
        };
        self.registry
            .super_chain(class)
            .filter_map(|h| self.hooks.get(&h)?.can_serialize())
            .all(|f| f(self, id))
    }

    /// Fires the named change notification of an object.
    ///
    /// Returns `false` if no class in the hierarchy declares it.
    pub fn call_notify(&mut self, id: ObjectId, name: &str, prior: &Value) -> bool {
        let Some(class) = self.class_of(id) else {
            return false;
        };
        let notify = self
            .registry
            .super_chain(class)
            .find_map(|h| self.hooks.get(&h)?.notify(name).map(Arc::clone));

        match notify {
            Some(notify) => {
                notify(self, id, prior);
                true
            }
            None => {
                log::warn!(
                    "notify `{name}` is not declared for `{}`",
                    self.registry.path_of(class).unwrap_or_default()
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use std::sync::Mutex;

    use vc_reflect::info::ClassInfo;
    use vc_reflect::{TypeRegistry, Value, builtin};

    use crate::{ClassHooks, SpawnParams, World};

    #[test]
    fn hooks_follow_the_hierarchy() {
        let mut registry = TypeRegistry::new();
        let pawn = registry
            .register_class(ClassInfo::new("game.Pawn", Some(builtin::ACTOR)))
            .unwrap();
        let hero = registry
            .register_class(ClassInfo::new("game.Hero", Some(pawn)))
            .unwrap();
        let mut world = World::new(Arc::new(registry));

        let log: Arc<Mutex<Vec<String>>> = Arc::default();
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        world.set_hooks(
            pawn,
            ClassHooks::new()
                .on_construct(move |_, _| l1.lock().unwrap().push("pawn".into()))
                .on_notify("OnRep_Health", move |_, _, prior| {
                    l3.lock().unwrap().push(format!("notify {prior:?}"));
                })
                .with_can_serialize(|_, _| true),
        );
        world.set_hooks(
            hero,
            ClassHooks::new()
                .on_construct(move |_, _| l2.lock().unwrap().push("hero".into()))
                .with_can_serialize(|_, _| false),
        );

        let level = world.create_level("L").unwrap();
        let id = world.spawn_actor(hero, level, SpawnParams::named("H")).unwrap();
        assert!(world.call_notify(id, "OnRep_Health", &Value::Int(1)));
        assert!(!world.call_notify(id, "OnRep_Missing", &Value::Int(1)));
        assert!(!world.can_serialize(id));

        assert_eq!(*log.lock().unwrap(), ["pawn", "hero", "notify Int(1)"]);
    }
}
