use alloc::string::String;
use alloc::vec::Vec;

use vc_reflect::info::ClassFlags;
use vc_reflect::{ObjectId, builtin};

use crate::world::{PathTarget, World};

impl World {
    /// Finds a direct child of `outer` (or a root when `outer` is `None`) by name.
    ///
    /// Objects pending destroy are included.
    pub fn find_object(&self, outer: Option<ObjectId>, name: &str) -> Option<ObjectId> {
        let siblings = match outer {
            Some(outer) => self.objects.get(outer)?.children.as_slice(),
            None => self.roots.as_slice(),
        };
        siblings
            .iter()
            .copied()
            .find(|&id| self.objects.get(id).is_some_and(|o| o.name() == name))
    }

    /// Returns the slash separated path of an object, e.g. `/Level1/Actor_3`.
    pub fn path_of(&self, id: ObjectId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(id) = current {
            let data = self.objects.get(id)?;
            names.push(data.name());
            current = data.outer();
        }

        let mut path = String::new();
        for name in names.iter().rev() {
            path.push('/');
            path.push_str(name);
        }
        Some(path)
    }

    /// Finds a valid object by its full path.
    pub fn find_by_path(&self, path: &str) -> Option<ObjectId> {
        let mut segments = path.strip_prefix('/')?.split('/');
        let mut current = self.find_object(None, segments.next()?)?;
        for segment in segments {
            current = self.find_object(Some(current), segment)?;
        }
        self.is_valid(current).then_some(current)
    }

    /// Resolves an object path (leading `/`) or a type path.
    pub fn resolve_path(&self, path: &str) -> Option<PathTarget> {
        if path.starts_with('/') {
            self.find_by_path(path).map(PathTarget::Object)
        } else {
            self.registry.get_with_path(path).map(PathTarget::Type)
        }
    }

    /// The level containing an object, or the object itself if it is a level.
    pub fn level_of(&self, id: ObjectId) -> Option<ObjectId> {
        let mut current = Some(id);
        while let Some(id) = current {
            if self.is_a(id, builtin::LEVEL) {
                return Some(id);
            }
            current = self.objects.get(id)?.outer();
        }
        None
    }

    /// Valid levels, in creation order.
    pub fn levels(&self) -> Vec<ObjectId> {
        self.roots
            .iter()
            .copied()
            .filter(|&id| self.is_valid(id) && self.is_a(id, builtin::LEVEL))
            .collect()
    }

    /// Valid actors spawned into `level`, in spawn order.
    pub fn actors_in(&self, level: ObjectId) -> Vec<ObjectId> {
        let Some(data) = self.objects.get(level) else {
            return Vec::new();
        };
        data.children
            .iter()
            .copied()
            .filter(|&id| {
                self.is_valid(id)
                    && self.class_of(id).is_some_and(|class| {
                        self.registry.class_flags(class).contains(ClassFlags::ACTOR)
                    })
            })
            .collect()
    }

    /// Valid components registered with `actor`.
    pub fn components_of(&self, actor: ObjectId) -> Vec<ObjectId> {
        self.objects.get(actor).map_or_else(Vec::new, |data| {
            data.components
                .iter()
                .copied()
                .filter(|&id| self.is_valid(id))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use vc_reflect::info::ClassInfo;
    use vc_reflect::{TypeRegistry, builtin};

    use crate::{PathTarget, SpawnParams, World};

    #[test]
    fn paths_resolve_both_ways() {
        let mut registry = TypeRegistry::new();
        let pawn = registry
            .register_class(ClassInfo::new("game.Pawn", Some(builtin::ACTOR)))
            .unwrap();
        let mut world = World::new(Arc::new(registry));

        let level = world.create_level("Level1").unwrap();
        let actor = world.spawn_actor(pawn, level, SpawnParams::named("Hero")).unwrap();
        let item = world.new_object(builtin::OBJECT, actor, Some("Sword")).unwrap();

        assert_eq!(world.path_of(item).as_deref(), Some("/Level1/Hero/Sword"));
        assert_eq!(world.find_by_path("/Level1/Hero/Sword"), Some(item));
        assert_eq!(world.find_by_path("/Level1/Nobody"), None);
        assert_eq!(world.find_by_path("Level1"), None);

        assert_eq!(world.resolve_path("/Level1/Hero"), Some(PathTarget::Object(actor)));
        assert_eq!(world.resolve_path("game.Pawn"), Some(PathTarget::Type(pawn)));
        assert_eq!(world.resolve_path("core.Color"), Some(PathTarget::Type(builtin::COLOR)));
        assert_eq!(world.resolve_path("game.Missing"), None);

        assert_eq!(world.level_of(item), Some(level));
        assert_eq!(world.levels(), [level]);
        assert_eq!(world.actors_in(level), [actor]);
    }
}
