use alloc::string::String;

use vc_reflect::{DynamicStruct, ObjectId, Value};

use crate::ObjectError;
use crate::world::World;

impl World {
    #[inline]
    pub fn fields(&self, id: ObjectId) -> Option<&DynamicStruct> {
        self.objects.get(id).map(|o| &o.fields)
    }

    #[inline]
    pub fn fields_mut(&mut self, id: ObjectId) -> Option<&mut DynamicStruct> {
        self.objects.get_mut(id).map(|o| &mut o.fields)
    }

    #[inline]
    pub fn field(&self, id: ObjectId, name: &str) -> Option<&Value> {
        self.fields(id)?.get(name)
    }

    /// Assigns a field declared by the object's class, returning the old value.
    ///
    /// This does not fire change notifications.
    pub fn set_field(&mut self, id: ObjectId, name: &str, value: Value) -> Result<Value, ObjectError> {
        let registry = &self.registry;
        let data = self.objects.get_mut(id).ok_or(ObjectError::NotFound(id))?;
        let class = data.class;

        let Some(slot) = data.fields.get_mut(name) else {
            return Err(ObjectError::FieldNotFound {
                class: registry.path_of(class).unwrap_or_default().into(),
                field: name.into(),
            });
        };
        if slot.kind() != value.kind() {
            return Err(ObjectError::FieldKindMismatch {
                field: name.into(),
                expected: slot.kind(),
                found: value.kind(),
            });
        }
        Ok(core::mem::replace(slot, value))
    }

    #[inline]
    pub fn owner(&self, id: ObjectId) -> Option<ObjectId> {
        self.objects.get(id)?.owner
    }

    pub fn set_owner(&mut self, id: ObjectId, owner: Option<ObjectId>) -> Result<(), ObjectError> {
        if let Some(owner) = owner
            && !self.is_valid(owner)
        {
            return Err(ObjectError::NotFound(owner));
        }
        self.objects.get_mut(id).ok_or(ObjectError::NotFound(id))?.owner = owner;
        Ok(())
    }

    #[inline]
    pub fn instigator(&self, id: ObjectId) -> Option<ObjectId> {
        self.objects.get(id)?.instigator
    }

    pub fn set_instigator(&mut self, id: ObjectId, instigator: Option<ObjectId>) -> Result<(), ObjectError> {
        if let Some(instigator) = instigator
            && !self.is_valid(instigator)
        {
            return Err(ObjectError::NotFound(instigator));
        }
        self.objects.get_mut(id).ok_or(ObjectError::NotFound(id))?.instigator = instigator;
        Ok(())
    }

    /// Renames an object, optionally moving it to a new outer.
    ///
    /// Children move with the object. Components stay registered with their actor.
    pub fn rename(
        &mut self,
        id: ObjectId,
        name: &str,
        new_outer: Option<ObjectId>,
    ) -> Result<(), ObjectError> {
        Self::check_name(name)?;
        let old_outer = self.objects.get(id).ok_or(ObjectError::NotFound(id))?.outer;
        let outer = new_outer.or(old_outer);
        if let Some(outer) = outer
            && !self.contains(outer)
        {
            return Err(ObjectError::NotFound(outer));
        }
        if self.find_object(outer, name).is_some_and(|other| other != id) {
            return Err(ObjectError::NameTaken {
                name: name.into(),
                outer: outer.and_then(|o| self.path_of(o)).unwrap_or_else(String::new),
            });
        }

        if outer != old_outer {
            match old_outer {
                Some(old) => self.objects[old].children.retain(|&c| c != id),
                None => self.roots.retain(|&c| c != id),
            }
            match outer {
                Some(new) => self.objects[new].children.push(id),
                None => self.roots.push(id),
            }
        }

        let data = &mut self.objects[id];
        data.name = name.into();
        data.outer = outer;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use vc_reflect::info::ClassInfo;
    use vc_reflect::{FieldType, NamedField, TypeRegistry, Value, builtin};

    use crate::{ObjectError, SpawnParams, World};

    #[test]
    fn set_field_checks_schema() {
        let mut registry = TypeRegistry::new();
        let pawn = registry
            .register_class(
                ClassInfo::new("game.Pawn", Some(builtin::ACTOR))
                    .with_field(NamedField::new("Health", FieldType::Int).with_default(Value::Int(100))),
            )
            .unwrap();
        let mut world = World::new(Arc::new(registry));
        let level = world.create_level("L").unwrap();
        let hero = world.spawn_actor(pawn, level, SpawnParams::named("Hero")).unwrap();

        assert_eq!(world.field(hero, "Health"), Some(&Value::Int(100)));
        assert_eq!(world.set_field(hero, "Health", Value::Int(5)), Ok(Value::Int(100)));
        assert_eq!(world.field(hero, "Health"), Some(&Value::Int(5)));

        assert!(matches!(
            world.set_field(hero, "Mana", Value::Int(5)),
            Err(ObjectError::FieldNotFound { .. })
        ));
        assert!(matches!(
            world.set_field(hero, "Health", Value::Bool(true)),
            Err(ObjectError::FieldKindMismatch { .. })
        ));
    }

    #[test]
    fn rename_moves_between_outers() {
        let mut world = World::new(Arc::new(TypeRegistry::new()));
        let level = world.create_level("L").unwrap();
        let a = world.new_object(builtin::OBJECT, level, Some("A")).unwrap();
        let b = world.new_object(builtin::OBJECT, level, Some("B")).unwrap();
        let child = world.new_object(builtin::OBJECT, a, Some("Child")).unwrap();

        assert!(matches!(
            world.rename(a, "B", None),
            Err(ObjectError::NameTaken { .. })
        ));

        let transient = world.transient_package();
        world.rename(a, "A_Old", Some(transient)).unwrap();
        assert_eq!(world.find_object(Some(level), "A"), None);
        assert_eq!(world.path_of(child).as_deref(), Some("/Transient/A_Old/Child"));
        assert_eq!(world.find_by_path("/L/B"), Some(b));
    }
}
