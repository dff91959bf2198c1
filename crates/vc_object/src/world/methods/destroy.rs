use alloc::vec::Vec;

use vc_reflect::ObjectId;

use crate::ObjectError;
use crate::object::ObjectFlags;
use crate::world::World;

impl World {
    /// Marks an object and everything it contains as pending destroy.
    ///
    /// Pending objects stay addressable by name until [`purge`](Self::purge).
    pub fn destroy(&mut self, id: ObjectId) -> Result<(), ObjectError> {
        if !self.contains(id) {
            return Err(ObjectError::NotFound(id));
        }
        let mut stack = alloc::vec![id];
        while let Some(current) = stack.pop() {
            if let Some(data) = self.objects.get_mut(current) {
                data.flags |= ObjectFlags::PENDING_DESTROY;
                stack.extend_from_slice(&data.children);
            }
        }
        Ok(())
    }

    /// Removes every pending-destroy object, returning how many were removed.
    pub fn purge(&mut self) -> usize {
        let dead: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, o)| o.is_pending_destroy())
            .map(|(id, _)| id)
            .collect();

        for &id in &dead {
            self.objects.remove(id);
        }
        self.roots.retain(|&id| !dead.contains(&id));
        for (_, data) in self.objects.iter_mut() {
            data.children.retain(|id| !dead.contains(id));
            data.components.retain(|id| !dead.contains(id));
        }
        dead.len()
    }
}
