use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use vc_object::{SpawnParams, World};
use vc_reflect::info::ClassFlags;
use vc_reflect::{ObjectId, TypeHandle, builtin};
use vc_serializer::{
    DeserializeConfig, ExtendDataRegistry, GraphDeserializer, GraphSerializer, SaveDocument, SerializeConfig,
};

use crate::storage::{Compression, SaveStorage, Uncompressed};
use crate::{ArchiveConfig, ArchiveError};

/// Root field holding the actors of a level save.
pub const LEVEL_ACTORS: &str = "LevelActors";

/// Root field holding the pawn of a player save.
pub const PLAYER_PAWN: &str = "PlayerPawn";

/// What [`SaveManager::load_or_init_level`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelLoad {
    /// The manager is disabled; the level was left alone.
    Disabled,
    /// The level was restored from its save.
    Loaded {
        /// Actors listed in the save, in saved order.
        actors: Vec<ObjectId>,
        /// Pre-placed saveable actors missing from the save.
        destroyed: Vec<ObjectId>,
    },
    /// No save was loaded; game-init hooks ran on the level's actors.
    Initialized,
}

/// Called with the world and one of its levels.
pub type LevelFn = Arc<dyn Fn(&mut World, ObjectId) + Send + Sync>;

/// Level lifecycle listeners of a [`SaveManager`].
#[derive(Clone, Default)]
struct LevelHooks {
    pre_save: Vec<LevelFn>,
    loaded: Vec<LevelFn>,
    initialized: Vec<LevelFn>,
}

fn run_level_hooks(hooks: &[LevelFn], world: &mut World, level: ObjectId) {
    for hook in hooks {
        hook(world, level);
    }
}

// -----------------------------------------------------------------------------
// SaveManager

/// Saves and restores levels and players through a [`SaveStorage`].
///
/// A level save holds every actor of the level whose class has
/// [`ClassFlags::SAVE_GAME`] and whose `can_serialize` hooks agree. It is
/// stored under the level category, named after the level.
pub struct SaveManager<S: SaveStorage> {
    storage: S,
    config: ArchiveConfig,
    extend: ExtendDataRegistry,
    compression: Box<dyn Compression>,
    serialize: SerializeConfig,
    deserialize: DeserializeConfig,
    hooks: LevelHooks,
}

impl<S: SaveStorage> SaveManager<S> {
    /// Creates a manager with the built-in extend data factories.
    pub fn new(storage: S, config: ArchiveConfig) -> Self {
        Self {
            storage,
            config,
            extend: ExtendDataRegistry::with_defaults(),
            compression: Box::new(Uncompressed),
            serialize: SerializeConfig::default(),
            deserialize: DeserializeConfig::default(),
            hooks: LevelHooks::default(),
        }
    }

    #[inline]
    pub fn with_extend(mut self, extend: ExtendDataRegistry) -> Self {
        self.extend = extend;
        self
    }

    #[inline]
    pub fn with_compression(mut self, compression: impl Compression + 'static) -> Self {
        self.compression = Box::new(compression);
        self
    }

    #[inline]
    pub fn with_serialize_config(mut self, config: SerializeConfig) -> Self {
        self.serialize = config;
        self
    }

    #[inline]
    pub fn with_deserialize_config(mut self, config: DeserializeConfig) -> Self {
        self.deserialize = config;
        self
    }

    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[inline]
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    #[inline]
    pub fn into_storage(self) -> S {
        self.storage
    }

    #[inline]
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    #[inline]
    pub fn config_mut(&mut self) -> &mut ArchiveConfig {
        &mut self.config
    }

    #[inline]
    pub fn extend(&self) -> &ExtendDataRegistry {
        &self.extend
    }

    #[inline]
    pub fn extend_mut(&mut self) -> &mut ExtendDataRegistry {
        &mut self.extend
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    #[inline]
    pub fn enable(&mut self) {
        self.config.enabled = true;
    }

    #[inline]
    pub fn disable(&mut self) {
        self.config.enabled = false;
    }

    // -------------------------------------------------------------------------
    // Level hooks

    /// Runs before a level is written, while its actors can still change.
    pub fn on_level_pre_save(&mut self, f: impl Fn(&mut World, ObjectId) + Send + Sync + 'static) {
        self.hooks.pre_save.push(Arc::new(f));
    }

    /// Runs after a level was restored from its save.
    pub fn on_level_loaded(&mut self, f: impl Fn(&mut World, ObjectId) + Send + Sync + 'static) {
        self.hooks.loaded.push(Arc::new(f));
    }

    /// Runs after a level without a loaded save was initialized.
    pub fn on_level_initialized(&mut self, f: impl Fn(&mut World, ObjectId) + Send + Sync + 'static) {
        self.hooks.initialized.push(Arc::new(f));
    }

    // -------------------------------------------------------------------------
    // Documents

    fn write(&mut self, category: &str, name: &str, document: &SaveDocument) -> Result<(), ArchiveError> {
        let bytes = if self.config.pretty {
            document.to_vec_pretty()?
        } else {
            document.to_vec()?
        };
        let bytes = self.compression.compress(bytes)?;
        self.storage.save(category, name, &bytes)?;
        Ok(())
    }

    fn read(&self, category: &str, name: &str) -> Result<Option<SaveDocument>, ArchiveError> {
        let Some(bytes) = self.storage.load(category, name)? else {
            return Ok(None);
        };
        let bytes = self.compression.decompress(bytes)?;
        Ok(Some(SaveDocument::from_slice(&bytes)?))
    }

    // -------------------------------------------------------------------------
    // Levels

    /// Writes the saveable actors of `level`.
    ///
    /// Returns `false` without writing if the manager is disabled.
    pub fn save_level(&mut self, world: &mut World, level: ObjectId) -> Result<bool, ArchiveError> {
        if !self.config.enabled {
            log::debug!("save manager disabled, level not saved");
            return Ok(false);
        }
        let name = level_name(world, level)?;
        run_level_hooks(&self.hooks.pre_save, world, level);
        let world = &*world;
        let actors: Vec<Option<ObjectId>> = serializable_actors(world, level).into_iter().map(Some).collect();

        let mut ser = GraphSerializer::with_config(world, &self.extend, self.serialize.clone());
        ser.add_objects(LEVEL_ACTORS, &actors)?;
        let document = ser.finish();

        let category = self.config.level_category.clone();
        self.write(&category, &name, &document)?;
        log::info!("level `{name}` saved with {} actors", actors.len());
        Ok(true)
    }

    /// Saves every level of the world, returning how many were written.
    pub fn archive_world(&mut self, world: &mut World) -> Result<usize, ArchiveError> {
        let mut written = 0;
        for level in world.levels() {
            if self.save_level(world, level)? {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Restores `level` from its save, or initializes it if there is none.
    ///
    /// After loading, pre-placed saveable actors that the save does not
    /// list are destroyed.
    pub fn load_or_init_level(&mut self, world: &mut World, level: ObjectId) -> Result<LevelLoad, ArchiveError> {
        if !self.config.enabled {
            return Ok(LevelLoad::Disabled);
        }
        let name = level_name(world, level)?;

        if self.config.load_on_init
            && let Some(document) = self.read(&self.config.level_category, &name)?
        {
            let prepared = serializable_actors(world, level);

            let mut de = GraphDeserializer::with_config(&document, level, &self.extend, self.deserialize.clone());
            de.load_all(world)?;
            let actors: Vec<ObjectId> = de.objects(LEVEL_ACTORS)?.into_iter().flatten().collect();

            let mut destroyed = Vec::new();
            for actor in prepared {
                if world.is_valid(actor) && !actors.contains(&actor) {
                    world.destroy(actor)?;
                    destroyed.push(actor);
                }
            }

            log::info!(
                "level `{name}` loaded: {} actors, {} destroyed",
                actors.len(),
                destroyed.len()
            );
            run_level_hooks(&self.hooks.loaded, world, level);
            return Ok(LevelLoad::Loaded { actors, destroyed });
        }

        log::info!("level `{name}` initialized");
        for actor in world.actors_in(level) {
            init_actor_and_components(world, actor);
        }
        run_level_hooks(&self.hooks.initialized, world, level);
        Ok(LevelLoad::Initialized)
    }

    /// Runs game-init hooks on an actor spawned after its level was set up.
    ///
    /// Returns `false` if the manager is disabled or spawned actors are not
    /// initialized.
    pub fn init_spawned_actor(&self, world: &mut World, actor: ObjectId) -> bool {
        if !self.config.enabled || !self.config.init_spawned_actors {
            return false;
        }
        init_actor_and_components(world, actor);
        true
    }

    // -------------------------------------------------------------------------
    // Players

    /// Writes a player's pawn under the player category.
    pub fn save_player(&mut self, world: &World, player: &str, pawn: ObjectId) -> Result<bool, ArchiveError> {
        if !self.config.enabled {
            return Ok(false);
        }
        let mut ser = GraphSerializer::with_config(world, &self.extend, self.serialize.clone());
        ser.add_object(PLAYER_PAWN, Some(pawn))?;
        let document = ser.finish();

        let category = self.config.player_category.clone();
        self.write(&category, player, &document)?;
        log::info!("player `{player}` saved");
        Ok(true)
    }

    /// Restores a player's pawn into `level`, `None` if it was never saved.
    pub fn load_player(
        &mut self,
        world: &mut World,
        player: &str,
        level: ObjectId,
    ) -> Result<Option<ObjectId>, ArchiveError> {
        if !self.config.enabled {
            return Ok(None);
        }
        let Some(document) = self.read(&self.config.player_category, player)? else {
            return Ok(None);
        };

        let mut de = GraphDeserializer::with_config(&document, level, &self.extend, self.deserialize.clone());
        de.load_all(world)?;
        Ok(de.object(PLAYER_PAWN)?)
    }

    /// Restores a player's pawn, or spawns and initializes a new `class`
    /// pawn if there is no save.
    pub fn load_or_spawn_player(
        &mut self,
        world: &mut World,
        player: &str,
        level: ObjectId,
        class: TypeHandle,
    ) -> Result<ObjectId, ArchiveError> {
        if let Some(pawn) = self.load_player(world, player, level)? {
            return Ok(pawn);
        }
        let pawn = world.spawn_actor(class, level, SpawnParams::default())?;
        init_actor_and_components(world, pawn);
        Ok(pawn)
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn level_name(world: &World, level: ObjectId) -> Result<String, ArchiveError> {
    world
        .get(level)
        .filter(|_| world.is_a(level, builtin::LEVEL))
        .map(|data| data.name().into())
        .ok_or(ArchiveError::NotALevel(level))
}

/// Actors of `level` that a level save includes.
pub fn serializable_actors(world: &World, level: ObjectId) -> Vec<ObjectId> {
    let registry = world.registry();
    world
        .actors_in(level)
        .into_iter()
        .filter(|&actor| {
            world
                .class_of(actor)
                .is_some_and(|class| registry.class_flags(class).contains(ClassFlags::SAVE_GAME))
                && world.can_serialize(actor)
        })
        .collect()
}

/// Runs game-init hooks on a saveable actor, then on its components.
fn init_actor_and_components(world: &mut World, actor: ObjectId) {
    let saveable = world
        .class_of(actor)
        .is_some_and(|class| world.registry().class_flags(class).contains(ClassFlags::SAVE_GAME));
    if !saveable || !world.is_valid(actor) {
        return;
    }
    world.game_init(actor);
    for component in world.components_of(actor) {
        world.game_init(component);
    }
}
