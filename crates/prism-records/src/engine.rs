//! Game-engine objects consumed by the record builder.
//!
//! These are the narrow views of players, entities, worlds, cause chains and
//! block changes that event handlers pass in. They deserialise from the
//! JSON event feed and convert to engine-shaped documents, which the builder
//! then normalises.

use prism_types::{keys, Document};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Schema marker written into engine-shaped location documents.
pub const CONTENT_VERSION: i32 = 1;

/// A connected player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable unique id.
    pub uuid: Uuid,
    pub name: String,
}

/// A non-player entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity type name, e.g. `Zombie`.
    #[serde(rename = "type")]
    pub entity_type: String,
}

/// A loaded world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub uuid: Uuid,
    pub name: String,
}

/// One object implicated in triggering an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CauseObject {
    Player(Player),
    World(World),
    Entity(Entity),
    /// Anything else (a plugin, a dispenser, a scheduled task).
    Other { description: String },
}

/// The ordered chain of everything that caused an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cause {
    objects: Vec<CauseObject>,
}

impl Cause {
    pub fn of(objects: Vec<CauseObject>) -> Self {
        Self { objects }
    }

    pub fn first(&self) -> Option<&CauseObject> {
        self.objects.first()
    }

    pub fn first_player(&self) -> Option<&Player> {
        self.objects.iter().find_map(|o| match o {
            CauseObject::Player(p) => Some(p),
            _ => None,
        })
    }

    pub fn first_world(&self) -> Option<&World> {
        self.objects.iter().find_map(|o| match o {
            CauseObject::World(w) => Some(w),
            _ => None,
        })
    }
}

/// Block coordinates within a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// A resolved block location, shaped the way the engine serialises it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLocation {
    pub world_uuid: Uuid,
    pub world_name: String,
    pub position: Position,
    pub block_type: String,
}

impl BlockLocation {
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.set(keys::CONTENT_VERSION, CONTENT_VERSION);
        doc.set(keys::WORLD_UUID, self.world_uuid.to_string());
        doc.set(keys::WORLD_NAME, self.world_name.as_str());
        doc.set(keys::BLOCK_TYPE, self.block_type.as_str());
        doc.set(keys::X, self.position.x);
        doc.set(keys::Y, self.position.y);
        doc.set(keys::Z, self.position.z);
        doc
    }
}

/// The state of one block at one moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub world_uuid: Uuid,
    /// Name of the owning world; absent when the world is not loaded and
    /// the location cannot be resolved.
    #[serde(default)]
    pub world_name: Option<String>,
    pub position: Position,
    pub block_type: String,
    /// Extra block-state properties (facing, age, ...).
    #[serde(default)]
    pub traits: Document,
    /// Raw tile-entity data, which usually repeats the coordinates.
    #[serde(default)]
    pub unsafe_data: Option<Document>,
}

impl BlockSnapshot {
    /// The resolved location, if the owning world is loaded.
    pub fn location(&self) -> Option<BlockLocation> {
        let world_name = self.world_name.clone()?;
        Some(BlockLocation {
            world_uuid: self.world_uuid,
            world_name,
            position: self.position,
            block_type: self.block_type.clone(),
        })
    }

    pub fn to_document(&self) -> Document {
        let mut state = self.traits.clone();
        state.set(keys::BLOCK_TYPE, self.block_type.as_str());

        let mut position = Document::new();
        position.set(keys::X, self.position.x);
        position.set(keys::Y, self.position.y);
        position.set(keys::Z, self.position.z);

        let mut doc = Document::new();
        doc.set(keys::WORLD_UUID, self.world_uuid.to_string());
        doc.set(keys::POSITION, position);
        doc.set(keys::BLOCK_STATE, state);
        if let Some(unsafe_data) = &self.unsafe_data {
            doc.set(keys::UNSAFE_DATA, unsafe_data.clone());
        }
        doc
    }
}

/// A before/after pair for one block location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTransaction {
    pub original: BlockSnapshot,
    #[serde(rename = "final")]
    pub replacement: BlockSnapshot,
}

impl BlockTransaction {
    pub fn new(original: BlockSnapshot, replacement: BlockSnapshot) -> Self {
        Self {
            original,
            replacement,
        }
    }
}
