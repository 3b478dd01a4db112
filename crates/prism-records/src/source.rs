//! Resolution of a cause chain into a single record source.

use prism_filter::SourceIdentity;
use prism_types::keys;

use crate::engine::{Cause, CauseObject, Entity, Player, World};
use crate::error::RecordError;

/// The identity a record is attributed to.
///
/// Resolved once when the cause is bound; the identity strings are carried
/// directly so stamping never re-inspects engine objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Player { uuid: String, name: String },
    Entity { entity_type: String },
    World { name: String },
    Other { description: String },
}

impl Source {
    /// Picks the source from a cause chain.
    ///
    /// A player anywhere in the chain wins, then a world, then whatever the
    /// chain starts with.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidArgument` for an empty chain.
    pub fn resolve(cause: &Cause) -> Result<Self, RecordError> {
        if let Some(player) = cause.first_player() {
            return Ok(Self::from(player));
        }
        if let Some(world) = cause.first_world() {
            return Ok(Self::from(world));
        }
        cause
            .first()
            .map(Self::from)
            .ok_or_else(|| RecordError::InvalidArgument("cause chain is empty".to_string()))
    }

    /// The top-level document key the identifier is stamped under.
    pub fn stamp_key(&self) -> &'static str {
        match self {
            Self::Player { .. } => keys::PLAYER,
            _ => keys::CAUSE,
        }
    }

    /// The identifier stamped into the record.
    pub fn identifier(&self) -> &str {
        match self {
            Self::Player { uuid, .. } => uuid,
            Self::Entity { entity_type } => entity_type,
            Self::World { name } => name,
            Self::Other { .. } => keys::ENVIRONMENT,
        }
    }
}

impl SourceIdentity for Source {
    fn filter_keys(&self) -> Vec<&str> {
        match self {
            Self::Player { uuid, name } => vec![uuid.as_str(), name.as_str()],
            Self::Entity { entity_type } => vec![entity_type.as_str()],
            Self::World { name } => vec![name.as_str()],
            Self::Other { description } => vec![description.as_str(), keys::ENVIRONMENT],
        }
    }
}

impl From<&Player> for Source {
    fn from(player: &Player) -> Self {
        Self::Player {
            uuid: player.uuid.to_string(),
            name: player.name.clone(),
        }
    }
}

impl From<&Entity> for Source {
    fn from(entity: &Entity) -> Self {
        Self::Entity {
            entity_type: entity.entity_type.clone(),
        }
    }
}

impl From<&World> for Source {
    fn from(world: &World) -> Self {
        Self::World {
            name: world.name.clone(),
        }
    }
}

impl From<&CauseObject> for Source {
    fn from(object: &CauseObject) -> Self {
        match object {
            CauseObject::Player(p) => Self::from(p),
            CauseObject::World(w) => Self::from(w),
            CauseObject::Entity(e) => Self::from(e),
            CauseObject::Other { description } => Self::Other {
                description: description.clone(),
            },
        }
    }
}
