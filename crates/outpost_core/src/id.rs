//! Typed identifiers for simulation entities

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Get the raw value
            #[inline]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a hostile agent, stable for the agent's whole lifetime
    AgentId,
    "agent#"
);

numeric_id!(
    /// Identifier of a connected participant
    PlayerId,
    "player#"
);

numeric_id!(
    /// Identifier of a loot drop
    LootId,
    "loot#"
);

/// Identifier of an object in the collision world.
///
/// The variant records which subsystem owns the object, so ids handed out by
/// different owners never collide inside the spatial index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectId {
    /// Static or semi-static world content (buildings, props, barriers)
    World(u64),
    /// A hostile agent's body
    Agent(AgentId),
    /// A loot pickup
    Loot(LootId),
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectId::World(raw) => write!(f, "world#{}", raw),
            ObjectId::Agent(id) => write!(f, "{}", id),
            ObjectId::Loot(id) => write!(f, "{}", id),
        }
    }
}

impl From<AgentId> for ObjectId {
    fn from(id: AgentId) -> Self {
        ObjectId::Agent(id)
    }
}

impl From<LootId> for ObjectId {
    fn from(id: LootId) -> Self {
        ObjectId::Loot(id)
    }
}

/// Sequential id generator
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a generator whose first id is 1
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Generate the next raw id
    pub fn next_raw(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Make sure ids handed out later are strictly greater than `raw`.
    ///
    /// Used after importing externally created entities.
    pub fn advance_past(&self, raw: u64) {
        self.next.fetch_max(raw.saturating_add(1), Ordering::Relaxed);
    }

    /// Peek at the next raw id without consuming it
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").field("next", &self.peek()).finish()
    }
}
