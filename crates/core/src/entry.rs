//! Entry module - a single block sitting in a grid cell
//!
//! Optional behaviour (custom serialization, state-change notification) is
//! attached once when the entry is built and stored in [`EntryCapabilities`].

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::types::{BlockColor, BlockState, DEFAULT_HEALTH};

/// Custom record producer for entries that persist more than the defaults
pub type SerializeFn = Rc<dyn Fn(&BlockEntry) -> BlockRecord>;

/// Called after a state change with the updated entry and the previous state
pub type StateListener = Rc<dyn Fn(&BlockEntry, BlockState)>;

/// Links between a block and a hero bound to the board
///
/// Any set field exempts the cell from idle checks and color matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeroLink {
    pub powerup_hero_linked: bool,
    pub hero_linked: bool,
    pub hero_binding_key: Option<String>,
    pub powerup_hero_uuid: Option<String>,
}

impl HeroLink {
    /// Link through a hero binding key
    pub fn bound(key: impl Into<String>) -> Self {
        Self {
            hero_binding_key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn is_linked(&self) -> bool {
        let non_empty = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.is_empty());
        self.powerup_hero_linked
            || self.hero_linked
            || non_empty(&self.hero_binding_key)
            || non_empty(&self.powerup_hero_uuid)
    }
}

/// Persisted form of a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub block_color: BlockColor,
    pub row: i32,
    pub column: i32,
    pub health: i32,
    /// Fields contributed by custom serializers
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Optional behaviour an entry supports
#[derive(Clone, Default)]
pub struct EntryCapabilities {
    serializer: Option<SerializeFn>,
    state_listener: Option<StateListener>,
}

impl EntryCapabilities {
    pub fn can_serialize(&self) -> bool {
        self.serializer.is_some()
    }

    pub fn notifies_state_changes(&self) -> bool {
        self.state_listener.is_some()
    }
}

impl fmt::Debug for EntryCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryCapabilities")
            .field("serializer", &self.can_serialize())
            .field("state_listener", &self.notifies_state_changes())
            .finish()
    }
}

/// A block occupying a grid cell
///
/// `row`/`column` are what the block believes its position is; the matrix
/// slot holding it is authoritative and the two may disagree mid-animation.
#[derive(Debug, Clone)]
pub struct BlockEntry {
    pub block_color: BlockColor,
    block_state: BlockState,
    pub row: i32,
    pub column: i32,
    pub health: i32,
    pub item_name: Option<String>,
    pub hero: HeroLink,
    capabilities: EntryCapabilities,
}

impl BlockEntry {
    /// Create an idle, unnamed entry at (0, 0)
    pub fn new(color: impl Into<BlockColor>) -> Self {
        Self {
            block_color: color.into(),
            block_state: BlockState::Idle,
            row: 0,
            column: 0,
            health: DEFAULT_HEALTH,
            item_name: None,
            hero: HeroLink::default(),
            capabilities: EntryCapabilities::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.item_name = Some(name.into());
        self
    }

    pub fn at(mut self, row: i32, column: i32) -> Self {
        self.row = row;
        self.column = column;
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    /// Set the initial state without notifying listeners
    pub fn with_state(mut self, state: BlockState) -> Self {
        self.block_state = state;
        self
    }

    pub fn with_hero(mut self, hero: HeroLink) -> Self {
        self.hero = hero;
        self
    }

    pub fn with_serializer<F>(mut self, serializer: F) -> Self
    where
        F: Fn(&BlockEntry) -> BlockRecord + 'static,
    {
        self.capabilities.serializer = Some(Rc::new(serializer));
        self
    }

    pub fn with_state_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&BlockEntry, BlockState) + 'static,
    {
        self.capabilities.state_listener = Some(Rc::new(listener));
        self
    }

    pub fn block_state(&self) -> BlockState {
        self.block_state
    }

    /// Change the state, notifying the listener if the value actually changed
    pub fn set_block_state(&mut self, state: BlockState) {
        if self.block_state == state {
            return;
        }
        let previous = self.block_state;
        self.block_state = state;
        if let Some(listener) = &self.capabilities.state_listener {
            listener(self, previous);
        }
    }

    pub fn capabilities(&self) -> &EntryCapabilities {
        &self.capabilities
    }

    /// Non-empty item name, if any
    pub fn name(&self) -> Option<&str> {
        self.item_name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn is_hero_linked(&self) -> bool {
        self.hero.is_linked()
    }

    /// Color used for run detection, ignoring hero exemption
    pub fn match_color(&self) -> Option<&BlockColor> {
        self.block_color.as_match_color()
    }

    /// `{block_color, row, column, health}` without consulting capabilities
    pub fn default_record(&self) -> BlockRecord {
        BlockRecord {
            block_color: self.block_color.clone(),
            row: self.row,
            column: self.column,
            health: self.health,
            extra: BTreeMap::new(),
        }
    }

    /// Persisted form, using the custom serializer when one is attached
    pub fn to_record(&self) -> BlockRecord {
        match &self.capabilities.serializer {
            Some(serializer) => serializer(self),
            None => self.default_record(),
        }
    }
}
