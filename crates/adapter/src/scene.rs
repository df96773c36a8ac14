//! Scene seam - drag items and the host that registers them
//!
//! Rendering is not part of this crate. A [`DragItem`] is the plain data a
//! scene needs to show a draggable block or card; the scene itself is reached
//! through [`SceneHost`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::layout::GridLayout;
use crate::types::Point;

/// Drop animation progress of a spawned item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPhase {
    /// Created above its target, hidden until the drop starts
    Spawning,
    /// Visible and moving toward its target
    Dropping,
    /// At rest on its target
    #[default]
    Settled,
}

/// A draggable wrapper around a block or card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragItem {
    pub item_name: String,
    /// Name of the wrapped block or card
    pub entry_name: String,
    pub x: f64,
    pub y: f64,
    pub z: i32,
    pub width: f64,
    pub height: f64,
    pub visible: bool,
    pub opacity: f64,
    pub animation_enabled_x: bool,
    pub animation_enabled_y: bool,
    pub drop_offset_y: f64,
    pub target_y: f64,
    pub phase: DropPhase,
}

impl DragItem {
    pub fn drop_in_progress(&self) -> bool {
        self.phase != DropPhase::Settled
    }
}

/// What a scene exposes to spawn planning
pub trait SceneHost {
    /// Register a freshly spawned drag item under `name`
    fn add_scene_drag_item(&mut self, name: &str, item: &DragItem);

    /// Top-left pixel of a board cell
    fn cell_position(&self, row: usize, col: usize) -> Point;
}

/// Scene that only records registrations, laid out by a [`GridLayout`]
///
/// Items are stored as copied at registration. A spawned block keeps moving
/// after that, so push its later state back with [`SceneRegistry::refresh`].
#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    layout: GridLayout,
    items: BTreeMap<String, DragItem>,
}

impl SceneRegistry {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            items: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&DragItem> {
        self.items.get(name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Replace the stored copy of an already registered item.
    /// Returns false if `item.item_name` was never registered.
    pub fn refresh(&mut self, item: &DragItem) -> bool {
        match self.items.get_mut(&item.item_name) {
            Some(stored) => {
                stored.clone_from(item);
                true
            }
            None => false,
        }
    }
}

impl SceneHost for SceneRegistry {
    fn add_scene_drag_item(&mut self, name: &str, item: &DragItem) {
        self.items.insert(name.to_string(), item.clone());
    }

    fn cell_position(&self, row: usize, col: usize) -> Point {
        self.layout.cell_position(row, col)
    }
}
