//! Spawn planning - building blocks and cards for a scene
//!
//! A spawned block may drop in from above its target. The drop is an explicit
//! state machine driven by the host:
//!
//! ```text
//! Spawning --begin_drop--> Dropping --(reached target | timer | state change)--> Settled
//! ```
//!
//! Settling is idempotent. It snaps the item to its target and turns an
//! `animating` block back to `idle`.

use log::debug;

use crate::core::{BlockEntry, GridRng, IdGenerator};
use crate::scene::{DragItem, DropPhase, SceneHost};
use crate::types::{BlockColor, BlockState, DEFAULT_BLOCK_COLOR};

/// Drop timer length when none is configured
pub const DEFAULT_DROP_DURATION_MS: u64 = 200;

/// Distance from the target below which a reported position counts as arrived
const ARRIVAL_EPSILON: f64 = 0.5;

/// Horizontal and vertical range of the random placement used when no
/// position is given
const RANDOM_SPREAD: f64 = 300.0;

fn positive_or(value: f64, default: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        default
    }
}

fn prefix_or<'a>(prefix: &'a str, default: &'a str) -> &'a str {
    if prefix.is_empty() {
        default
    } else {
        prefix
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockSpawnOptions {
    pub color: BlockColor,
    pub width: f64,
    pub height: f64,
    /// Target position; random when unset
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: i32,
    pub name_prefix: String,
    pub spawn_from_above: bool,
    /// How far above the target a dropping block starts (defaults to its height)
    pub drop_offset_y: Option<f64>,
    /// Explicit start offset from the target, overriding the drop offset
    pub spawn_offset: Option<f64>,
    pub drop_duration_ms: Option<u64>,
}

impl Default for BlockSpawnOptions {
    fn default() -> Self {
        Self {
            color: BlockColor::from(DEFAULT_BLOCK_COLOR),
            width: 64.0,
            height: 64.0,
            x: None,
            y: None,
            z: 4,
            name_prefix: "block".to_string(),
            spawn_from_above: false,
            drop_offset_y: None,
            spawn_offset: None,
            drop_duration_ms: None,
        }
    }
}

impl BlockSpawnOptions {
    pub fn colored(mut self, color: impl Into<BlockColor>) -> Self {
        self.color = color.into();
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn from_above(mut self) -> Self {
        self.spawn_from_above = true;
        self
    }
}

/// A block and its drag wrapper, as handed to the scene
#[derive(Debug, Clone)]
pub struct SpawnedBlock {
    entry: BlockEntry,
    drag: DragItem,
    drop_duration_ms: u64,
    elapsed_ms: u64,
}

/// Create a block entry plus drag item and register the item with `scene`
pub fn spawn_block<S, I, R>(
    scene: &mut S,
    ids: &mut I,
    rng: &mut R,
    opts: &BlockSpawnOptions,
) -> SpawnedBlock
where
    S: SceneHost + ?Sized,
    I: IdGenerator,
    R: GridRng,
{
    let width = positive_or(opts.width, 64.0);
    let height = positive_or(opts.height, 64.0);
    let x = opts.x.unwrap_or_else(|| rng.next_unit() * RANDOM_SPREAD);
    let y = opts.y.unwrap_or_else(|| -rng.next_unit() * RANDOM_SPREAD);
    let color = if opts.color.is_none() {
        BlockColor::from(DEFAULT_BLOCK_COLOR)
    } else {
        opts.color.clone()
    };

    let drop_offset_y = if opts.spawn_from_above {
        opts.drop_offset_y.unwrap_or(height)
    } else {
        0.0
    };
    let spawn_y = match opts.spawn_offset {
        Some(offset) => y + offset,
        None if opts.spawn_from_above => y - drop_offset_y,
        None => y,
    };

    let prefix = prefix_or(&opts.name_prefix, "block");
    let block_name = ids.next_id(&format!("{}_core", prefix));
    let drag_name = ids.next_id(&format!("{}_drag", prefix));

    let mut entry = BlockEntry::new(color).with_name(block_name.clone());
    let mut drag = DragItem {
        item_name: drag_name,
        entry_name: block_name,
        x,
        y: spawn_y,
        z: opts.z,
        width,
        height,
        visible: true,
        opacity: 1.0,
        animation_enabled_x: true,
        animation_enabled_y: true,
        drop_offset_y,
        target_y: y,
        phase: DropPhase::Settled,
    };

    if opts.spawn_from_above && drop_offset_y != 0.0 {
        drag.visible = false;
        drag.opacity = 0.0;
        drag.phase = DropPhase::Spawning;
        entry.set_block_state(BlockState::Animating);
    }

    scene.add_scene_drag_item(&drag.item_name, &drag);
    debug!(
        "spawned {} at ({}, {}) phase {:?}",
        drag.item_name, drag.x, drag.y, drag.phase
    );

    SpawnedBlock {
        entry,
        drag,
        drop_duration_ms: opts
            .drop_duration_ms
            .map_or(DEFAULT_DROP_DURATION_MS, |ms| ms.max(1)),
        elapsed_ms: 0,
    }
}

impl SpawnedBlock {
    pub fn entry(&self) -> &BlockEntry {
        &self.entry
    }

    pub fn drag(&self) -> &DragItem {
        &self.drag
    }

    pub fn phase(&self) -> DropPhase {
        self.drag.phase
    }

    pub fn is_settled(&self) -> bool {
        self.drag.phase == DropPhase::Settled
    }

    /// Show the item and start moving it toward its target
    pub fn begin_drop(&mut self) {
        if self.drag.phase != DropPhase::Spawning {
            return;
        }
        self.drag.visible = true;
        self.drag.opacity = 1.0;
        self.drag.phase = DropPhase::Dropping;
    }

    /// Record the item's current vertical position; settles on arrival
    pub fn report_y(&mut self, y: f64) -> bool {
        if self.is_settled() {
            return true;
        }
        self.drag.y = y;
        if (y - self.drag.target_y).abs() < ARRIVAL_EPSILON {
            self.settle();
        }
        self.is_settled()
    }

    /// Advance the drop timer; settles once it runs out
    pub fn advance(&mut self, elapsed_ms: u64) -> bool {
        if self.is_settled() {
            return true;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms >= self.drop_duration_ms {
            self.settle();
        }
        self.is_settled()
    }

    /// Change the block's state; leaving `animating` mid-drop settles the drop
    pub fn set_entry_state(&mut self, state: BlockState) {
        self.entry.set_block_state(state);
        if !self.is_settled() && state != BlockState::Animating {
            self.settle();
        }
    }

    /// Finish the drop immediately
    pub fn settle(&mut self) {
        if self.is_settled() {
            return;
        }
        self.drag.visible = true;
        self.drag.opacity = 1.0;
        self.drag.y = self.drag.target_y;
        self.drag.phase = DropPhase::Settled;
        if self.entry.block_state() == BlockState::Animating {
            self.entry.set_block_state(BlockState::Idle);
        }
    }

    /// Move the item onto the scene cell matching the block's row/column
    ///
    /// Returns false if the block's position is negative.
    pub fn snap_to_cell<S: SceneHost + ?Sized>(&mut self, scene: &S) -> bool {
        let (Ok(row), Ok(col)) = (
            usize::try_from(self.entry.row),
            usize::try_from(self.entry.column),
        ) else {
            return false;
        };
        let pos = scene.cell_position(row, col);
        self.drag.x = pos.x;
        self.drag.target_y = pos.y;
        if self.is_settled() {
            self.drag.y = pos.y;
        }
        true
    }

    pub fn into_parts(self) -> (BlockEntry, DragItem) {
        (self.entry, self.drag)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardSpawnOptions {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub z: i32,
    pub name_prefix: String,
    /// Also create a hidden hero preview
    pub hero_preview: bool,
}

impl Default for CardSpawnOptions {
    fn default() -> Self {
        Self {
            width: 180.0,
            height: 220.0,
            x: 0.0,
            y: 0.0,
            z: 5,
            name_prefix: "battleCard".to_string(),
            hero_preview: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroPreview {
    pub name: String,
    pub visible: bool,
}

/// A sidebar card, its drag wrapper and optional hero preview
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedCard {
    pub card_name: String,
    pub drag: DragItem,
    pub hero: Option<HeroPreview>,
}

/// Create a sidebar card and register its drag item with `scene`
pub fn spawn_card<S, I>(scene: &mut S, ids: &mut I, opts: &CardSpawnOptions) -> SpawnedCard
where
    S: SceneHost + ?Sized,
    I: IdGenerator,
{
    let prefix = prefix_or(&opts.name_prefix, "battleCard");
    let card_name = ids.next_id(&format!("{}_entry", prefix));
    let drag_name = ids.next_id(&format!("{}_drag", prefix));

    let drag = DragItem {
        item_name: drag_name,
        entry_name: card_name.clone(),
        x: opts.x,
        y: opts.y,
        z: opts.z,
        width: positive_or(opts.width, 180.0),
        height: positive_or(opts.height, 220.0),
        visible: true,
        opacity: 1.0,
        animation_enabled_x: false,
        animation_enabled_y: false,
        drop_offset_y: 0.0,
        target_y: opts.y,
        phase: DropPhase::Settled,
    };

    let hero = opts.hero_preview.then(|| HeroPreview {
        name: ids.next_id(&format!("{}_hero", prefix)),
        visible: false,
    });

    scene.add_scene_drag_item(&drag.item_name, &drag);

    SpawnedCard {
        card_name,
        drag,
        hero,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SequentialIds, SimpleRng};
    use crate::layout::GridLayout;
    use crate::scene::SceneRegistry;

    fn spawn(opts: BlockSpawnOptions) -> (SceneRegistry, SpawnedBlock) {
        let mut scene = SceneRegistry::default();
        let mut ids = SequentialIds::with_epoch(0);
        let mut rng = SimpleRng::new(1);
        let block = spawn_block(&mut scene, &mut ids, &mut rng, &opts);
        (scene, block)
    }

    #[test]
    fn names_and_registration() {
        let (scene, block) = spawn(BlockSpawnOptions::default().at(0.0, 0.0));
        assert_eq!(block.entry().name(), Some("block_core_0_000"));
        assert_eq!(block.drag().item_name, "block_drag_0_001");
        assert_eq!(block.drag().entry_name, "block_core_0_000");
        assert!(scene.get("block_drag_0_001").is_some());
        assert_eq!(block.drag().z, 4);
    }

    #[test]
    fn plain_spawn_is_settled_at_target() {
        let (_, block) = spawn(BlockSpawnOptions::default().at(10.0, 100.0));
        assert!(block.is_settled());
        assert_eq!(block.drag().y, 100.0);
        assert_eq!(block.entry().block_state(), BlockState::Idle);
    }

    #[test]
    fn drop_from_above_starts_hidden_one_height_up() {
        let (scene, block) = spawn(BlockSpawnOptions::default().at(10.0, 100.0).from_above());
        assert_eq!(block.phase(), DropPhase::Spawning);
        assert_eq!(block.drag().y, 36.0);
        assert!(!block.drag().visible);
        assert_eq!(block.entry().block_state(), BlockState::Animating);
        // The scene sees the item as registered, mid-spawn
        assert!(scene.get(&block.drag().item_name).unwrap().drop_in_progress());
    }

    #[test]
    fn spawn_offset_overrides_drop_offset() {
        let opts = BlockSpawnOptions {
            spawn_offset: Some(-20.0),
            drop_offset_y: Some(50.0),
            ..BlockSpawnOptions::default().at(0.0, 100.0).from_above()
        };
        let (_, block) = spawn(opts);
        assert_eq!(block.drag().y, 80.0);
        assert_eq!(block.drag().drop_offset_y, 50.0);
    }

    #[test]
    fn zero_drop_offset_does_not_animate() {
        let opts = BlockSpawnOptions {
            drop_offset_y: Some(0.0),
            ..BlockSpawnOptions::default().at(0.0, 100.0).from_above()
        };
        let (_, block) = spawn(opts);
        assert!(block.is_settled());
        assert_eq!(block.entry().block_state(), BlockState::Idle);
    }

    #[test]
    fn arrival_settles_the_drop() {
        let (_, mut block) = spawn(BlockSpawnOptions::default().at(0.0, 100.0).from_above());
        block.begin_drop();
        assert_eq!(block.phase(), DropPhase::Dropping);
        assert!(block.drag().visible);

        assert!(!block.report_y(90.0));
        assert!(block.report_y(99.7));
        assert_eq!(block.drag().y, 100.0);
        assert_eq!(block.entry().block_state(), BlockState::Idle);
    }

    #[test]
    fn timer_settles_the_drop() {
        let (_, mut block) = spawn(BlockSpawnOptions::default().at(0.0, 100.0).from_above());
        assert!(!block.advance(150));
        assert!(block.advance(50));
        assert_eq!(block.entry().block_state(), BlockState::Idle);
        // settling again changes nothing
        block.settle();
        assert!(block.is_settled());
    }

    #[test]
    fn leaving_animating_settles_but_keeps_new_state() {
        let (_, mut block) = spawn(BlockSpawnOptions::default().at(0.0, 100.0).from_above());
        block.set_entry_state(BlockState::Launch);
        assert!(block.is_settled());
        assert_eq!(block.entry().block_state(), BlockState::Launch);
    }

    #[test]
    fn random_placement_stays_in_range() {
        let (_, block) = spawn(BlockSpawnOptions::default());
        let drag = block.drag();
        assert!((0.0..300.0).contains(&drag.x));
        assert!(drag.y <= 0.0 && drag.y > -300.0);
    }

    #[test]
    fn snap_to_cell_follows_layout() {
        let scene = SceneRegistry::new(GridLayout::default());
        let (_, mut block) = spawn(BlockSpawnOptions::default().at(0.0, 0.0));
        let (mut entry, _) = block.clone().into_parts();
        entry.row = 1;
        entry.column = 2;
        block.entry = entry;

        assert!(block.snap_to_cell(&scene));
        assert_eq!((block.drag().x, block.drag().y), (144.0, 72.0));

        block.entry.row = -1;
        assert!(!block.snap_to_cell(&scene));
    }

    #[test]
    fn card_with_hero_preview() {
        let mut scene = SceneRegistry::default();
        let mut ids = SequentialIds::with_epoch(0);
        let opts = CardSpawnOptions {
            hero_preview: true,
            ..CardSpawnOptions::default()
        };
        let card = spawn_card(&mut scene, &mut ids, &opts);

        assert_eq!(card.card_name, "battleCard_entry_0_000");
        assert_eq!(card.drag.item_name, "battleCard_drag_0_001");
        assert_eq!(card.drag.z, 5);
        assert!(!card.drag.animation_enabled_y);
        let hero = card.hero.unwrap();
        assert_eq!(hero.name, "battleCard_hero_0_002");
        assert!(!hero.visible);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn card_without_hero() {
        let mut scene = SceneRegistry::default();
        let mut ids = SequentialIds::with_epoch(0);
        let card = spawn_card(&mut scene, &mut ids, &CardSpawnOptions::default());
        assert!(card.hero.is_none());
        assert_eq!((card.drag.width, card.drag.height), (180.0, 220.0));
    }
}
