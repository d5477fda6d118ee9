//! Scene controller.
//!
//! The scene owns the modifiable and modifier collections and the operation
//! manager that mutates them. Every change goes through an operation; when an
//! operation completes the scene revalidates attachments and recomputes
//! proximity. Dragging a block recomputes proximity on every pointer move but
//! records a single move operation when the pointer is released.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use blockscape_core::types::{thread_safe, thread_safe_rw, ThreadSafe, ThreadSafeRw};
use blockscape_core::{
    AppEvent, BlockId, EventBus, EventCategory, EventFilter, OperationEvent, ParamError, Point,
    SceneError, SceneEvent, SubscriptionId,
};
use blockscape_operations::{
    AddToCollection, Entity, EntityCollection, EntityRef, HistorySnapshot, MovePointOperation,
    OperationInfo, OperationManager, OperationManagerConfig, RemoveFromCollection,
    SetParamOperation,
};
use rand::Rng;

use crate::block::{Block, Modifiable, Modifier};
use crate::blocks::effect::DEFAULT_CATCHMENT_AREA;
use crate::params::{ParamName, ParamSpec};
use crate::proximity::{self, ProximityReport};

/// Scene configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Canvas width; the reference dimension for catchment radii.
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Pointer hit-test radius in canvas units.
    pub hit_radius: f64,
    /// Catchment area given to new modifiers unless overridden.
    pub default_catchment_area: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1000.0,
            canvas_height: 600.0,
            hit_radius: 24.0,
            default_catchment_area: DEFAULT_CATCHMENT_AREA,
        }
    }
}

/// Handle to a block of either role.
#[derive(Clone)]
pub enum BlockRef {
    Modifiable(EntityRef<dyn Modifiable>),
    Modifier(EntityRef<dyn Modifier>),
}

impl BlockRef {
    fn with<R>(&self, f: impl FnOnce(&dyn Block) -> R) -> R {
        match self {
            BlockRef::Modifiable(b) => f(&*b.read()),
            BlockRef::Modifier(b) => f(&*b.read()),
        }
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut dyn Block) -> R) -> R {
        match self {
            BlockRef::Modifiable(b) => f(&mut *b.write()),
            BlockRef::Modifier(b) => f(&mut *b.write()),
        }
    }

    pub fn id(&self) -> BlockId {
        self.with(|b| b.id())
    }

    pub fn name(&self) -> String {
        self.with(|b| b.name().to_string())
    }

    pub fn position(&self) -> Point {
        self.with(|b| b.position())
    }

    pub fn set_position(&self, position: Point) {
        self.with_mut(|b| b.set_position(position))
    }

    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        self.with(|b| b.hit_test(point, radius))
    }

    pub fn params(&self) -> Vec<ParamSpec> {
        self.with(|b| b.params())
    }

    pub fn param(&self, name: ParamName) -> Result<f64, ParamError> {
        self.with(|b| b.param(name))
    }

    pub fn set_param(&self, name: ParamName, value: f64) -> Result<(), ParamError> {
        self.with_mut(|b| b.set_param(name, value))
    }

    pub fn is_modifier(&self) -> bool {
        matches!(self, BlockRef::Modifier(_))
    }

    fn selected_event(&self) -> SceneEvent {
        let id = self.id();
        match self {
            BlockRef::Modifiable(_) => SceneEvent::ModifiableSelected { id },
            BlockRef::Modifier(_) => SceneEvent::ModifierSelected { id },
        }
    }
}

impl std::fmt::Debug for BlockRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = if self.is_modifier() { "Modifier" } else { "Modifiable" };
        write!(f, "{}({} {})", role, self.name(), self.id())
    }
}

/// An in-progress pointer drag.
struct Drag {
    block: BlockRef,
    origin: Point,
    grab_dx: f64,
    grab_dy: f64,
}

impl Drag {
    /// Block position for a pointer at `point`, keeping the grab offset.
    fn target(&self, point: Point) -> Point {
        point.offset(-self.grab_dx, -self.grab_dy)
    }
}

/// Recomputes attachments and publishes the transitions.
#[derive(Clone)]
struct Invalidator {
    modifiables: EntityCollection<dyn Modifiable>,
    modifiers: EntityCollection<dyn Modifier>,
    config: ThreadSafeRw<SceneConfig>,
    bus: Weak<EventBus>,
}

impl Invalidator {
    fn invalidate(&self) -> ProximityReport {
        let width = self.config.read().canvas_width;
        let report = proximity::invalidate(&self.modifiables, &self.modifiers, width);
        self.publish(&report);
        report
    }

    fn check_proximity(&self) -> ProximityReport {
        let width = self.config.read().canvas_width;
        let report = proximity::check_proximity(&self.modifiables, &self.modifiers, width);
        self.publish(&report);
        report
    }

    fn publish(&self, report: &ProximityReport) {
        if report.is_empty() {
            return;
        }
        tracing::debug!(
            "Proximity: {} attached, {} detached",
            report.attached.len(),
            report.detached.len()
        );
        if let Some(bus) = self.bus.upgrade() {
            for event in report.events() {
                bus.publish(AppEvent::Scene(event)).ok();
            }
        }
    }
}

/// The editable block graph.
pub struct Scene {
    modifiables: EntityCollection<dyn Modifiable>,
    modifiers: EntityCollection<dyn Modifier>,
    config: ThreadSafeRw<SceneConfig>,
    operations: OperationManager,
    invalidator: Invalidator,
    bus: Arc<EventBus>,
    subscription: SubscriptionId,
    next_id: AtomicU64,
    selection: ThreadSafeRw<Option<BlockRef>>,
    drag: ThreadSafe<Option<Drag>>,
}

impl Scene {
    /// Creates an empty scene and starts its operation manager. Must be
    /// called from within a Tokio runtime.
    pub fn new(config: SceneConfig, history: OperationManagerConfig, bus: Arc<EventBus>) -> Arc<Self> {
        let modifiables: EntityCollection<dyn Modifiable> = EntityCollection::new();
        let modifiers: EntityCollection<dyn Modifier> = EntityCollection::new();
        let config = thread_safe_rw(config);

        let invalidator = Invalidator {
            modifiables: modifiables.clone(),
            modifiers: modifiers.clone(),
            config: config.clone(),
            bus: Arc::downgrade(&bus),
        };

        // Completed is published by the worker before the caller's future
        // resolves, so attachments are current once an operation returns.
        let on_complete = invalidator.clone();
        let subscription = bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Operation]),
            move |event| {
                if let AppEvent::Operation(OperationEvent::Completed { .. }) = event {
                    on_complete.invalidate();
                }
            },
        );

        let operations = OperationManager::spawn(history, bus.clone());
        tracing::debug!("Scene created");

        Arc::new(Self {
            modifiables,
            modifiers,
            config,
            operations,
            invalidator,
            bus,
            subscription,
            next_id: AtomicU64::new(0),
            selection: thread_safe_rw(None),
            drag: thread_safe(None),
        })
    }

    /// Adds a modifiable block at a random canvas position.
    ///
    /// `build` receives the new block's id and position.
    pub async fn create_modifiable<B, F>(&self, build: F) -> Result<BlockId, SceneError>
    where
        B: Modifiable + 'static,
        F: FnOnce(BlockId, Point) -> B + Send,
    {
        let position = self.random_position();
        self.create_modifiable_at(build, position).await
    }

    /// Adds a modifiable block at `position`.
    pub async fn create_modifiable_at<B, F>(&self, build: F, position: Point) -> Result<BlockId, SceneError>
    where
        B: Modifiable + 'static,
        F: FnOnce(BlockId, Point) -> B + Send,
    {
        let id = self.next_block_id();
        let block: EntityRef<dyn Modifiable> = thread_safe_rw(build(id, position));
        let name = format!("Add {}", block.read().name());
        self.operations
            .execute(AddToCollection::new(block, self.modifiables.clone()).with_name(name))
            .await?;
        Ok(id)
    }

    /// Adds a modifier block at a random canvas position.
    pub async fn create_modifier<B, F>(&self, build: F) -> Result<BlockId, SceneError>
    where
        B: Modifier + 'static,
        F: FnOnce(BlockId, Point) -> B + Send,
    {
        let position = self.random_position();
        self.create_modifier_at(build, position).await
    }

    /// Adds a modifier block at `position`.
    pub async fn create_modifier_at<B, F>(&self, build: F, position: Point) -> Result<BlockId, SceneError>
    where
        B: Modifier + 'static,
        F: FnOnce(BlockId, Point) -> B + Send,
    {
        let id = self.next_block_id();
        let block: EntityRef<dyn Modifier> = thread_safe_rw(build(id, position));
        let name = format!("Add {}", block.read().name());
        self.operations
            .execute(AddToCollection::new(block, self.modifiers.clone()).with_name(name))
            .await?;
        Ok(id)
    }

    /// Selects a block by id and publishes the matching selection event.
    pub fn select(&self, id: BlockId) -> Result<(), SceneError> {
        let block = self.block(id).ok_or(SceneError::BlockNotFound { id })?;
        self.set_selection(block);
        Ok(())
    }

    pub fn clear_selection(&self) {
        let previous = self.selection.write().take();
        if previous.is_some() {
            self.bus.publish(AppEvent::Scene(SceneEvent::SelectionCleared)).ok();
        }
    }

    pub fn selected(&self) -> Option<BlockId> {
        self.selection.read().as_ref().map(BlockRef::id)
    }

    /// Pointer pressed. Selects the topmost block under `point` and starts
    /// dragging it; clears the selection when nothing is hit.
    pub fn mouse_down(&self, point: Point) -> Option<BlockId> {
        let radius = self.config.read().hit_radius;
        // Modifiers are drawn over modifiables, later blocks over earlier ones.
        let hit = self
            .modifiers
            .snapshot()
            .into_iter()
            .rev()
            .map(BlockRef::Modifier)
            .chain(
                self.modifiables
                    .snapshot()
                    .into_iter()
                    .rev()
                    .map(BlockRef::Modifiable),
            )
            .find(|block| block.hit_test(point, radius));

        let Some(block) = hit else {
            self.drag.lock().take();
            self.clear_selection();
            return None;
        };

        let origin = block.position();
        let id = block.id();
        *self.drag.lock() = Some(Drag {
            block: block.clone(),
            origin,
            grab_dx: point.x - origin.x,
            grab_dy: point.y - origin.y,
        });
        self.set_selection(block);
        Some(id)
    }

    /// Pointer moved. Drags the pressed block and recomputes proximity.
    /// Nothing is recorded in history until [`mouse_up`](Self::mouse_up).
    pub fn mouse_move(&self, point: Point) -> ProximityReport {
        let moved = self
            .drag
            .lock()
            .as_ref()
            .map(|drag| (drag.block.clone(), drag.target(point)));
        let Some((block, target)) = moved else {
            return ProximityReport::default();
        };
        block.set_position(target);
        self.invalidator.check_proximity()
    }

    /// Pointer released. Records one move operation from where the drag
    /// started to where it ended. Returns `None` when nothing was dragged or
    /// the block ended where it started.
    pub async fn mouse_up(&self, point: Point) -> Result<Option<OperationInfo>, SceneError> {
        let drag = self.drag.lock().take();
        let Some(drag) = drag else {
            return Ok(None);
        };
        let id = drag.block.id();
        if self.block(id).is_none() {
            return Err(SceneError::BlockNotFound { id });
        }
        let target = drag.target(point);
        drag.block.set_position(target);
        if target == drag.origin {
            return Ok(None);
        }

        let name = format!("Move {}", drag.block.name());
        let block = drag.block;
        let operation =
            MovePointOperation::new(name, move |p| block.set_position(p), drag.origin, target);
        Ok(Some(self.operations.execute(operation).await?))
    }

    /// Moves a block through history, as if it had been dragged.
    ///
    /// The position undo restores is the one the block has when the move
    /// runs, after any moves queued before it.
    pub async fn move_block(&self, id: BlockId, to: Point) -> Result<OperationInfo, SceneError> {
        let block = self.block(id).ok_or(SceneError::BlockNotFound { id })?;
        let name = format!("Move {}", block.name());
        let current = block.clone();
        let operation = MovePointOperation::capturing(
            name,
            move || current.position(),
            move |p| block.set_position(p),
            to,
        );
        Ok(self.operations.execute(operation).await?)
    }

    /// Removes the selected block and clears the selection.
    pub async fn delete_selected(&self) -> Result<OperationInfo, SceneError> {
        let selected = self.selection.read().clone();
        let block = selected.ok_or(SceneError::NoSelection)?;
        let id = block.id();
        let name = format!("Remove {}", block.name());

        let info = match block {
            BlockRef::Modifiable(b) => {
                self.operations
                    .execute(RemoveFromCollection::new(b, self.modifiables.clone()).with_name(name))
                    .await?
            }
            BlockRef::Modifier(b) => {
                self.operations
                    .execute(RemoveFromCollection::new(b, self.modifiers.clone()).with_name(name))
                    .await?
            }
        };

        let mut drag = self.drag.lock();
        if drag.as_ref().is_some_and(|d| d.block.id() == id) {
            drag.take();
        }
        drop(drag);
        self.clear_selection();
        Ok(info)
    }

    /// Reverts the last change. `None` when there is nothing to undo.
    pub async fn undo(&self) -> Result<Option<OperationInfo>, SceneError> {
        let info = self.operations.undo().await?;
        self.drop_stale_selection();
        Ok(info)
    }

    /// Reapplies the last undone change. `None` when there is nothing to redo.
    pub async fn redo(&self) -> Result<Option<OperationInfo>, SceneError> {
        let info = self.operations.redo().await?;
        self.drop_stale_selection();
        Ok(info)
    }

    /// Changes a block parameter through history. `key` is parsed with
    /// [`ParamName::from_key`].
    pub async fn set_param(&self, id: BlockId, key: &str, value: f64) -> Result<OperationInfo, SceneError> {
        let block = self.block(id).ok_or(SceneError::BlockNotFound { id })?;
        let block_name = block.name();
        let name = ParamName::from_key(key).ok_or_else(|| ParamError::UnknownParameter {
            block: block_name.clone(),
            param: key.to_string(),
        })?;
        // Fails early on parameters the block does not have.
        block.param(name)?;

        let current = block.clone();
        let operation = SetParamOperation::capturing(
            format!("Set {} {}", block_name, name),
            move || current.param(name),
            move |v| block.set_param(name, v),
            value,
        );
        Ok(self.operations.execute(operation).await?)
    }

    /// Current parameter values of a block.
    pub fn params(&self, id: BlockId) -> Result<Vec<ParamSpec>, SceneError> {
        let block = self.block(id).ok_or(SceneError::BlockNotFound { id })?;
        Ok(block.params())
    }

    /// Resizes the canvas. Catchment radii scale with the width, so
    /// attachments are recomputed.
    pub fn set_canvas_size(&self, width: f64, height: f64) -> Result<ProximityReport, SceneError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SceneError::InvalidCanvas { width, height });
        }
        {
            let mut config = self.config.write();
            config.canvas_width = width;
            config.canvas_height = height;
        }
        Ok(self.invalidator.invalidate())
    }

    /// Revalidates attachments against the current modifier set and
    /// recomputes proximity for every pair.
    pub fn invalidate(&self) -> ProximityReport {
        self.invalidator.invalidate()
    }

    /// Looks a block up in either collection.
    pub fn block(&self, id: BlockId) -> Option<BlockRef> {
        self.modifiables
            .get(id)
            .map(BlockRef::Modifiable)
            .or_else(|| self.modifiers.get(id).map(BlockRef::Modifier))
    }

    /// Modifiers attached to a modifiable, in attachment order.
    pub fn attached_modifiers(&self, id: BlockId) -> Result<Vec<BlockId>, SceneError> {
        let block = self
            .modifiables
            .get(id)
            .ok_or(SceneError::BlockNotFound { id })?;
        let modifiers = block.read().modifiers().to_vec();
        Ok(modifiers)
    }

    pub fn modifiables(&self) -> &EntityCollection<dyn Modifiable> {
        &self.modifiables
    }

    pub fn modifiers(&self) -> &EntityCollection<dyn Modifier> {
        &self.modifiers
    }

    pub fn config(&self) -> SceneConfig {
        self.config.read().clone()
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Undo/redo history as of every request queued so far.
    pub async fn history(&self) -> Result<HistorySnapshot, SceneError> {
        Ok(self.operations.snapshot().await?)
    }

    fn next_block_id(&self) -> BlockId {
        BlockId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn random_position(&self) -> Point {
        let (width, height) = {
            let config = self.config.read();
            (config.canvas_width, config.canvas_height)
        };
        let extent = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let mut rng = rand::thread_rng();
        Point::new(
            rng.gen_range(0.0..=extent(width)),
            rng.gen_range(0.0..=extent(height)),
        )
    }

    fn set_selection(&self, block: BlockRef) {
        let event = block.selected_event();
        *self.selection.write() = Some(block);
        self.bus.publish(AppEvent::Scene(event)).ok();
    }

    /// Clears the selection and any drag whose block left the scene.
    fn drop_stale_selection(&self) {
        let mut drag = self.drag.lock();
        if drag.as_ref().is_some_and(|d| self.block(d.block.id()).is_none()) {
            drag.take();
        }
        drop(drag);

        let stale = self
            .selection
            .read()
            .as_ref()
            .is_some_and(|block| self.block(block.id()).is_none());
        if stale {
            self.clear_selection();
        }
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscription);
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("modifiables", &self.modifiables.len())
            .field("modifiers", &self.modifiers.len())
            .field("selected", &self.selected())
            .finish()
    }
}
