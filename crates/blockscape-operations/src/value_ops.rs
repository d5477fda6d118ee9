//! Operations that swap a single property between an old and a new value.
//!
//! The old value is either given up front or read from the target the first
//! time the operation is applied. Reading it on apply keeps undo exact when
//! several changes to the same property are queued before any of them runs.

use async_trait::async_trait;
use blockscape_core::{OperationError, ParamError, Point};

use crate::operation::Operation;

type PointSetter = Box<dyn Fn(Point) + Send + Sync>;
type PointGetter = Box<dyn Fn() -> Point + Send + Sync>;
type ParamSetter = Box<dyn Fn(f64) -> Result<(), ParamError> + Send + Sync>;
type ParamGetter = Box<dyn Fn() -> Result<f64, ParamError> + Send + Sync>;

/// Moves a point-valued property from `old` to `new`.
///
/// Constructing with `old == new` is allowed; the operation is then a no-op
/// that still occupies a history slot.
pub struct MovePointOperation {
    name: String,
    setter: PointSetter,
    getter: Option<PointGetter>,
    old: Option<Point>,
    new: Point,
}

impl MovePointOperation {
    pub fn new<F>(name: impl Into<String>, setter: F, old: Point, new: Point) -> Self
    where
        F: Fn(Point) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            setter: Box::new(setter),
            getter: None,
            old: Some(old),
            new,
        }
    }

    /// Like [`new`](Self::new), but the old value is read through `getter`
    /// when the operation is first applied.
    pub fn capturing<G, F>(name: impl Into<String>, getter: G, setter: F, new: Point) -> Self
    where
        G: Fn() -> Point + Send + Sync + 'static,
        F: Fn(Point) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            setter: Box::new(setter),
            getter: Some(Box::new(getter)),
            old: None,
            new,
        }
    }

    /// The value undo restores. `None` until a capturing operation has run.
    pub fn old(&self) -> Option<Point> {
        self.old
    }

    pub fn new_value(&self) -> Point {
        self.new
    }

    /// True when applying changes nothing.
    pub fn is_noop(&self) -> bool {
        self.old == Some(self.new)
    }
}

#[async_trait]
impl Operation for MovePointOperation {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&mut self) -> Result<(), OperationError> {
        if self.old.is_none() {
            self.old = self.getter.as_ref().map(|get| get());
        }
        (self.setter)(self.new);
        Ok(())
    }

    async fn undo(&mut self) -> Result<(), OperationError> {
        let old = self.old.ok_or_else(|| OperationError::NotApplied {
            operation: self.name.clone(),
        })?;
        (self.setter)(old);
        Ok(())
    }
}

/// Changes a named numeric parameter from `old` to `new`.
///
/// The setter validates the value; a rejected value fails the operation and
/// leaves the parameter untouched.
pub struct SetParamOperation {
    name: String,
    setter: ParamSetter,
    getter: Option<ParamGetter>,
    old: Option<f64>,
    new: f64,
}

impl SetParamOperation {
    pub fn new<F>(name: impl Into<String>, setter: F, old: f64, new: f64) -> Self
    where
        F: Fn(f64) -> Result<(), ParamError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            setter: Box::new(setter),
            getter: None,
            old: Some(old),
            new,
        }
    }

    /// Like [`new`](Self::new), but the old value is read through `getter`
    /// when the operation is first applied.
    pub fn capturing<G, F>(name: impl Into<String>, getter: G, setter: F, new: f64) -> Self
    where
        G: Fn() -> Result<f64, ParamError> + Send + Sync + 'static,
        F: Fn(f64) -> Result<(), ParamError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            setter: Box::new(setter),
            getter: Some(Box::new(getter)),
            old: None,
            new,
        }
    }

    pub fn old(&self) -> Option<f64> {
        self.old
    }
}

#[async_trait]
impl Operation for SetParamOperation {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&mut self) -> Result<(), OperationError> {
        let old = match (self.old, &self.getter) {
            (Some(old), _) => Some(old),
            (None, Some(get)) => Some(get()?),
            (None, None) => None,
        };
        (self.setter)(self.new)?;
        self.old = old;
        Ok(())
    }

    async fn undo(&mut self) -> Result<(), OperationError> {
        let old = self.old.ok_or_else(|| OperationError::NotApplied {
            operation: self.name.clone(),
        })?;
        (self.setter)(old)?;
        Ok(())
    }
}
