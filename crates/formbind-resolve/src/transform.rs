//! Caller-supplied post-assembly transformations for hybrid mappings.

use std::collections::BTreeMap;
use std::fmt;

use formbind_model::TransformKind;
use serde_json::Value;

use crate::error::Result;

/// Handler for one [`TransformKind`].
///
/// Hybrid mappings apply their transformations in listed order, each handler
/// receiving the output of the previous one.
pub trait Transform: Send + Sync {
    fn kind(&self) -> TransformKind;

    /// Transforms the assembled value. `params` is the transformation's
    /// `params` object, `null` when absent.
    ///
    /// # Errors
    ///
    /// Implementations return [`ResolveError::Transform`](crate::ResolveError::Transform)
    /// when the value or params are unusable.
    fn apply(&self, value: Value, params: &Value) -> Result<Value>;
}

/// Adapts a closure into a [`Transform`].
pub struct FnTransform<F> {
    kind: TransformKind,
    f: F,
}

impl<F> FnTransform<F>
where
    F: Fn(Value, &Value) -> Result<Value> + Send + Sync,
{
    pub fn new(kind: TransformKind, f: F) -> Self {
        Self { kind, f }
    }
}

impl<F> Transform for FnTransform<F>
where
    F: Fn(Value, &Value) -> Result<Value> + Send + Sync,
{
    fn kind(&self) -> TransformKind {
        self.kind
    }

    fn apply(&self, value: Value, params: &Value) -> Result<Value> {
        (self.f)(value, params)
    }
}

/// Transformation handlers indexed by kind.
///
/// The registry starts empty; no kind has built-in semantics.
#[derive(Default)]
pub struct TransformRegistry {
    handlers: BTreeMap<TransformKind, Box<dyn Transform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for its kind, replacing any earlier one.
    pub fn register(&mut self, handler: Box<dyn Transform>) {
        self.handlers.insert(handler.kind(), handler);
    }

    pub fn register_fn<F>(&mut self, kind: TransformKind, f: F)
    where
        F: Fn(Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.register(Box::new(FnTransform::new(kind, f)));
    }

    pub fn with_fn<F>(mut self, kind: TransformKind, f: F) -> Self
    where
        F: Fn(Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.register_fn(kind, f);
        self
    }

    pub fn get(&self, kind: TransformKind) -> Option<&dyn Transform> {
        self.handlers.get(&kind).map(|handler| handler.as_ref())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = TransformKind> + '_ {
        self.handlers.keys().copied()
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.kinds().map(TransformKind::as_str))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn later_registration_replaces_earlier() {
        let registry = TransformRegistry::new()
            .with_fn(TransformKind::Format, |_, _| Ok(json!(1)))
            .with_fn(TransformKind::Format, |_, _| Ok(json!(2)));

        assert_eq!(registry.len(), 1);
        let handler = registry.get(TransformKind::Format).unwrap();
        assert_eq!(handler.apply(Value::Null, &Value::Null).unwrap(), json!(2));
        assert!(registry.get(TransformKind::Filter).is_none());
    }

    #[test]
    fn debug_lists_kinds() {
        let registry = TransformRegistry::new()
            .with_fn(TransformKind::Filter, |value, _| Ok(value))
            .with_fn(TransformKind::Aggregate, |value, _| Ok(value));
        assert_eq!(format!("{registry:?}"), r#"{"filter", "aggregate"}"#);
    }
}
