//! Module: adapter
//! Responsibility: conversion between model field types and SQLite storage primitives.
//! Does not own: column naming or nullability, which the generated adapters decide.
//!
//! Invariants:
//! - At most one adapter is registered per deserialized type; a later
//!   registration replaces the earlier one.
//! - `None` always maps to `None` in both directions.

mod builtin;


pub use builtin::{BoolAdapter, DateTimeAdapter, NaiveDateAdapter, SystemTimeAdapter};

use crate::Error;
use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    fmt,
    sync::Arc,
};
use thiserror::Error as ThisError;

///
/// TypeAdapterError
///

#[derive(Debug, ThisError)]
pub enum TypeAdapterError {
    #[error("stored value {value} is out of range for '{type_name}'")]
    OutOfRange {
        type_name: &'static str,
        value: String,
    },

    #[error("cannot deserialize '{type_name}': {message}")]
    Invalid {
        type_name: &'static str,
        message: String,
    },
}

impl TypeAdapterError {
    pub fn out_of_range<D>(value: impl fmt::Display) -> Self {
        Self::OutOfRange {
            type_name: type_name::<D>(),
            value: value.to_string(),
        }
    }

    pub fn invalid<D>(message: impl Into<String>) -> Self {
        Self::Invalid {
            type_name: type_name::<D>(),
            message: message.into(),
        }
    }
}

///
/// TypeAdapter
///
/// Maps a deserialized type `D` onto a storage primitive `S`
/// (`i64`, `f64`, `String` or `Vec<u8>`).
///

pub trait TypeAdapter<D, S>: Send + Sync {
    fn serialize(&self, value: &D) -> S;

    fn deserialize(&self, value: S) -> Result<D, TypeAdapterError>;

    fn serialize_nullable(&self, value: Option<&D>) -> Option<S> {
        value.map(|value| self.serialize(value))
    }

    fn deserialize_nullable(&self, value: Option<S>) -> Result<Option<D>, TypeAdapterError> {
        value.map(|value| self.deserialize(value)).transpose()
    }
}

///
/// TypeAdapters
///
/// Runtime table of adapters keyed by the deserialized type.
///

pub struct TypeAdapters {
    adapters: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl TypeAdapters {
    /// Empty table without the built-in adapters.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Table preloaded with the built-in adapters.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut adapters = Self::empty();
        adapters.register::<bool, i64, _>(BoolAdapter);
        adapters.register::<std::time::SystemTime, i64, _>(SystemTimeAdapter);
        adapters.register::<chrono::DateTime<chrono::Utc>, i64, _>(DateTimeAdapter);
        adapters.register::<chrono::NaiveDate, i64, _>(NaiveDateAdapter);

        adapters
    }

    /// Register `adapter` for `D`, replacing any adapter already present.
    pub fn register<D, S, A>(&mut self, adapter: A)
    where
        D: 'static,
        S: 'static,
        A: TypeAdapter<D, S> + 'static,
    {
        let adapter: Arc<dyn TypeAdapter<D, S>> = Arc::new(adapter);
        self.adapters.insert(TypeId::of::<D>(), Box::new(adapter));
    }

    #[must_use]
    pub fn contains<D: 'static>(&self) -> bool {
        self.adapters.contains_key(&TypeId::of::<D>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Adapter for `D` storing as `S`. Also fails when the registered
    /// adapter for `D` stores a different primitive.
    pub fn get<D: 'static, S: 'static>(&self) -> Result<Arc<dyn TypeAdapter<D, S>>, Error> {
        self.adapters
            .get(&TypeId::of::<D>())
            .and_then(|erased| erased.downcast_ref::<Arc<dyn TypeAdapter<D, S>>>())
            .cloned()
            .ok_or(Error::TypeAdapterNotFound(type_name::<D>()))
    }

    pub fn serialize<D: 'static, S: 'static>(&self, value: Option<&D>) -> Result<Option<S>, Error> {
        Ok(self.get::<D, S>()?.serialize_nullable(value))
    }

    pub fn deserialize<D: 'static, S: 'static>(&self, value: Option<S>) -> Result<Option<D>, Error> {
        Ok(self.get::<D, S>()?.deserialize_nullable(value)?)
    }

    pub fn serialize_required<D: 'static, S: 'static>(&self, value: &D) -> Result<S, Error> {
        Ok(self.get::<D, S>()?.serialize(value))
    }

    pub fn deserialize_required<D: 'static, S: 'static>(&self, value: S) -> Result<D, Error> {
        Ok(self.get::<D, S>()?.deserialize(value)?)
    }
}

impl Default for TypeAdapters {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for TypeAdapters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeAdapters")
            .field("len", &self.adapters.len())
            .finish()
    }
}
