//! Dictionary-like objects: kerning, groups and libs
//!
//! A [`DictKind`] names the key and value types of one dictionary and how
//! they are normalized. Environments store entries through the
//! [`DictBackend`] hooks; [`BaseDict`] adds normalization and the usual
//! mapping operations on top.

use std::fmt;

use super::base::BaseObject;
use crate::error::{Error, Result};

/// Key and value types of a dictionary, with their normalizers
pub trait DictKind: 'static {
    type Key: Clone + fmt::Debug + PartialEq;
    type Value: Clone + fmt::Debug + PartialEq;

    /// Used in error messages
    const NAME: &'static str;

    fn normalize_key(key: Self::Key) -> Result<Self::Key>;
    fn normalize_value(value: Self::Value) -> Result<Self::Value>;
}

pub type KeyOf<D> = <<D as DictBackend>::Kind as DictKind>::Key;
pub type ValueOf<D> = <<D as DictBackend>::Kind as DictKind>::Value;

/// Environment hooks for a dictionary
pub trait DictBackend: BaseObject {
    type Kind: DictKind;

    fn raw_keys(&self) -> Vec<KeyOf<Self>>;
    fn raw_get(&self, key: &KeyOf<Self>) -> Option<ValueOf<Self>>;
    fn raw_set(&self, key: KeyOf<Self>, value: ValueOf<Self>);
    fn raw_remove(&self, key: &KeyOf<Self>);

    fn raw_contains(&self, key: &KeyOf<Self>) -> bool {
        self.raw_get(key).is_some()
    }

    fn raw_len(&self) -> usize {
        self.raw_keys().len()
    }

    fn raw_clear(&self) {
        for key in self.raw_keys() {
            self.raw_remove(&key);
        }
    }
}

/// Public dictionary API
pub trait BaseDict: DictBackend {
    fn len(&self) -> usize {
        self.raw_len()
    }

    fn is_empty(&self) -> bool {
        self.raw_len() == 0
    }

    fn keys(&self) -> Vec<KeyOf<Self>> {
        self.raw_keys()
    }

    fn values(&self) -> Vec<ValueOf<Self>> {
        self.items().into_iter().map(|(_, value)| value).collect()
    }

    fn items(&self) -> Vec<(KeyOf<Self>, ValueOf<Self>)> {
        self.raw_keys()
            .into_iter()
            .filter_map(|key| self.raw_get(&key).map(|value| (key, value)))
            .collect()
    }

    fn contains(&self, key: &KeyOf<Self>) -> bool {
        self.raw_contains(key)
    }

    fn get(&self, key: &KeyOf<Self>) -> Option<ValueOf<Self>> {
        self.raw_get(key)
    }

    /// Like [`BaseDict::get`], failing when the key is missing.
    fn get_item(&self, key: &KeyOf<Self>) -> Result<ValueOf<Self>> {
        self.raw_get(key).ok_or_else(|| {
            Error::not_found(format!("{:?} is not in {}.", key, <Self::Kind as DictKind>::NAME))
        })
    }

    fn set(&self, key: KeyOf<Self>, value: ValueOf<Self>) -> Result<()> {
        let key = <Self::Kind as DictKind>::normalize_key(key)?;
        let value = <Self::Kind as DictKind>::normalize_value(value)?;
        self.raw_set(key, value);
        self.changed();
        Ok(())
    }

    fn remove(&self, key: &KeyOf<Self>) -> Result<()> {
        if !self.raw_contains(key) {
            return Err(Error::not_found(format!(
                "{:?} is not in {}.",
                key,
                <Self::Kind as DictKind>::NAME
            )));
        }
        self.raw_remove(key);
        self.changed();
        Ok(())
    }

    /// Remove `key` and return its value, or `default` when it is missing.
    fn pop(&self, key: &KeyOf<Self>, default: Option<ValueOf<Self>>) -> Option<ValueOf<Self>> {
        match self.raw_get(key) {
            Some(value) => {
                self.raw_remove(key);
                self.changed();
                Some(value)
            }
            None => default,
        }
    }

    fn update(&self, items: impl IntoIterator<Item = (KeyOf<Self>, ValueOf<Self>)>) -> Result<()> {
        for (key, value) in items {
            self.set(key, value)?;
        }
        Ok(())
    }

    fn clear(&self) {
        self.raw_clear();
        self.changed();
    }
}

impl<T: DictBackend> BaseDict for T {}
