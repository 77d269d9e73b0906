//! Key functions that turn items and queries into comparable strings

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;

/// Failure raised by a key function
pub type KeyError = Box<dyn std::error::Error + Send + Sync>;

/// Converts a value of type `T` into the string that gets split into grams.
///
/// Named key functions survive serialization through a [`KeyRegistry`];
/// closures built with [`KeyFn::closure`] do not.
pub struct KeyFn<T: ?Sized> {
    name: Option<Cow<'static, str>>,
    func: Arc<dyn Fn(&T) -> Result<String, KeyError> + Send + Sync>,
}

impl<T: ?Sized> Clone for KeyFn<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<T: ?Sized> fmt::Debug for KeyFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "KeyFn({})", name),
            None => f.write_str("KeyFn(<closure>)"),
        }
    }
}

impl<T: ?Sized + 'static> KeyFn<T> {
    /// A serializable key function, restored by `name` from a registry.
    pub fn named(
        name: impl Into<Cow<'static, str>>,
        func: fn(&T) -> Result<String, KeyError>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            func: Arc::new(func),
        }
    }

    /// An arbitrary closure. Indexes using it cannot be snapshotted.
    pub fn closure<F>(func: F) -> Self
    where
        F: Fn(&T) -> Result<String, KeyError> + Send + Sync + 'static,
    {
        Self {
            name: None,
            func: Arc::new(func),
        }
    }

    /// Registered name, `None` for closures
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Apply the function
    pub fn apply(&self, value: &T) -> Result<String, KeyError> {
        (self.func)(value)
    }
}

impl<T: AsRef<str> + ?Sized + 'static> KeyFn<T> {
    /// Use the value's own string form unchanged.
    pub fn identity() -> Self {
        Self::named(IDENTITY, identity_key::<T>)
    }
}

/// Name under which [`KeyFn::identity`] is registered
pub const IDENTITY: &str = "identity";

fn identity_key<T: AsRef<str> + ?Sized>(value: &T) -> Result<String, KeyError> {
    Ok(value.as_ref().to_owned())
}

/// Lookup table from key function name to function, used when restoring snapshots.
pub struct KeyRegistry<T: ?Sized> {
    functions: AHashMap<String, KeyFn<T>>,
}

impl<T: ?Sized + 'static> Default for KeyRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + 'static> KeyRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            functions: AHashMap::new(),
        }
    }

    /// Register a named function. Closures are ignored and `false` is returned.
    pub fn register(&mut self, key: KeyFn<T>) -> bool {
        match key.name() {
            Some(name) => {
                self.functions.insert(name.to_owned(), key);
                true
            }
            None => false,
        }
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, key: KeyFn<T>) -> Self {
        self.register(key);
        self
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&KeyFn<T>> {
        self.functions.get(name)
    }
}

impl<T: AsRef<str> + ?Sized + 'static> KeyRegistry<T> {
    /// A registry that already knows [`KeyFn::identity`]
    pub fn with_identity() -> Self {
        Self::new().with(KeyFn::identity())
    }
}
