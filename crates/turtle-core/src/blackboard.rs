use std::any::Any;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Named, type-tagged handle into a [`Blackboard`].
///
/// Static keys are declared as constants with [`BbKey::new`]; keys chosen at runtime (for example
/// the output key of a sensing node) use [`BbKey::named`].
pub struct BbKey<T: 'static> {
    name: Cow<'static, str>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> BbKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            _phantom: PhantomData,
        }
    }

    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            _phantom: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T: 'static> PartialEq for BbKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T: 'static> Eq for BbKey<T> {}

impl<T: 'static> fmt::Debug for BbKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BbKey").field(&self.name).finish()
    }
}

/// Key-value store shared by the nodes of one tree execution.
///
/// Ticking is single-threaded, so the blackboard is passed by `&mut` through each tick rather
/// than guarded by a lock. Write-then-read ordering follows tree evaluation order.
#[derive(Default)]
pub struct Blackboard {
    values: BTreeMap<String, Box<dyn Any>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored key names, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    pub fn contains<T: 'static>(&self, key: &BbKey<T>) -> bool {
        self.values.contains_key(key.name())
    }

    pub fn set<T: 'static>(&mut self, key: &BbKey<T>, value: T) {
        self.values.insert(key.name().to_owned(), Box::new(value));
    }

    pub fn get<T: 'static>(&self, key: &BbKey<T>) -> Option<&T> {
        let value = self.values.get(key.name())?;
        value.downcast_ref::<T>().or_else(|| {
            panic!(
                "blackboard type mismatch for key {:?} (stored type differs from requested)",
                key.name()
            )
        })
    }

    pub fn get_mut<T: 'static>(&mut self, key: &BbKey<T>) -> Option<&mut T> {
        let value = self.values.get_mut(key.name())?;
        value.downcast_mut::<T>().or_else(|| {
            panic!(
                "blackboard type mismatch for key {:?} (stored type differs from requested)",
                key.name()
            )
        })
    }

    pub fn remove<T: 'static>(&mut self, key: &BbKey<T>) -> Option<T> {
        let value = self.values.remove(key.name())?;
        value.downcast::<T>().map(|b| *b).ok().or_else(|| {
            panic!(
                "blackboard type mismatch for key {:?} (stored type differs from requested)",
                key.name()
            )
        })
    }
}

impl fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blackboard")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}
