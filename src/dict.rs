use alloc::boxed::Box;
use core::{
  borrow::Borrow,
  cmp::Ordering,
  fmt,
  iter::FusedIterator,
  mem,
  ptr::NonNull,
};

use log::debug;
use rbkit_rbtree::{
  HasRb,
  Iter,
  RbLink,
  RbTree,
};

pub(crate) struct Entry<K, V> {
  key: K,
  value: V,
  link: RbLink<Self>,
}

impl<K, V> Entry<K, V> {
  fn boxed(key: K, value: V) -> NonNull<Self> {
    NonNull::from(Box::leak(Box::new(Self {
      key,
      value,
      link: RbLink::new(),
    })))
  }

  /// # Safety
  ///
  /// `entry` must come from [`Entry::boxed`] and be unlinked.
  unsafe fn reclaim(entry: NonNull<Self>) -> Box<Self> {
    unsafe { Box::from_raw(entry.as_ptr()) }
  }
}

impl<K, V> HasRb for Entry<K, V> {
  fn rb_link(&self) -> &RbLink<Self> {
    &self.link
  }

  fn rb_link_mut(&mut self) -> &mut RbLink<Self> {
    &mut self.link
  }
}

fn entry_cmp<K: Ord, V>(a: &Entry<K, V>, b: &Entry<K, V>) -> Ordering {
  a.key.cmp(&b.key)
}

fn key_cmp<Q, K, V>(key: &Q, entry: &Entry<K, V>) -> Ordering
where
  K: Borrow<Q>,
  Q: Ord + ?Sized,
{
  key.cmp(entry.key.borrow())
}

#[derive(Debug, PartialEq, Eq)]
pub enum DictError<K, V> {
  AlreadyPresent(K, V),
}

pub type DictResult<T, K, V> = Result<T, DictError<K, V>>;

/// A sorted dictionary whose entries are heap records linked into an
/// intrusive [`RbTree`].
pub struct Dict<K, V>
where
  K: Ord,
{
  pub(crate) tree: RbTree<Entry<K, V>>,
  len: usize,
}

impl<K, V> Dict<K, V>
where
  K: Ord,
{
  pub const fn new() -> Self {
    Self {
      tree: RbTree::new(),
      len: 0,
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Adds a new entry. An existing equal key is left alone and the rejected
  /// pair is handed back.
  pub fn insert(&mut self, key: K, value: V) -> DictResult<(), K, V> {
    let entry = Entry::boxed(key, value);

    // SAFETY: the entry is a fresh heap record owned by this dictionary until
    // `remove` or `clear` reclaims it.
    if unsafe { self.tree.insert(entry, entry_cmp) }.is_err() {
      let Entry { key, value, .. } = *unsafe { Entry::reclaim(entry) };
      return Err(DictError::AlreadyPresent(key, value));
    }

    self.len += 1;
    Ok(())
  }

  /// Inserts or overwrites, returning the previous value.
  pub fn replace(&mut self, key: K, value: V) -> Option<V> {
    if let Some(old) = self.get_mut(&key) {
      debug!("dict: replacing the value of an existing key");
      return Some(mem::replace(old, value));
    }

    let linked = self.insert(key, value);
    debug_assert!(linked.is_ok());
    None
  }

  pub fn get<Q>(&self, key: &Q) -> Option<&V>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    let entry = self.tree.lookup(key, key_cmp)?;
    Some(&unsafe { entry.as_ref() }.value)
  }

  pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    let mut entry = self.tree.lookup(key, key_cmp)?;
    Some(&mut unsafe { entry.as_mut() }.value)
  }

  pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
  where
    F: FnOnce() -> V,
  {
    if let Some(mut entry) = self.tree.lookup(&key, key_cmp) {
      return &mut unsafe { entry.as_mut() }.value;
    }

    let mut entry = Entry::boxed(key, default());
    let linked = unsafe { self.tree.insert(entry, entry_cmp) };
    debug_assert!(linked.is_ok());
    self.len += 1;

    &mut unsafe { entry.as_mut() }.value
  }

  pub fn contains_key<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    self.tree.lookup(key, key_cmp).is_some()
  }

  pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    self.remove_entry(key).map(|(_, value)| value)
  }

  pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    let entry = self.tree.remove(key, key_cmp)?;
    self.len -= 1;

    let Entry { key, value, .. } = *unsafe { Entry::reclaim(entry) };
    Some((key, value))
  }

  pub fn first(&self) -> Option<(&K, &V)> {
    self.tree.first().map(|entry| Self::pair(unsafe { entry.as_ref() }))
  }

  pub fn last(&self) -> Option<(&K, &V)> {
    self.tree.last().map(|entry| Self::pair(unsafe { entry.as_ref() }))
  }

  /// Entries in ascending key order.
  pub fn iter(&self) -> DictIter<'_, K, V> {
    DictIter {
      inner: self.tree.iter(),
    }
  }

  /// Entries in ascending key order, starting at `key`. Empty when `key` is
  /// not present.
  pub fn range_from<Q>(&self, key: &Q) -> DictIter<'_, K, V>
  where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
  {
    let (_, cursor) = self.tree.lookup_cursor(key, key_cmp);
    DictIter {
      inner: Iter::new(cursor),
    }
  }

  pub fn keys(&self) -> impl Iterator<Item = &K> {
    self.iter().map(|(key, _)| key)
  }

  pub fn values(&self) -> impl Iterator<Item = &V> {
    self.iter().map(|(_, value)| value)
  }

  /// Drops every entry.
  pub fn clear(&mut self) {
    for entry in self.tree.drain() {
      drop(unsafe { Entry::reclaim(entry) });
    }
    self.len = 0;
  }

  fn pair(entry: &Entry<K, V>) -> (&K, &V) {
    (&entry.key, &entry.value)
  }
}

impl<K, V> Default for Dict<K, V>
where
  K: Ord,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<K, V> Drop for Dict<K, V>
where
  K: Ord,
{
  fn drop(&mut self) {
    self.clear();
  }
}

impl<K, V> fmt::Debug for Dict<K, V>
where
  K: Ord + fmt::Debug,
  V: fmt::Debug,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.iter()).finish()
  }
}

impl<K, V> FromIterator<(K, V)> for Dict<K, V>
where
  K: Ord,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut dict = Self::new();
    dict.extend(iter);
    dict
  }
}

impl<K, V> Extend<(K, V)> for Dict<K, V>
where
  K: Ord,
{
  fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
    for (key, value) in iter {
      self.replace(key, value);
    }
  }
}

impl<'dict, K, V> IntoIterator for &'dict Dict<K, V>
where
  K: Ord,
{
  type Item = (&'dict K, &'dict V);
  type IntoIter = DictIter<'dict, K, V>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

pub struct DictIter<'dict, K, V> {
  inner: Iter<'dict, Entry<K, V>>,
}

impl<'dict, K, V> Iterator for DictIter<'dict, K, V>
where
  K: 'dict,
  V: 'dict,
{
  type Item = (&'dict K, &'dict V);

  fn next(&mut self) -> Option<Self::Item> {
    self.inner.next().map(|entry| (&entry.key, &entry.value))
  }
}

impl<'dict, K, V> FusedIterator for DictIter<'dict, K, V>
where
  K: 'dict,
  V: 'dict,
{
}
