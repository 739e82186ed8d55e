use core::{
  cmp::Ordering,
  ptr::NonNull,
};

use rbkit_rbtree::{
  HasRb,
  RbResult,
  RbTree,
};
use spin::{
  RwLock,
  RwLockReadGuard,
  RwLockWriteGuard,
};

/// An [`RbTree`] behind a spinning reader-writer lock.
///
/// The tree itself does no synchronization. Mutations take the write lock
/// and lookups take the read lock, so a lookup never observes a rotation in
/// progress. Cursors must stay inside a single [`read`](Self::read) guard:
/// once the guard is released any writer may invalidate them.
pub struct SharedTree<T>
where
  T: HasRb,
{
  tree: RwLock<RbTree<T>>,
}

impl<T> SharedTree<T>
where
  T: HasRb,
{
  pub const fn new() -> Self {
    Self {
      tree: RwLock::new(RbTree::new()),
    }
  }

  pub fn read(&self) -> RwLockReadGuard<'_, RbTree<T>> {
    self.tree.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, RbTree<T>> {
    self.tree.write()
  }

  pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, RbTree<T>>> {
    self.tree.try_write()
  }

  /// # Safety
  ///
  /// Same contract as [`RbTree::insert`].
  pub unsafe fn insert<F>(&self, node: NonNull<T>, cmp: F) -> RbResult<()>
  where
    F: Fn(&T, &T) -> Ordering,
  {
    unsafe { self.write().insert(node, cmp) }
  }

  pub fn remove<K, F>(&self, key: &K, cmp: F) -> Option<NonNull<T>>
  where
    K: ?Sized,
    F: Fn(&K, &T) -> Ordering,
  {
    self.write().remove(key, cmp)
  }

  pub fn lookup<K, F>(&self, key: &K, cmp: F) -> Option<NonNull<T>>
  where
    K: ?Sized,
    F: Fn(&K, &T) -> Ordering,
  {
    self.read().lookup(key, cmp)
  }

  pub fn is_empty(&self) -> bool {
    self.read().is_empty()
  }

  pub fn into_inner(self) -> RbTree<T> {
    self.tree.into_inner()
  }
}

impl<T> Default for SharedTree<T>
where
  T: HasRb,
{
  fn default() -> Self {
    Self::new()
  }
}
