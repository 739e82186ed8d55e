use core::{
  fmt,
  iter::FusedIterator,
  marker::PhantomData,
  ptr::NonNull,
};

use crate::{
  RbTree,
  link::{
    HasRb,
    left,
    right,
  },
  path::Path,
};

/// A position in an [`RbTree`], kept as the full path from the root.
///
/// The cursor borrows the tree, so the tree cannot be mutated through safe
/// code while the cursor lives. Any insertion or removal invalidates every
/// cursor obtained before it.
///
/// Stepping past either end returns `None` but leaves the cursor on the
/// boundary node, so walking can resume in the opposite direction.
pub struct Cursor<'tree, T>
where
  T: HasRb,
{
  path: Path<T>,
  marker: PhantomData<&'tree RbTree<T>>,
}

impl<'tree, T> Cursor<'tree, T>
where
  T: HasRb,
{
  pub(crate) fn from_path(path: Path<T>) -> Self {
    Self {
      path,
      marker: PhantomData,
    }
  }

  /// A cursor pointing nowhere.
  pub const fn nowhere() -> Self {
    Self {
      path: Path::new(),
      marker: PhantomData,
    }
  }

  #[inline]
  pub fn current(&self) -> Option<NonNull<T>> {
    self.path.top()
  }

  /// The record under the cursor.
  #[inline]
  pub fn get(&self) -> Option<&'tree T> {
    // SAFETY: linked nodes outlive the tree borrow held by this cursor.
    self.current().map(|node| unsafe { node.as_ref() })
  }

  /// Number of nodes on the path from the root to the current node inclusive.
  #[inline]
  pub fn depth(&self) -> usize {
    self.path.len()
  }

  #[inline]
  pub fn is_nowhere(&self) -> bool {
    self.path.is_empty()
  }

  /// Moves to the in-order successor and returns it.
  pub fn next(&mut self) -> Option<NonNull<T>> {
    let current = self.current()?;
    debug_assert!(self.path.top_is_linked(), "stale cursor: tree changed under it");

    if let Some(right_child) = right(current) {
      self.path.push_leftmost(Some(right_child));
    } else {
      // Climb while we are a right child. Work on a copy of the length so the
      // cursor stays on the last node when there is no successor.
      let mut depth = self.path.len();
      while depth > 1 && self.path.slot(depth - 1) == right(self.path.node(depth - 2)) {
        depth -= 1;
      }
      depth -= 1;

      if depth == 0 {
        return None;
      }
      self.path.truncate(depth);
    }

    self.current()
  }

  /// Moves to the in-order predecessor and returns it.
  pub fn prev(&mut self) -> Option<NonNull<T>> {
    let current = self.current()?;
    debug_assert!(self.path.top_is_linked(), "stale cursor: tree changed under it");

    if let Some(left_child) = left(current) {
      self.path.push_rightmost(Some(left_child));
    } else {
      let mut depth = self.path.len();
      while depth > 1 && self.path.slot(depth - 1) == left(self.path.node(depth - 2)) {
        depth -= 1;
      }
      depth -= 1;

      if depth == 0 {
        return None;
      }
      self.path.truncate(depth);
    }

    self.current()
  }
}

impl<T> Clone for Cursor<'_, T>
where
  T: HasRb,
{
  fn clone(&self) -> Self {
    Self {
      path: self.path.clone(),
      marker: PhantomData,
    }
  }
}

impl<T> fmt::Debug for Cursor<'_, T>
where
  T: HasRb,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Cursor")
      .field("current", &self.current())
      .field("depth", &self.depth())
      .finish()
  }
}

/// Ascending iterator over the records of a tree.
pub struct Iter<'tree, T>
where
  T: HasRb,
{
  cursor: Cursor<'tree, T>,
  pending: Option<NonNull<T>>,
}

impl<'tree, T> Iter<'tree, T>
where
  T: HasRb,
{
  /// Starts at the cursor's current node.
  pub fn new(cursor: Cursor<'tree, T>) -> Self {
    let pending = cursor.current();
    Self { cursor, pending }
  }
}

impl<'tree, T> Iterator for Iter<'tree, T>
where
  T: HasRb + 'tree,
{
  type Item = &'tree T;

  fn next(&mut self) -> Option<Self::Item> {
    let node = self.pending.take()?;
    self.pending = self.cursor.next();
    // SAFETY: see `Cursor::get`.
    Some(unsafe { node.as_ref() })
  }
}

impl<'tree, T> FusedIterator for Iter<'tree, T> where T: HasRb + 'tree {}
