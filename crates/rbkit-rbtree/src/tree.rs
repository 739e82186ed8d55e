use core::{
  cmp::Ordering,
  fmt,
  ptr::NonNull,
};

use log::trace;

use crate::{
  RbError,
  RbResult,
  cursor::{
    Cursor,
    Iter,
  },
  drain::RbDrainer,
  link::{
    Color,
    HasRb,
    color,
    detach,
    is_black,
    is_red,
    left,
    paint,
    present,
    right,
    set_left,
    set_right,
  },
  path::Path,
};

/// An intrusive red-black tree.
///
/// The tree owns only the topology stored in each node's [`RbLink`](crate::RbLink).
/// Node memory stays with the caller: nodes are handed in by
/// [`insert`](Self::insert) and handed back by [`remove`](Self::remove) or by a
/// teardown through [`fini_step`](Self::fini_step).
///
/// Ordering is defined solely by the comparator passed to each operation. All
/// operations on one populated tree must use comparators that agree; mixing
/// them leaves the tree in an unspecified order.
pub struct RbTree<T>
where
  T: HasRb,
{
  root: Option<NonNull<T>>,
  tearing_down: bool,
}

impl<T> RbTree<T>
where
  T: HasRb,
{
  pub const fn new() -> Self {
    Self {
      root: None,
      tearing_down: false,
    }
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.root.is_none()
  }

  #[cfg(any(test, feature = "verify"))]
  #[inline]
  pub(crate) fn root(&self) -> Option<NonNull<T>> {
    self.root
  }

  #[inline(always)]
  fn assert_settled(&self) {
    debug_assert!(
      !self.tearing_down,
      "tree used while a fini_step teardown is in progress"
    );
  }

  /// Walks down from `node` comparing `key` against each visited node and
  /// records the visited nodes into `path`.
  ///
  /// Returns the last comparison: `Equal` means the top of `path` matches the
  /// key, otherwise it tells on which side of the top node the key belongs.
  /// The result is meaningless when `path` stays empty.
  fn descend<K, F>(mut node: Option<NonNull<T>>, key: &K, cmp: &F, path: &mut Path<T>) -> Ordering
  where
    K: ?Sized,
    F: Fn(&K, &T) -> Ordering,
  {
    let mut ord = Ordering::Equal;

    while let Some(current) = node {
      path.push(current);

      ord = cmp(key, unsafe { current.as_ref() });
      node = match ord {
        Ordering::Less => left(current),
        Ordering::Greater => right(current),
        Ordering::Equal => break,
      };
    }

    ord
  }

  /// Points whichever link of `parent` referenced `old` at `new`; a missing
  /// parent means `old` was the root.
  fn replace_child(&mut self, parent: Option<NonNull<T>>, old: NonNull<T>, new: Option<NonNull<T>>) {
    match parent {
      Some(parent) if left(parent) == Some(old) => set_left(parent, new),
      Some(parent) => set_right(parent, new),
      None => self.root = new,
    }
  }

  fn rotate_left(&mut self, parent: Option<NonNull<T>>, node: NonNull<T>) {
    let pivot = present(right(node));
    set_right(node, left(pivot));
    set_left(pivot, Some(node));
    self.replace_child(parent, node, Some(pivot));
  }

  fn rotate_right(&mut self, parent: Option<NonNull<T>>, node: NonNull<T>) {
    let pivot = present(left(node));
    set_left(node, right(pivot));
    set_right(pivot, Some(node));
    self.replace_child(parent, node, Some(pivot));
  }

  /// Links `node` into the tree.
  ///
  /// Fails with [`RbError::AlreadyPresent`] and leaves the tree untouched when
  /// a node comparing equal is already linked. The link fields of `node` are
  /// overwritten on success.
  ///
  /// # Safety
  ///
  /// `node` must point to a live record that is not linked into any tree. On
  /// success it must stay alive, must not move and must not be changed in a
  /// way that alters its ordering until it is handed back by `remove`,
  /// `fini_step` or `drain`.
  pub unsafe fn insert<F>(&mut self, node: NonNull<T>, cmp: F) -> RbResult<()>
  where
    F: Fn(&T, &T) -> Ordering,
  {
    self.assert_settled();

    let mut path = Path::new();
    let ord = Self::descend(self.root, unsafe { node.as_ref() }, &cmp, &mut path);
    if !path.is_empty() && ord == Ordering::Equal {
      trace!("rbtree: rejected node comparing equal to a linked one");
      return Err(RbError::AlreadyPresent);
    }

    detach(node);
    match path.top() {
      Some(parent) if ord == Ordering::Less => set_left(parent, Some(node)),
      Some(parent) => set_right(parent, Some(node)),
      None => self.root = Some(node),
    }
    path.push(node);

    self.insert_fixup(&mut path);
    Ok(())
  }

  /// Resolves a double red between the top of `path` and its parent.
  fn insert_fixup(&mut self, path: &mut Path<T>) {
    loop {
      let depth = path.len();
      let mut node = path.node(depth - 1);

      if depth == 1 {
        paint(node, Color::Black);
        self.root = Some(node);
        break;
      }

      let mut parent = path.node(depth - 2);
      if is_black(Some(parent)) {
        break;
      }

      // A red parent is never the root, so the grandparent exists and is black.
      let grandparent = path.node(depth - 3);
      let uncle = if left(grandparent) == Some(parent) {
        right(grandparent)
      } else {
        left(grandparent)
      };

      if is_black(uncle) {
        let above = path.above(depth - 3);

        // Straighten a zig-zag first so one rotation at the grandparent fixes it.
        if left(grandparent).is_some_and(|l| right(l) == Some(node)) {
          self.rotate_left(Some(grandparent), parent);
          parent = node;
          node = present(left(node));
        } else if right(grandparent).is_some_and(|r| left(r) == Some(node)) {
          self.rotate_right(Some(grandparent), parent);
          parent = node;
          node = present(right(node));
        }

        if left(parent) == Some(node) {
          self.rotate_right(above, grandparent);
        } else {
          self.rotate_left(above, grandparent);
        }

        paint(parent, Color::Black);
        paint(grandparent, Color::Red);
        break;
      }

      paint(parent, Color::Black);
      paint(present(uncle), Color::Black);
      paint(grandparent, Color::Red);

      path.truncate(depth - 2);
    }
  }

  /// Unlinks the node comparing equal to `key` and hands it back.
  ///
  /// The returned node has cleared links and belongs to the caller again.
  /// Returns `None` when no such node is linked.
  pub fn remove<K, F>(&mut self, key: &K, cmp: F) -> Option<NonNull<T>>
  where
    K: ?Sized,
    F: Fn(&K, &T) -> Ordering,
  {
    self.assert_settled();

    let mut path = Path::new();
    let ord = Self::descend(self.root, key, &cmp, &mut path);
    if path.is_empty() || ord != Ordering::Equal {
      trace!("rbtree: nothing to remove");
      return None;
    }

    let node_index = path.len() - 1;
    let node = path.node(node_index);

    // Swap the node with its in-order successor so that it has at most one
    // child. The successor is at the bottom of the right subtree.
    if let Some(right_child) = right(node) {
      let successor = if left(right_child).is_some() {
        path.push_leftmost(Some(right_child));
        let bottom = path.len() - 1;
        let successor = path.node(bottom);
        let successor_parent = path.node(bottom - 1);

        let successor_right = right(successor);
        set_right(successor, Some(right_child));
        set_right(node, successor_right);

        if left(successor_parent) == Some(successor) {
          set_left(successor_parent, Some(node));
        } else {
          set_right(successor_parent, Some(node));
        }

        path.set(node_index, Some(successor));
        path.set(bottom, Some(node));
        Some(successor)
      } else if left(node).is_some() {
        // The right child is the successor itself.
        let successor = right_child;
        set_right(node, right(successor));
        set_right(successor, Some(node));

        path.set(node_index, Some(successor));
        path.push(node);
        Some(successor)
      } else {
        None
      };

      if let Some(successor) = successor {
        set_left(successor, left(node));
        set_left(node, None);
        self.replace_child(path.above(node_index), node, Some(successor));

        let successor_color = color(successor);
        paint(successor, color(node));
        paint(node, successor_color);
      }
    }

    // Promote the only child (or nothing) into the node's slot.
    let bottom = path.len() - 1;
    let single_child = left(node).or(right(node));
    self.replace_child(path.above(bottom), node, single_child);
    path.set(bottom, single_child);

    let was_black = color(node) == Color::Black;
    detach(node);

    if was_black {
      self.remove_fixup(&mut path);
    }

    Some(node)
  }

  /// Repays the black deficit at the top of `path`, which may be a hole.
  fn remove_fixup(&mut self, path: &mut Path<T>) {
    loop {
      let depth = path.len();
      let node = path.slot(depth - 1);

      if let Some(red) = node.filter(|&n| is_red(n)) {
        paint(red, Color::Black);
        break;
      }

      // Every path through the root lost one black node: balanced again.
      if depth <= 1 {
        break;
      }

      let parent = path.node(depth - 2);
      let node_is_left = left(parent) == node;
      // The sibling subtree is one black level taller than ours, so it exists.
      let sibling = present(if node_is_left {
        right(parent)
      } else {
        left(parent)
      });
      let grandparent = path.above(depth - 2);

      if is_red(sibling) {
        if node_is_left {
          self.rotate_left(grandparent, parent);
        } else {
          self.rotate_right(grandparent, parent);
        }

        paint(sibling, Color::Black);
        paint(parent, Color::Red);

        path.set(depth - 2, Some(sibling));
        path.set(depth - 1, Some(parent));
        path.push_slot(node);
        continue;
      }

      let red_left = left(sibling).is_some_and(is_red);
      let red_right = right(sibling).is_some_and(is_red);

      if red_left || red_right {
        let mut sibling = sibling;

        // Move the red nephew to the far side first.
        if node_is_left && !red_right {
          paint(sibling, Color::Red);
          paint(present(left(sibling)), Color::Black);
          self.rotate_right(Some(parent), sibling);
          sibling = present(right(parent));
        } else if !node_is_left && !red_left {
          paint(sibling, Color::Red);
          paint(present(right(sibling)), Color::Black);
          self.rotate_left(Some(parent), sibling);
          sibling = present(left(parent));
        }

        paint(sibling, color(parent));
        paint(parent, Color::Black);
        if node_is_left {
          paint(present(right(sibling)), Color::Black);
          self.rotate_left(grandparent, parent);
        } else {
          paint(present(left(sibling)), Color::Black);
          self.rotate_right(grandparent, parent);
        }
        break;
      }

      paint(sibling, Color::Red);
      path.truncate(depth - 1);
    }
  }

  /// Finds the node comparing equal to `key`.
  pub fn lookup<K, F>(&self, key: &K, cmp: F) -> Option<NonNull<T>>
  where
    K: ?Sized,
    F: Fn(&K, &T) -> Ordering,
  {
    self.assert_settled();

    let mut node = self.root;
    while let Some(current) = node {
      node = match cmp(key, unsafe { current.as_ref() }) {
        Ordering::Less => left(current),
        Ordering::Greater => right(current),
        Ordering::Equal => return Some(current),
      };
    }

    None
  }

  /// Like [`lookup`](Self::lookup), but also returns a cursor positioned at
  /// the found node. On a miss the cursor points nowhere.
  pub fn lookup_cursor<K, F>(&self, key: &K, cmp: F) -> (Option<NonNull<T>>, Cursor<'_, T>)
  where
    K: ?Sized,
    F: Fn(&K, &T) -> Ordering,
  {
    self.assert_settled();

    let mut path = Path::new();
    let ord = Self::descend(self.root, key, &cmp, &mut path);
    if path.is_empty() || ord != Ordering::Equal {
      path.clear();
    }

    let cursor = Cursor::from_path(path);
    (cursor.current(), cursor)
  }

  /// A cursor at the first node in order.
  pub fn head(&self) -> Cursor<'_, T> {
    self.assert_settled();

    let mut path = Path::new();
    path.push_leftmost(self.root);
    Cursor::from_path(path)
  }

  /// A cursor at the last node in order.
  pub fn tail(&self) -> Cursor<'_, T> {
    self.assert_settled();

    let mut path = Path::new();
    path.push_rightmost(self.root);
    Cursor::from_path(path)
  }

  pub fn first(&self) -> Option<NonNull<T>> {
    self.head().current()
  }

  pub fn last(&self) -> Option<NonNull<T>> {
    self.tail().current()
  }

  /// In-order iterator over the linked records.
  pub fn iter(&self) -> Iter<'_, T> {
    Iter::new(self.head())
  }

  /// Rips one arbitrary node out of the tree without rebalancing, or returns
  /// `None` once the tree is empty.
  ///
  /// Meant for destroying a tree: call it until it returns `None`, releasing
  /// each returned record. No other operation may be used on the tree until
  /// the teardown is complete, after which the tree is a valid empty tree.
  /// The order in which nodes come out is unspecified.
  pub fn fini_step(&mut self) -> Option<NonNull<T>> {
    let Some(mut node) = self.root else {
      self.tearing_down = false;
      return None;
    };

    // Descend through left children; the node found has at most a right
    // subtree, which moves up into its slot.
    let mut parent = None;
    while let Some(child) = left(node) {
      parent = Some(node);
      node = child;
    }

    let right_subtree = right(node);
    match parent {
      Some(parent) => set_left(parent, right_subtree),
      None => self.root = right_subtree,
    }
    detach(node);

    self.tearing_down = self.root.is_some();
    if !self.tearing_down {
      trace!("rbtree: teardown complete");
    }

    Some(node)
  }

  /// Teardown as an iterator over [`fini_step`](Self::fini_step).
  pub fn drain(&mut self) -> RbDrainer<'_, T> {
    RbDrainer::new(self)
  }
}

impl<T> Default for RbTree<T>
where
  T: HasRb,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<T> fmt::Debug for RbTree<T>
where
  T: HasRb,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RbTree")
      .field("root", &self.root)
      .field("tearing_down", &self.tearing_down)
      .finish()
  }
}

// SAFETY: the tree only stores pointers to records the caller lent it; moving
// or sharing the tree is as safe as moving or sharing those records. Shared
// access never writes to a node.
unsafe impl<T: HasRb + Send> Send for RbTree<T> {}
unsafe impl<T: HasRb + Sync> Sync for RbTree<T> {}
