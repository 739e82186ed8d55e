use core::{
  cmp::Ordering,
  ptr::NonNull,
};
use std::{
  sync::Arc,
  thread,
};

use rbkit_rbtree::{
  HasRb,
  RbError,
  RbLink,
};

use super::SharedTree;

#[derive(Debug)]
struct Slot {
  id: u32,
  link: RbLink<Self>,
}

impl HasRb for Slot {
  fn rb_link(&self) -> &RbLink<Self> {
    &self.link
  }

  fn rb_link_mut(&mut self) -> &mut RbLink<Self> {
    &mut self.link
  }
}

fn by_id(a: &Slot, b: &Slot) -> Ordering {
  a.id.cmp(&b.id)
}

fn by_key(key: &u32, slot: &Slot) -> Ordering {
  key.cmp(&slot.id)
}

fn make(id: u32) -> NonNull<Slot> {
  NonNull::from(Box::leak(Box::new(Slot {
    id,
    link: RbLink::new(),
  })))
}

fn destroy(slot: NonNull<Slot>) {
  drop(unsafe { Box::from_raw(slot.as_ptr()) });
}

#[test]
fn test_shared_insert_lookup_remove() {
  let shared = SharedTree::new();
  assert!(shared.is_empty());

  for id in [3, 1, 2] {
    unsafe { shared.insert(make(id), by_id) }.unwrap();
  }

  let twin = make(2);
  assert_eq!(unsafe { shared.insert(twin, by_id) }, Err(RbError::AlreadyPresent));
  destroy(twin);

  assert!(shared.lookup(&2, by_key).is_some());
  let removed = shared.remove(&2, by_key).expect("present");
  destroy(removed);
  assert!(shared.lookup(&2, by_key).is_none());

  let ids: Vec<u32> = shared.read().iter().map(|slot| slot.id).collect();
  assert_eq!(ids, vec![1, 3]);

  let mut tree = shared.into_inner();
  tree.drain().for_each(destroy);
}

#[test]
fn test_concurrent_writers() {
  const THREADS: u32 = 4;
  const PER_THREAD: u32 = 250;

  let shared = Arc::new(SharedTree::new());

  let handles: Vec<_> = (0..THREADS)
    .map(|t| {
      let shared = Arc::clone(&shared);
      thread::spawn(move || {
        for i in 0..PER_THREAD {
          let id = i * THREADS + t;
          unsafe { shared.insert(make(id), by_id) }.unwrap();
          assert!(shared.lookup(&id, by_key).is_some());
        }
      })
    })
    .collect();

  for handle in handles {
    handle.join().unwrap();
  }

  {
    let tree = shared.read();
    assert!(tree.verify().is_ok());
    assert_eq!(tree.verify_order(by_id), Ok(()));
    assert_eq!(tree.iter().count(), (THREADS * PER_THREAD) as usize);
  }

  let mut tree = shared.write();
  tree.drain().for_each(destroy);
  assert!(tree.is_empty());
}

#[test]
fn test_try_write_fails_while_reading() {
  let shared: SharedTree<Slot> = SharedTree::default();
  let reader = shared.read();
  assert!(shared.try_write().is_none());
  drop(reader);
  assert!(shared.try_write().is_some());
}
