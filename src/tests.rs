use super::*;
use std::{
  collections::BTreeMap,
  rc::Rc,
};

use rand::{
  Rng,
  SeedableRng,
  rngs::StdRng,
};
use simplelog::{
  Config,
  LevelFilter,
  TestLogger,
};

fn assert_balanced<K: Ord, V>(dict: &Dict<K, V>) {
  assert!(dict.tree.verify().is_ok());
  assert_eq!(dict.tree.iter().count(), dict.len());
}

#[test]
fn test_insert_get_remove() {
  let _ = TestLogger::init(LevelFilter::Trace, Config::default());
  let mut dict = Dict::new();
  assert!(dict.is_empty());

  for (key, value) in [(5, "five"), (3, "three"), (8, "eight"), (1, "one")] {
    dict.insert(key, value).unwrap();
    assert_balanced(&dict);
  }

  assert_eq!(dict.len(), 4);
  assert_eq!(dict.get(&3), Some(&"three"));
  assert_eq!(dict.get(&4), None);
  assert!(dict.contains_key(&8));

  assert_eq!(dict.remove(&3), Some("three"));
  assert_eq!(dict.remove(&3), None);
  assert_eq!(dict.len(), 3);
  assert_balanced(&dict);
}

#[test]
fn test_duplicate_hands_pair_back() {
  let mut dict = Dict::new();
  dict.insert("a".to_string(), 1).unwrap();

  let err = dict.insert("a".to_string(), 2).unwrap_err();
  assert_eq!(err, DictError::AlreadyPresent("a".to_string(), 2));
  assert_eq!(dict.get("a"), Some(&1));
  assert_eq!(dict.len(), 1);
}

#[test]
fn test_replace_overwrites() {
  let mut dict = Dict::new();
  assert_eq!(dict.replace(1, 'x'), None);
  assert_eq!(dict.replace(1, 'y'), Some('x'));
  assert_eq!(dict.get(&1), Some(&'y'));
  assert_eq!(dict.len(), 1);
  assert_balanced(&dict);
}

#[test]
fn test_borrowed_lookup() {
  let mut dict: Dict<String, usize> = Dict::new();
  for word in ["pear", "apple", "fig"] {
    dict.insert(word.to_string(), word.len()).unwrap();
  }

  assert_eq!(dict.get("apple"), Some(&5));
  *dict.get_mut("fig").unwrap() += 10;
  assert_eq!(dict.get("fig"), Some(&13));
  assert_eq!(dict.remove_entry("pear"), Some(("pear".to_string(), 4)));
}

#[test]
fn test_get_or_insert_with() {
  let mut dict = Dict::new();

  *dict.get_or_insert_with("hits", || 0) += 1;
  *dict.get_or_insert_with("hits", || 100) += 1;

  assert_eq!(dict.get("hits"), Some(&2));
  assert_eq!(dict.len(), 1);
  assert_balanced(&dict);
}

#[test]
fn test_sorted_walks() {
  let dict: Dict<i32, i32> = [9, 4, 7, 1, 5].into_iter().map(|k| (k, k * k)).collect();

  let keys: Vec<i32> = dict.keys().copied().collect();
  assert_eq!(keys, vec![1, 4, 5, 7, 9]);
  let values: Vec<i32> = dict.values().copied().collect();
  assert_eq!(values, vec![1, 16, 25, 49, 81]);

  assert_eq!(dict.first(), Some((&1, &1)));
  assert_eq!(dict.last(), Some((&9, &81)));

  let tail: Vec<i32> = dict.range_from(&5).map(|(k, _)| *k).collect();
  assert_eq!(tail, vec![5, 7, 9]);
  assert_eq!(dict.range_from(&6).count(), 0);

  let mut seen = Vec::new();
  for (k, _) in &dict {
    seen.push(*k);
  }
  assert_eq!(seen, keys);
}

#[test]
fn test_clear_drops_every_value() {
  let marker = Rc::new(());
  let mut dict = Dict::new();
  for key in 0..64 {
    dict.insert(key, Rc::clone(&marker)).unwrap();
  }
  assert_eq!(Rc::strong_count(&marker), 65);

  dict.clear();
  assert!(dict.is_empty());
  assert_eq!(Rc::strong_count(&marker), 1);

  dict.insert(1, Rc::clone(&marker)).unwrap();
  drop(dict);
  assert_eq!(Rc::strong_count(&marker), 1);
}

#[test]
fn test_matches_btreemap() {
  let mut rng = StdRng::seed_from_u64(42);
  let mut dict = Dict::new();
  let mut model = BTreeMap::new();

  for step in 0..5000u32 {
    let key: u16 = rng.random_range(0..512);
    match rng.random_range(0..3) {
      0 => assert_eq!(dict.replace(key, step), model.insert(key, step)),
      1 => assert_eq!(dict.remove(&key), model.remove(&key)),
      _ => assert_eq!(dict.get(&key), model.get(&key)),
    }
    assert_eq!(dict.len(), model.len());
  }

  assert_balanced(&dict);
  assert!(dict.iter().eq(model.iter()));
}

#[test]
fn test_debug_is_sorted_map() {
  let dict: Dict<u8, char> = [(2, 'b'), (1, 'a')].into_iter().collect();
  assert_eq!(format!("{dict:?}"), "{1: 'a', 2: 'b'}");
}
