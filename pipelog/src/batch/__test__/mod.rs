#[cfg(test)]
mod __test__ {
  use crate::batch::Batch;

  #[test]
  fn test_try_add_within_budget() {
    let mut batch = Batch::new(10);
    assert!(batch.try_add("hello"));
    assert!(batch.try_add("world"));
    assert_eq!(batch.current_bytes(), 10);
    assert_eq!(batch.len(), 2);
  }

  #[test]
  fn test_rejection_leaves_state_untouched() {
    let mut batch = Batch::new(6);
    assert!(batch.try_add("abcd"));
    assert!(!batch.try_add("efg"));
    assert_eq!(batch.current_bytes(), 4);
    assert_eq!(batch.entries(), &["abcd".to_string()]);
  }

  #[test]
  fn test_never_exceeds_budget() {
    let mut batch = Batch::new(50);
    for i in 0..200 {
      let entry = "x".repeat(i % 13);
      let _ = batch.try_add(&entry);
      assert!(batch.current_bytes() <= batch.max_bytes());
    }
  }

  #[test]
  fn test_counts_bytes_not_chars() {
    let mut batch = Batch::new(4);
    // two 2-byte characters
    assert!(batch.try_add("éé"));
    assert!(!batch.try_add("a"));
  }

  #[test]
  fn test_clear_resets() {
    let mut batch = Batch::new(16);
    batch.try_add("one");
    batch.try_add("two");
    batch.clear();
    assert_eq!(batch.current_bytes(), 0);
    assert!(batch.is_empty());
    assert!(batch.entries().is_empty());
  }

  #[test]
  fn test_join_uses_newlines() {
    let mut batch = Batch::new(64);
    batch.try_add("a");
    batch.try_add("b");
    batch.try_add("c");
    assert_eq!(batch.join(), "a\nb\nc");
  }

  #[test]
  fn test_flush_clear_retry_protocol() {
    let mut batch = Batch::new(5);
    let mut flushed = Vec::new();

    for event in ["abc", "de", "fgh", "ij"] {
      if !batch.try_add(event) {
        flushed.push(batch.join());
        batch.clear();
        assert!(batch.try_add(event));
      }
    }

    assert_eq!(flushed, vec!["abc\nde".to_string()]);
    assert_eq!(batch.join(), "fgh\nij");
  }
}
