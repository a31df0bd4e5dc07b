mod __test__;

/// A byte-budgeted accumulator of rendered events.
///
/// Unlike a ring buffer, a full batch never evicts: [`Batch::try_add`] refuses
/// the new entry and leaves the batch untouched. The owner is expected to
/// flush ([`Batch::join`]), [`Batch::clear`], and retry.
///
/// A batch is owned by exactly one output and mutated only by the thread
/// driving that output, so it carries no synchronization.
#[derive(Debug, Clone)]
pub struct Batch {
  /// Pending entries in insertion order
  entries: Vec<String>,

  /// Sum of the byte lengths of `entries`
  current_bytes: usize,

  /// Upper bound for `current_bytes`
  max_bytes: usize,
}

impl Batch {
  /// Creates an empty batch that holds at most `max_bytes` bytes.
  ///
  /// # Example
  /// ```rust
  /// use pipelog::batch::Batch;
  ///
  /// let batch = Batch::new(1024);
  /// assert!(batch.is_empty());
  /// assert_eq!(batch.max_bytes(), 1024);
  /// ```
  pub fn new(max_bytes: usize) -> Self {
    Self {
      entries: Vec::new(),
      current_bytes: 0,
      max_bytes,
    }
  }

  /// Appends `entry` if it fits in the remaining budget.
  ///
  /// Returns `false` without mutating anything when
  /// `current_bytes + entry.len() > max_bytes`.
  ///
  /// # Example
  /// ```rust
  /// use pipelog::batch::Batch;
  ///
  /// let mut batch = Batch::new(8);
  /// assert!(batch.try_add("abcd"));
  /// assert!(batch.try_add("efgh"));
  /// assert!(!batch.try_add("i"));
  /// assert_eq!(batch.current_bytes(), 8);
  /// ```
  pub fn try_add(&mut self, entry: &str) -> bool {
    let len = entry.len();
    match self.current_bytes.checked_add(len) {
      Some(total) if total <= self.max_bytes => {
        self.entries.push(entry.to_string());
        self.current_bytes = total;
        true
      },
      _ => false,
    }
  }

  /// Joins the pending entries with `\n`, oldest first.
  pub fn join(&self) -> String {
    self.entries.join("\n")
  }

  pub fn clear(&mut self) {
    self.entries.clear();
    self.current_bytes = 0;
  }

  pub fn entries(&self) -> &[String] {
    &self.entries
  }

  #[inline]
  pub fn current_bytes(&self) -> usize {
    self.current_bytes
  }

  #[inline]
  pub fn max_bytes(&self) -> usize {
    self.max_bytes
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
