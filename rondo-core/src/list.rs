//! Bounded ordered list
//!
//! A fixed-capacity sequence that keeps its elements in the order the
//! caller inserted them. Storage is an inline array sized at compile
//! time; nothing is ever allocated. Inserting or removing in the middle
//! shifts the tail, which is O(n) and fine for the handful of entries a
//! scene holds.

use core::fmt;

/// Errors returned by [`BoundedOrderedList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ListError {
    /// Index past the current length
    OutOfRange,
    /// List is at capacity
    Full,
}

/// Fixed-capacity ordered list
///
/// Slots `0..len` are always occupied, slots `len..N` are always empty.
/// Iteration order is slot order, index 0 first.
pub struct BoundedOrderedList<T, const N: usize> {
    slots: [Option<T>; N],
    len: usize,
}

impl<T, const N: usize> Default for BoundedOrderedList<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> BoundedOrderedList<T, N> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            len: 0,
        }
    }

    /// Maximum number of elements
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of elements
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Result<&T, ListError> {
        if index >= self.len {
            return Err(ListError::OutOfRange);
        }
        self.slots[index].as_ref().ok_or(ListError::OutOfRange)
    }

    /// First element (the begin position)
    pub fn first(&self) -> Option<&T> {
        self.get(0).ok()
    }

    /// Last element
    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i).ok())
    }

    /// Append at the end
    pub fn push(&mut self, value: T) -> Result<(), ListError> {
        if self.is_full() {
            return Err(ListError::Full);
        }
        self.slots[self.len] = Some(value);
        self.len += 1;
        Ok(())
    }

    /// Insert `value` at `index`, shifting the tail toward the end
    ///
    /// `index == len()` appends. Fails with [`ListError::OutOfRange`] past
    /// the end and with [`ListError::Full`] at capacity; the list is left
    /// untouched on failure.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<(), ListError> {
        if index > self.len {
            return Err(ListError::OutOfRange);
        }
        if self.is_full() {
            return Err(ListError::Full);
        }

        // Slot `len` is empty; rotating it to `index` moves the tail up by one
        self.slots[index..=self.len].rotate_right(1);
        self.slots[index] = Some(value);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the element at `index`, shifting the tail toward the head
    pub fn remove_at(&mut self, index: usize) -> Result<T, ListError> {
        if index >= self.len {
            return Err(ListError::OutOfRange);
        }

        let removed = self.slots[index].take();
        self.slots[index..self.len].rotate_left(1);
        self.len -= 1;
        removed.ok_or(ListError::OutOfRange)
    }

    /// Remove every element
    pub fn clear(&mut self) {
        for slot in &mut self.slots[..self.len] {
            *slot = None;
        }
        self.len = 0;
    }

    /// Index of the first element matching `predicate`
    pub fn position<F>(&self, mut predicate: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().position(|item| predicate(item))
    }

    /// Iterate from the first element to the last
    ///
    /// Each call starts a fresh pass. The borrow on the list keeps it
    /// from being mutated while the iterator is alive.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.slots[..self.len].iter(),
        }
    }
}

impl<T: PartialEq, const N: usize> PartialEq for BoundedOrderedList<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, const N: usize> Eq for BoundedOrderedList<T, N> {}

impl<T: Clone, const N: usize> Clone for BoundedOrderedList<T, N> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            len: self.len,
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for BoundedOrderedList<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(feature = "defmt")]
impl<T: defmt::Format, const N: usize> defmt::Format for BoundedOrderedList<T, N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[");
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", item);
        }
        defmt::write!(f, "]");
    }
}

impl<'l, T, const N: usize> IntoIterator for &'l BoundedOrderedList<T, N> {
    type Item = &'l T;
    type IntoIter = Iter<'l, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward iterator over a [`BoundedOrderedList`]
#[derive(Debug, Clone)]
pub struct Iter<'l, T> {
    inner: core::slice::Iter<'l, Option<T>>,
}

impl<'l, T> Iterator for Iter<'l, T> {
    type Item = &'l T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().and_then(Option::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
