//! Growable array with shift-on-insert semantics.

use crate::error::{Error, Result};

const MIN_CAPACITY: usize = 1;

/// Dynamic, order-preserving sequence over a boxed slot array.
///
/// Growth policy: a full array of length `n` is reallocated to `2n` slots
/// while `n <= 8`, and to `n + n/8 + 7` slots beyond that.
///
/// # Examples
///
/// ```
/// use u_allocore::array::GrowableArray;
///
/// let mut arr = GrowableArray::new(2);
/// arr.append('a');
/// arr.append('c');
/// arr.insert(1, 'b').unwrap();
///
/// assert_eq!(arr.iter().collect::<String>(), "abc");
/// assert_eq!(arr.capacity(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct GrowableArray<T> {
    slots: Box<[Option<T>]>,
    len: usize,
}

impl<T> GrowableArray<T> {
    /// Creates an empty array with room for `capacity` items (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: empty_slots(capacity.max(MIN_CAPACITY)),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.len >= self.slots.len()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        self.slots[index].as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        self.slots[index].as_mut()
    }

    /// Last item, if any.
    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Replaces the item at `index`, returning the old one.
    pub fn set(&mut self, index: usize, item: T) -> Result<T> {
        let len = self.len;
        if index >= len {
            return Err(Error::OutOfBounds { index, len });
        }
        self.slots[index]
            .replace(item)
            .ok_or(Error::OutOfBounds { index, len })
    }

    /// Pushes `item` at the end, growing first if full.
    pub fn append(&mut self, item: T) {
        if self.is_full() {
            self.resize();
        }
        self.slots[self.len] = Some(item);
        self.len += 1;
    }

    /// Inserts `item` at `index`, shifting later items right.
    ///
    /// `index == len` appends.
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        if index > self.len {
            return Err(Error::OutOfBounds {
                index,
                len: self.len,
            });
        }
        if self.is_full() {
            self.resize();
        }
        self.slots[self.len] = Some(item);
        self.slots[index..=self.len].rotate_right(1);
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the item at `index`, shifting later items left.
    pub fn delete_at_index(&mut self, index: usize) -> Result<T> {
        let len = self.len;
        if index >= len {
            return Err(Error::OutOfBounds { index, len });
        }
        let item = self.slots[index]
            .take()
            .ok_or(Error::OutOfBounds { index, len })?;
        self.slots[index..len].rotate_left(1);
        self.len -= 1;
        Ok(item)
    }

    /// Drops every item, keeping the allocation.
    pub fn clear(&mut self) {
        for slot in &mut self.slots[..self.len] {
            *slot = None;
        }
        self.len = 0;
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.slots[..self.len].iter().filter_map(Option::as_ref)
    }

    fn new_capacity(&self) -> usize {
        let len = self.len;
        if len > 8 {
            len + (len >> 3) + 7
        } else {
            (2 * len).max(MIN_CAPACITY)
        }
    }

    fn resize(&mut self) {
        let mut grown = empty_slots(self.new_capacity());
        for (dst, src) in grown.iter_mut().zip(self.slots[..self.len].iter_mut()) {
            *dst = src.take();
        }
        self.slots = grown;
    }
}

impl<T: PartialEq> GrowableArray<T> {
    /// Position of the first item equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.iter().position(|x| x == item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    /// Removes the first item equal to `item`.
    pub fn remove(&mut self, item: &T) -> Option<T> {
        let index = self.index_of(item)?;
        self.delete_at_index(index).ok()
    }
}

impl<T> FromIterator<T> for GrowableArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut arr = Self::new(iter.size_hint().0);
        for item in iter {
            arr.append(item);
        }
        arr
    }
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_policy() {
        let mut arr = GrowableArray::new(0);
        assert_eq!(arr.capacity(), 1);
        let mut seen = vec![arr.capacity()];
        for i in 0..20 {
            arr.append(i);
            if *seen.last().unwrap() != arr.capacity() {
                seen.push(arr.capacity());
            }
        }
        // 1 -> 2 -> 4 -> 8 -> 16 (len 8 doubles) -> 16 + 2 + 7 = 25
        assert_eq!(seen, vec![1, 2, 4, 8, 16, 25]);
        assert_eq!(arr.len(), 20);
    }

    #[test]
    fn test_insert_shifts_right() {
        let mut arr: GrowableArray<i32> = [1, 2, 4].into_iter().collect();
        arr.insert(2, 3).unwrap();
        arr.insert(0, 0).unwrap();
        arr.insert(5, 5).unwrap();
        assert_eq!(arr.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(
            arr.insert(9, 9),
            Err(Error::OutOfBounds { index: 9, len: 6 })
        );
    }

    #[test]
    fn test_delete_shifts_left() {
        let mut arr: GrowableArray<&str> = ["a", "b", "c"].into_iter().collect();
        assert_eq!(arr.delete_at_index(0), Ok("a"));
        assert_eq!(arr.iter().copied().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(arr.delete_at_index(1), Ok("c"));
        assert_eq!(
            arr.delete_at_index(1),
            Err(Error::OutOfBounds { index: 1, len: 1 })
        );
        assert_eq!(arr.last(), Some(&"b"));
    }

    #[test]
    fn test_set_and_remove() {
        let mut arr: GrowableArray<i32> = [7, 8, 9].into_iter().collect();
        assert_eq!(arr.set(1, 80), Ok(8));
        assert!(arr.set(3, 0).is_err());
        assert_eq!(arr.remove(&80), Some(80));
        assert_eq!(arr.remove(&80), None);
        assert!(arr.contains(&9));
        assert_eq!(arr.index_of(&9), Some(1));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut arr: GrowableArray<u8> = (0..10).collect();
        let cap = arr.capacity();
        arr.clear();
        assert!(arr.is_empty());
        assert_eq!(arr.capacity(), cap);
        assert!(arr.get(0).is_none());
    }
}
