//! Cartesian product and k-combination sequences.
//!
//! Both are plain iterators over owned `Vec<T>` rows. They are `Clone`, so a
//! sequence can be restarted by cloning it before consumption. Enumeration
//! order is fixed: the flip and choose transforms allocate new arena keys in
//! this order, so changing it renumbers their output.

/// Cartesian product of `sets`, rightmost set varying fastest.
///
/// An empty outer list, or any empty inner set, yields nothing.
pub fn product<T: Clone>(sets: Vec<Vec<T>>) -> Product<T> {
    let done = sets.is_empty() || sets.iter().any(Vec::is_empty);
    Product {
        indices: vec![0; sets.len()],
        sets,
        done,
    }
}

/// Iterator returned by [`product`].
#[derive(Debug, Clone)]
pub struct Product<T> {
    sets: Vec<Vec<T>>,
    indices: Vec<usize>,
    done: bool,
}

impl<T: Clone> Iterator for Product<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.done {
            return None;
        }
        let row = self
            .indices
            .iter()
            .zip(&self.sets)
            .map(|(index, set)| set[*index].clone())
            .collect();

        // Odometer increment: bump the rightmost digit, carry leftwards.
        let mut position = self.sets.len();
        loop {
            if position == 0 {
                self.done = true;
                break;
            }
            position -= 1;
            self.indices[position] += 1;
            if self.indices[position] < self.sets[position].len() {
                break;
            }
            self.indices[position] = 0;
        }

        Some(row)
    }
}

/// All `k`-element combinations of `items`, in lexicographic index order.
///
/// `k == 0` yields one empty combination; `k > items.len()` yields nothing.
pub fn choose<T: Clone>(items: Vec<T>, k: usize) -> Choose<T> {
    let done = k > items.len();
    Choose {
        indices: (0..k).collect(),
        items,
        done,
    }
}

/// Iterator returned by [`choose`].
#[derive(Debug, Clone)]
pub struct Choose<T> {
    items: Vec<T>,
    indices: Vec<usize>,
    done: bool,
}

impl<T: Clone> Iterator for Choose<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.done {
            return None;
        }
        let row = self.indices.iter().map(|i| self.items[*i].clone()).collect();

        // Advance the rightmost index that still has room, then pack the
        // indices after it. Matches "pick current, recurse on the remainder".
        let n = self.items.len();
        let k = self.indices.len();
        match (0..k).rev().find(|&i| self.indices[i] < n - k + i) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(row)
    }
}
