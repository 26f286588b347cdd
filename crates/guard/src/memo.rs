/// Single-slot memo: keeps the last key and its value.
///
/// The value is recomputed only when the key differs from the stored one.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
    recomputations: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            slot: None,
            recomputations: 0,
        }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> &V {
        let entry = match self.slot.take() {
            Some((stored, value)) if stored == key => (stored, value),
            _ => {
                self.recomputations += 1;
                let value = compute(&key);
                (key, value)
            }
        };
        &self.slot.insert(entry).1
    }

    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recomputes_only_on_key_change() {
        let mut memo = Memo::new();
        assert_eq!(*memo.get_or_compute(1, |k| k * 10), 10);
        assert_eq!(*memo.get_or_compute(1, |_| unreachable!()), 10);
        assert_eq!(memo.recomputations(), 1);

        assert_eq!(*memo.get_or_compute(2, |k| k * 10), 20);
        assert_eq!(memo.recomputations(), 2);
    }

    #[test]
    fn clear_forces_recompute() {
        let mut memo = Memo::new();
        memo.get_or_compute("a", |_| 1);
        memo.clear();
        memo.get_or_compute("a", |_| 1);
        assert_eq!(memo.recomputations(), 2);
    }
}
