/// Deterministic set of feature indices backed by a bitset.
///
/// Indices are positions in the source `FeatureCollection`.
///
/// Ordering contract:
/// - Iteration yields indices in ascending order, i.e. source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    words: Vec<u64>,
    len: usize,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(feature_count: usize) -> Self {
        Self {
            words: Vec::with_capacity(feature_count.div_ceil(64)),
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.words.clear();
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        let (word, bit) = word_bit(index);
        self.words
            .get(word)
            .is_some_and(|w| (w & (1u64 << bit)) != 0)
    }

    /// Returns `true` if the set changed.
    pub fn insert(&mut self, index: usize) -> bool {
        self.ensure_capacity(index);
        let (word, bit) = word_bit(index);
        let mask = 1u64 << bit;
        let w = &mut self.words[word];
        if (*w & mask) != 0 {
            return false;
        }
        *w |= mask;
        self.len += 1;
        true
    }

    /// Returns `true` if the set changed.
    pub fn remove(&mut self, index: usize) -> bool {
        let (word, bit) = word_bit(index);
        let Some(w) = self.words.get_mut(word) else {
            return false;
        };
        let mask = 1u64 << bit;
        if (*w & mask) == 0 {
            return false;
        }
        *w &= !mask;
        self.len -= 1;
        true
    }

    /// Set difference: `self \ other`.
    pub fn diff(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.diff_in_place(other);
        out
    }

    pub fn diff_in_place(&mut self, other: &Self) {
        let min_words = other.words.len().min(self.words.len());
        for idx in 0..min_words {
            self.words[idx] &= !other.words[idx];
        }
        self.recount_len();
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        FeatureIndexIter {
            words: &self.words,
            word_index: 0,
            current_word: 0,
            base_index: 0,
        }
    }

    fn ensure_capacity(&mut self, index: usize) {
        let (word, _bit) = word_bit(index);
        if self.words.len() <= word {
            self.words.resize(word + 1, 0);
        }
    }

    fn recount_len(&mut self) {
        self.len = self.words.iter().map(|w| w.count_ones() as usize).sum();
    }
}

impl FromIterator<usize> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::new();
        for index in iter {
            set.insert(index);
        }
        set
    }
}

fn word_bit(index: usize) -> (usize, u32) {
    (index / 64, (index % 64) as u32)
}

struct FeatureIndexIter<'a> {
    words: &'a [u64],
    word_index: usize,
    current_word: u64,
    base_index: usize,
}

impl Iterator for FeatureIndexIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let tz = self.current_word.trailing_zeros();
                self.current_word &= !(1u64 << tz);
                return Some(self.base_index + tz as usize);
            }

            let w = *self.words.get(self.word_index)?;
            self.current_word = w;
            self.base_index = self.word_index * 64;
            self.word_index += 1;
        }
    }
}

/// The single feature the user has opened (the map popup target).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ActiveFeature {
    index: Option<usize>,
}

impl ActiveFeature {
    pub fn get(&self) -> Option<usize> {
        self.index
    }

    pub fn select(&mut self, index: usize) {
        self.index = Some(index);
    }

    pub fn clear(&mut self) {
        self.index = None;
    }

    /// Drops the selection if it is no longer among `visible`.
    ///
    /// Returns `true` if the selection was cleared.
    pub fn retain_visible(&mut self, visible: &FeatureSet) -> bool {
        match self.index {
            Some(i) if !visible.contains(i) => {
                self.index = None;
                true
            }
            _ => false,
        }
    }
}
