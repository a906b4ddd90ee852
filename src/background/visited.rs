/// Fixed-size bitmap over a `width x height` grid, indexed by `y * width + x`
pub struct VisitedSet {
    width: usize,
    words: Vec<u64>,
}

impl VisitedSet {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width: width as usize,
            words: vec![0; len.div_ceil(64)],
        }
    }

    #[inline]
    fn locate(&self, x: u32, y: u32) -> (usize, u64) {
        let idx = y as usize * self.width + x as usize;
        (idx / 64, 1 << (idx % 64))
    }

    /// Mark a coordinate; returns false if it was already present
    #[inline]
    pub fn insert(&mut self, x: u32, y: u32) -> bool {
        let (word, bit) = self.locate(x, y);
        let fresh = self.words[word] & bit == 0;
        self.words[word] |= bit;
        fresh
    }
}

#[cfg(test)]
impl VisitedSet {
    fn contains(&self, x: u32, y: u32) -> bool {
        let (word, bit) = self.locate(x, y);
        self.words[word] & bit != 0
    }

    fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}
