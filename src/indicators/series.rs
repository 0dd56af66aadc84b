//! Offset-aligned indicator output.
//!
//! Indicators with different warm-up lengths produce vectors of different
//! sizes. [`AlignedSeries`] remembers which candle its first value belongs to,
//! so lookups go through candle indices or offsets from the latest candle
//! rather than raw indexing into the value vector.

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedSeries {
    values: Vec<f64>,
    warmup: usize,
}

impl AlignedSeries {
    /// Wrap values whose last element belongs to the last of `source_len` candles
    pub fn trailing(values: Vec<f64>, source_len: usize) -> Self {
        let warmup = source_len.saturating_sub(values.len());
        let values = if values.len() > source_len {
            values[values.len() - source_len..].to_vec()
        } else {
            values
        };
        Self { values, warmup }
    }

    /// Number of leading candles without a value
    pub fn warmup(&self) -> usize {
        self.warmup
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at a candle index of the source window
    pub fn at(&self, candle_index: usize) -> Option<f64> {
        candle_index
            .checked_sub(self.warmup)
            .and_then(|i| self.values.get(i))
            .copied()
    }

    /// Value `offset` candles before the latest one (0 = latest)
    pub fn back(&self, offset: usize) -> Option<f64> {
        self.values
            .len()
            .checked_sub(offset + 1)
            .and_then(|i| self.values.get(i))
            .copied()
    }

    pub fn latest(&self) -> Option<f64> {
        self.back(0)
    }

    pub fn previous(&self) -> Option<f64> {
        self.back(1)
    }
}
