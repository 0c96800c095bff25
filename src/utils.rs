use crate::model::Price;

/// Accumulates a running sum for an arithmetic mean.
#[derive(Default, Debug, Clone, Copy)]
pub struct Average {
    total: Price,
    count: usize,
}

impl Average {
    pub fn feed(&mut self, value: Price) {
        self.total += value;
        self.count += 1;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn avg(&self) -> Option<Price> {
        (self.count > 0).then(|| self.total / self.count as Price)
    }
}
