/// Raw-ordered item storage plus the filtered active view.
///
/// This is the slice of the chart's data table that layout needs: item
/// count, data-index to raw-index translation, per-item value and model
/// lookup, and a layout slot per item. `M` is the per-item model (config
/// overrides), `L` the per-item layout result. Layout slots are raw-indexed
/// so they survive refiltering.
#[derive(Debug, Clone)]
pub struct ItemData<M, L> {
    models: Vec<M>,
    values: Vec<f64>,
    layouts: Vec<Option<L>>,
    /// `active[data_index] == raw_index`; kept in ascending raw order.
    active: Vec<usize>,
}

impl<M, L> ItemData<M, L> {
    /// Builds a table with an all-active view. `values` is padded with NaN
    /// when shorter than `models`.
    pub fn new(models: Vec<M>, mut values: Vec<f64>) -> Self {
        let len = models.len();
        values.resize(len, f64::NAN);
        values.truncate(len);
        Self {
            models,
            values,
            layouts: (0..len).map(|_| None).collect(),
            active: (0..len).collect(),
        }
    }

    /// Number of active items.
    pub fn count(&self) -> usize {
        self.active.len()
    }

    /// Number of raw items, including filtered-out ones.
    pub fn raw_len(&self) -> usize {
        self.models.len()
    }

    pub fn raw_index(&self, data_index: usize) -> Option<usize> {
        self.active.get(data_index).copied()
    }

    /// Raw value of an active item; NaN when the index is out of view.
    pub fn value(&self, data_index: usize) -> f64 {
        self.raw_index(data_index)
            .map_or(f64::NAN, |raw| self.values[raw])
    }

    /// Active values in view order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.active.iter().map(|&raw| self.values[raw])
    }

    pub fn model(&self, data_index: usize) -> Option<&M> {
        self.raw_index(data_index).map(|raw| &self.models[raw])
    }

    pub fn model_raw(&self, raw_index: usize) -> Option<&M> {
        self.models.get(raw_index)
    }

    pub fn layout(&self, data_index: usize) -> Option<&L> {
        self.raw_index(data_index)
            .and_then(|raw| self.layouts[raw].as_ref())
    }

    pub fn layout_mut(&mut self, data_index: usize) -> Option<&mut L> {
        let raw = self.raw_index(data_index)?;
        self.layouts[raw].as_mut()
    }

    pub fn set_layout(&mut self, data_index: usize, layout: L) {
        if let Some(raw) = self.raw_index(data_index) {
            self.layouts[raw] = Some(layout);
        }
    }

    /// Merge-style update: mutates the existing layout slot, creating it
    /// from `init` first when empty.
    pub fn update_layout(&mut self, data_index: usize, init: impl FnOnce() -> L, f: impl FnOnce(&mut L)) {
        let Some(raw) = self.raw_index(data_index) else {
            return;
        };
        let slot = self.layouts[raw].get_or_insert_with(init);
        f(slot);
    }

    pub fn clear_layouts(&mut self) {
        for slot in &mut self.layouts {
            *slot = None;
        }
    }

    /// Narrows the active view to the items the predicate keeps. The
    /// predicate receives the current data index and the raw index; surviving
    /// items are renumbered compactly in order.
    pub fn filter_self(&mut self, mut keep: impl FnMut(usize, usize) -> bool) {
        let mut kept = Vec::with_capacity(self.active.len());
        for (data_index, &raw) in self.active.iter().enumerate() {
            if keep(data_index, raw) {
                kept.push(raw);
            }
        }
        self.active = kept;
    }

    /// Restores the all-active view (layout slots are kept).
    pub fn reset_view(&mut self) {
        self.active = (0..self.models.len()).collect();
    }
}
