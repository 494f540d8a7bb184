use crate::component::Component;
use crate::row::{self, Row};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Opaque token for one staged insert. Receipts are minted from a
/// per-collector counter, so they are unique within their collector and
/// ordered by staging time — a full flush replays hierarchy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Receipt(u64);

/// Flushed batch: per-component row lists, components in first-staged order.
pub struct Inserts<C> {
    entries: Vec<(Arc<C>, Vec<Row>)>,
}

impl<C: Component> Inserts<C> {
    fn new() -> Self {
        Inserts { entries: Vec::new() }
    }

    fn add(&mut self, component: Arc<C>, rows: Vec<Row>) {
        match self.entries.iter_mut().find(|(held, _)| held.name() == component.name()) {
            Some((_, existing)) => existing.extend(rows),
            None => self.entries.push((component, rows)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[Row]> {
        self.entries
            .iter()
            .find(|(component, _)| component.name() == name)
            .map(|(_, rows)| rows.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Arc<C>, Vec<Row>)> {
        self.entries.iter()
    }

    /// Number of components holding rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.entries.iter().map(|(_, rows)| rows.len()).sum()
    }
}

impl<C: Component> IntoIterator for Inserts<C> {
    type Item = (Arc<C>, Vec<Row>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Session store of pending inserts, bucketed by receipt. One collector may
/// serve several logical sessions at once; receipts are the unit of
/// isolation. The collector does not synchronize; concurrent producers need
/// their own guard around it.
pub struct Collector<C> {
    next_receipt: u64,
    staged: BTreeMap<Receipt, Vec<(Arc<C>, Vec<Row>)>>,
}

impl<C: Component> Collector<C> {
    pub fn new() -> Self {
        Collector { next_receipt: 0, staged: BTreeMap::new() }
    }

    fn mint(&mut self) -> Receipt {
        let receipt = Receipt(self.next_receipt);
        self.next_receipt += 1;
        receipt
    }

    /// Stages one row against a component under a fresh receipt. The row is
    /// restricted to the component's declared attributes here — the insert
    /// prep step — so callers can hand over their full attribute row
    /// regardless of target. The receipt is appended to the optional
    /// accumulator and returned.
    pub fn add_insert(
        &mut self,
        component: &Arc<C>,
        row: Row,
        receipts: Option<&mut Vec<Receipt>>,
    ) -> Receipt {
        let receipt = self.mint();
        let prepared = row::restricted(&row, component.attributes());
        self.staged
            .entry(receipt)
            .or_default()
            .push((component.clone(), vec![prepared]));
        if let Some(accumulator) = receipts {
            accumulator.push(receipt);
        }
        receipt
    }

    /// Flushes the selected receipts (all pending ones when `None`), merging
    /// their buckets per component. Flushed receipts are removed; unknown
    /// receipts are ignored. With nothing pending this yields an empty batch.
    pub fn collect_inserts(&mut self, receipts: Option<&[Receipt]>) -> Inserts<C> {
        let selected: Vec<Receipt> = match receipts {
            Some(receipts) => receipts.to_vec(),
            None => self.staged.keys().copied().collect(),
        };

        let mut inserts = Inserts::new();
        for receipt in selected {
            let Some(bucket) = self.staged.remove(&receipt) else { continue };
            for (component, rows) in bucket {
                inserts.add(component, rows);
            }
        }
        inserts
    }

    /// Non-destructive variant of [`collect_inserts`](Self::collect_inserts)
    /// over everything pending.
    pub fn inserts(&self) -> Inserts<C> {
        let mut inserts = Inserts::new();
        for bucket in self.staged.values() {
            for (component, rows) in bucket {
                inserts.add(component.clone(), rows.clone());
            }
        }
        inserts
    }

    /// Drops every pending receipt, starting a clean session.
    pub fn reset(&mut self) {
        self.staged.clear();
    }

    /// Number of pending receipts.
    pub fn pending(&self) -> usize {
        self.staged.len()
    }
}

impl<C: Component> Default for Collector<C> {
    fn default() -> Self {
        Self::new()
    }
}
