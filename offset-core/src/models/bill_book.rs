//! Ordered, id-addressed list of bills.
//!
//! Entries keep insertion order. Every entry gets a [`BillId`] when it is
//! added; ids are never reused, so removing one bill leaves the ids of all
//! other bills untouched.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{Bill, BillError};

/// Stable identifier of a bill within one [`BillBook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillId(u64);

impl BillId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for BillId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for BillId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BillBookError {
    #[error("no bill with id {0}")]
    UnknownBill(BillId),

    #[error("bill {id} rejected: {source}")]
    InvalidBill {
        id: BillId,
        #[source]
        source: BillError,
    },
}

/// A single field edit, applied with [`BillBook::edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillField {
    Name(String),
    MonthlyCost(Decimal),
    InflationRate(Decimal),
}

/// A bill together with the id the book assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillEntry {
    pub id: BillId,
    #[serde(flatten)]
    pub bill: Bill,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillBook {
    next_id: u64,
    entries: Vec<BillEntry>,
}

impl Default for BillBook {
    fn default() -> Self {
        Self::new()
    }
}

impl BillBook {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
        }
    }

    /// Builds a book from bills in order, assigning ids starting at 1.
    ///
    /// Bills are taken as-is; call [`Bill::validate`] beforehand if they
    /// come from user input.
    pub fn from_bills(bills: impl IntoIterator<Item = Bill>) -> Self {
        let mut book = Self::new();
        for bill in bills {
            book.push(bill);
        }
        book
    }

    /// Appends a validated bill and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`BillBookError::InvalidBill`] (carrying the id the bill would
    /// have received) if the bill fails validation; the book is unchanged.
    pub fn add(
        &mut self,
        bill: Bill,
    ) -> Result<BillId, BillBookError> {
        bill.validate().map_err(|source| BillBookError::InvalidBill {
            id: BillId(self.next_id),
            source,
        })?;
        Ok(self.push(bill))
    }

    /// Appends an empty bill (no name, zero cost, zero inflation).
    pub fn add_default(&mut self) -> BillId {
        self.push(Bill::default())
    }

    fn push(
        &mut self,
        bill: Bill,
    ) -> BillId {
        let id = BillId(self.next_id);
        self.next_id += 1;
        debug!(%id, name = %bill.name, monthly_cost = %bill.monthly_cost, "bill added");
        self.entries.push(BillEntry { id, bill });
        id
    }

    /// Applies a single field edit to the bill with `id`.
    ///
    /// # Errors
    ///
    /// - [`BillBookError::UnknownBill`] if no such bill exists.
    /// - [`BillBookError::InvalidBill`] if the edited bill would fail
    ///   validation; the stored bill is left unchanged.
    pub fn edit(
        &mut self,
        id: BillId,
        field: BillField,
    ) -> Result<(), BillBookError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(BillBookError::UnknownBill(id))?;

        let mut edited = entry.bill.clone();
        match field {
            BillField::Name(name) => edited.name = name,
            BillField::MonthlyCost(cost) => edited.monthly_cost = cost,
            BillField::InflationRate(rate) => edited.inflation_rate_percent = rate,
        }
        edited
            .validate()
            .map_err(|source| BillBookError::InvalidBill { id, source })?;

        debug!(%id, "bill edited");
        entry.bill = edited;
        Ok(())
    }

    /// Removes the bill with `id` and returns it.
    pub fn remove(
        &mut self,
        id: BillId,
    ) -> Result<Bill, BillBookError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(BillBookError::UnknownBill(id))?;

        debug!(%id, "bill removed");
        Ok(self.entries.remove(index).bill)
    }

    pub fn get(
        &self,
        id: BillId,
    ) -> Option<&Bill> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.bill)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[BillEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn internet() -> Bill {
        Bill::new("Internet", dec!(35), dec!(2))
    }

    fn electricity() -> Bill {
        Bill::new("Electricity", dec!(120), dec!(3))
    }

    #[test]
    fn new_book_is_empty() {
        let book = BillBook::new();

        assert!(book.is_empty());
        assert_eq!(book.len(), 0);
    }

    #[test]
    fn add_assigns_increasing_ids_in_order() {
        let mut book = BillBook::new();

        let first = book.add(internet()).unwrap();
        let second = book.add(electricity()).unwrap();

        assert_eq!(first, BillId::from(1));
        assert_eq!(second, BillId::from(2));
        let names: Vec<_> = book.entries().iter().map(|e| e.bill.name.as_str()).collect();
        assert_eq!(names, vec!["Internet", "Electricity"]);
    }

    #[test]
    fn add_rejects_invalid_bill_without_consuming_an_id() {
        let mut book = BillBook::new();

        let result = book.add(Bill::new("Bad", dec!(-1), dec!(0)));

        assert_eq!(
            result,
            Err(BillBookError::InvalidBill {
                id: BillId::from(1),
                source: BillError::NegativeMonthlyCost(dec!(-1)),
            })
        );
        assert!(book.is_empty());
        assert_eq!(book.add(internet()), Ok(BillId::from(1)));
    }

    #[test]
    fn add_default_appends_empty_bill() {
        let mut book = BillBook::new();

        let id = book.add_default();

        assert_eq!(book.get(id), Some(&Bill::default()));
    }

    #[test]
    fn remove_keeps_other_ids_stable() {
        let mut book = BillBook::from_bills([internet(), electricity(), Bill::default()]);

        let removed = book.remove(BillId::from(2)).unwrap();

        assert_eq!(removed, electricity());
        let ids: Vec<_> = book.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![BillId::from(1), BillId::from(3)]);
        assert_eq!(book.get(BillId::from(3)), Some(&Bill::default()));
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut book = BillBook::from_bills([internet()]);
        book.remove(BillId::from(1)).unwrap();

        let id = book.add_default();

        assert_eq!(id, BillId::from(2));
    }

    #[test]
    fn remove_unknown_id_fails() {
        let mut book = BillBook::new();

        assert_eq!(
            book.remove(BillId::from(7)),
            Err(BillBookError::UnknownBill(BillId::from(7)))
        );
    }

    #[test]
    fn edit_updates_single_field() {
        let mut book = BillBook::from_bills([internet()]);
        let id = BillId::from(1);

        book.edit(id, BillField::MonthlyCost(dec!(40))).unwrap();
        book.edit(id, BillField::Name("Fibre".to_string())).unwrap();

        let bill = book.get(id).unwrap();
        assert_eq!(bill.name, "Fibre");
        assert_eq!(bill.monthly_cost, dec!(40));
        assert_eq!(bill.inflation_rate_percent, dec!(2));
    }

    #[test]
    fn edit_rejects_invalid_value_and_keeps_bill() {
        let mut book = BillBook::from_bills([internet()]);
        let id = BillId::from(1);

        let result = book.edit(id, BillField::InflationRate(dec!(150)));

        assert_eq!(
            result,
            Err(BillBookError::InvalidBill {
                id,
                source: BillError::InvalidInflationRate(dec!(150)),
            })
        );
        assert_eq!(book.get(id), Some(&internet()));
    }

    #[test]
    fn edit_unknown_id_fails() {
        let mut book = BillBook::from_bills([internet()]);

        let result = book.edit(BillId::from(9), BillField::MonthlyCost(dec!(1)));

        assert_eq!(result, Err(BillBookError::UnknownBill(BillId::from(9))));
    }
}
