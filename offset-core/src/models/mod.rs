mod bill;
mod bill_book;
mod coverage;
mod investment;

pub use bill::{Bill, BillError};
pub use bill_book::{BillBook, BillBookError, BillEntry, BillField, BillId};
pub use coverage::{CoverageReport, CoverageResult};
pub use investment::{InvestmentError, InvestmentInput};
