pub mod candidate;
pub mod invoice;
pub(crate) mod parse;
pub mod transaction;

pub use candidate::MatchCandidate;
pub use invoice::{Invoice, InvoiceInput};
pub use transaction::{BankTransaction, TransactionInput};
