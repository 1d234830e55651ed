mod id;
mod transaction;

pub use id::{FixedIdGenerator, Id, IdGenerator, UuidIdGenerator};
pub use transaction::{
    Category, SubType, Transaction, TransactionDraft, TransactionKind, TransactionStatus,
};
