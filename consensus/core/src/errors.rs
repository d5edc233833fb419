use crate::tx::TransactionId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("envelope is empty")]
    Empty,

    #[error("unexpected end of data at offset {offset}: {needed} more bytes needed")]
    UnexpectedEnd { offset: usize, needed: usize },

    #[error("{0} trailing bytes after the envelope")]
    TrailingBytes(usize),

    #[error("unknown envelope prefix {0:#010x}")]
    UnknownPrefix(u32),

    #[error("length {0} does not fit in memory")]
    LengthOverflow(u64),

    #[error("invalid transaction format byte {0}")]
    InvalidTxFormat(u8),

    #[error("bump index {index} is out of range, the envelope carries {count} merkle paths")]
    BumpIndexOutOfRange { index: u64, count: usize },

    #[error("merkle path tree height {0} is out of range")]
    InvalidTreeHeight(u8),

    #[error("envelope carries no transaction")]
    NoTransactions,

    #[error("subject transaction {0} is not included in the envelope")]
    SubjectNotFound(TransactionId),

    #[error("the last transaction of the envelope is only referenced by id")]
    SubjectIsTxidOnly,
}

pub type EnvelopeResult<T> = std::result::Result<T, EnvelopeError>;
