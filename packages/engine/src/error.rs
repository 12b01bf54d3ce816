use thiserror::Error;

/// Failures surfaced by the economy and contest operations.
///
/// Every operation either fully succeeds or returns one of these with no
/// observable state change. Callers map these to their own presentation;
/// the engine never produces user-facing text beyond the `Display` messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: i64, required: i64 },

    #[error("invalid membership level: {0}")]
    InvalidLevel(u8),

    #[error("an active membership is required")]
    MembershipRequired,

    #[error("membership has expired")]
    MembershipExpired,

    #[error("contest not found")]
    ContestNotFound,

    #[error("contest is not open for registration")]
    ContestNotOpen,

    #[error("contest has reached its participant limit")]
    ContestFull,

    #[error("already registered for this contest")]
    AlreadyRegistered,

    #[error("not registered for this contest")]
    NotRegistered,

    #[error("participation is already finished")]
    AlreadyFinished,

    #[error("question {0} not found")]
    QuestionNotFound(i64),
}

pub type Result<T> = std::result::Result<T, EngineError>;
