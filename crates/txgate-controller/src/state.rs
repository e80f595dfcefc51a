//! Shared transaction state.
//!
//! The record is owned by the surrounding stack and shared process-wide. The
//! controller has exclusive write access to `in_progress` and writes the
//! `RfTransEnd` phase after a resume; the stack advances the other phases.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Phase of the current RF transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransactionPhase {
    /// No transaction has been observed since the last reset.
    #[default]
    Idle,
    /// RF transaction started.
    RfTransStart,
    /// RF transaction exchanging data.
    RfTransProgress,
    /// RF transaction ended.
    RfTransEnd,
}

impl std::fmt::Display for TransactionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionPhase::Idle => write!(f, "Idle"),
            TransactionPhase::RfTransStart => write!(f, "RF Trans Start"),
            TransactionPhase::RfTransProgress => write!(f, "RF Trans Progress"),
            TransactionPhase::RfTransEnd => write!(f, "RF Trans End"),
        }
    }
}

/// Plain copy of the shared record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionDetail {
    /// A requestor currently holds the channel.
    pub in_progress: bool,
    /// Phase marker.
    pub phase: TransactionPhase,
}

/// Process-wide transaction record, shared through an `Arc`.
#[derive(Debug, Default)]
pub struct SharedTransactionState {
    detail: RwLock<TransactionDetail>,
}

impl SharedTransactionState {
    /// Create a zeroed record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current record.
    #[must_use]
    pub fn snapshot(&self) -> TransactionDetail {
        *self.detail.read()
    }

    /// Whether a transaction is in progress.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.detail.read().in_progress
    }

    /// Current phase marker.
    #[must_use]
    pub fn phase(&self) -> TransactionPhase {
        self.detail.read().phase
    }

    /// Advance the phase marker.
    pub fn set_phase(&self, phase: TransactionPhase) {
        self.detail.write().phase = phase;
    }

    /// Reset every field to its zero value.
    pub fn zero(&self) {
        *self.detail.write() = TransactionDetail::default();
    }

    pub(crate) fn set_in_progress(&self, in_progress: bool) {
        self.detail.write().in_progress = in_progress;
    }
}
