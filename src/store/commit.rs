//! Commit identities
//!
//! - Every successful `commit_write` is assigned exactly one commit identity
//! - Identities are strictly increasing, starting at 1
//! - No two commits share an identity

use super::errors::TxError;

/// A totally ordered, opaque commit identity.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CommitId(u64);

impl CommitId {
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Tracks the highest assigned commit identity.
#[derive(Debug, Default)]
pub struct CommitAuthority {
    highest_commit_id: u64,
}

impl CommitAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// The identity the next commit will receive.
    pub fn next_commit_id(&self) -> CommitId {
        CommitId::new(self.highest_commit_id + 1)
    }

    /// Records `commit_id` as committed. It must be exactly `next_commit_id()`.
    pub fn mark_committed(&mut self, commit_id: CommitId) -> Result<(), TxError> {
        let expected = self.highest_commit_id + 1;
        if commit_id.value() != expected {
            return Err(TxError::CommitOrder(format!(
                "attempted {} but expected {}",
                commit_id.value(),
                expected
            )));
        }
        self.highest_commit_id = commit_id.value();
        Ok(())
    }

    /// Highest committed identity, `None` before the first commit.
    pub fn highest_commit_id(&self) -> Option<CommitId> {
        if self.highest_commit_id == 0 {
            None
        } else {
            Some(CommitId::new(self.highest_commit_id))
        }
    }
}
