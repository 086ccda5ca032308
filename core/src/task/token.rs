//! Completion tokens

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque one-shot handle correlating a result with its waiting invocation.
///
/// Tokens render as 32 lowercase hex characters and can travel as raw bytes,
/// so an out-of-band completer only needs to keep the token around.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionToken(Uuid);

impl CompletionToken {
    /// Generate a fresh random token
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Raw 16-byte representation
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }

    /// Parse the raw byte representation produced by [`to_bytes`](Self::to_bytes)
    pub fn from_bytes(bytes: &[u8]) -> CoreResult<Self> {
        Uuid::from_slice(bytes)
            .map(Self)
            .map_err(|_| CoreError::InvalidToken(format!("expected 16 bytes, got {}", bytes.len())))
    }

    pub(crate) fn shard_key(&self) -> u64 {
        let (hi, lo) = self.0.as_u64_pair();
        hi ^ lo
    }
}

impl fmt::Display for CompletionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl fmt::Debug for CompletionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompletionToken({})", self.0.simple())
    }
}

impl FromStr for CompletionToken {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| CoreError::InvalidToken(s.to_string()))
    }
}

/// Map a token to one of `shards` buckets
pub fn shard_index(token: &CompletionToken, shards: usize) -> usize {
    (token.shard_key() % shards.max(1) as u64) as usize
}
