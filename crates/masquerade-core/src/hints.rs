//! Read-only access to pre-generated hint text.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;

/// The three progressively revealing hints for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintSet([String; 3]);

impl HintSet {
    /// Creates a hint set from its three texts, in disclosure order.
    #[must_use]
    pub fn new(first: String, second: String, third: String) -> Self {
        Self([first, second, third])
    }

    /// Returns the hint at a 1-based `index`, or `None` outside `1..=3`.
    #[must_use]
    pub fn hint(&self, index: u8) -> Option<&str> {
        let slot = usize::from(index).checked_sub(1)?;
        self.0.get(slot).map(String::as_str)
    }
}

/// Store of hint sets keyed by group and player.
#[async_trait]
pub trait HintStore: Send + Sync {
    /// Returns the player's hints, or `None` if none were generated.
    async fn get_hints(
        &self,
        group_id: Uuid,
        player_id: Uuid,
    ) -> Result<Option<HintSet>, DomainError>;
}
