//! Saving and restoring ledger state through a [`LedgerStore`].
//!
//! Positions are stored one blob per account; the condition timeline and
//! the token index are stored as metadata blobs. All blobs are bincode.

use tracing::info;
use vault_store::LedgerStore;

use crate::collaborators::Collaborators;
use crate::condition::ConditionTimeline;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::ledger::StakingLedger;
use crate::position::{PositionBook, StakingPosition};
use crate::state::LedgerState;
use crate::token_index::TokenIndex;

const TIMELINE_KEY: &[u8] = b"condition_timeline";
const TOKEN_INDEX_KEY: &[u8] = b"token_index";

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, LedgerError> {
    bincode::serialize(value).map_err(|e| LedgerError::Serialization(e.to_string()))
}

fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, LedgerError> {
    bincode::deserialize(bytes).map_err(|e| LedgerError::Serialization(e.to_string()))
}

impl StakingLedger {
    /// Persist the full ledger state.
    ///
    /// Takes the gate so the snapshot never observes a half-finished
    /// stake or withdraw.
    pub fn save_to_store(&self, store: &dyn LedgerStore) -> Result<(), LedgerError> {
        let _entry = self.gate().enter()?;
        let state = self.read()?;

        store.put_meta(TIMELINE_KEY, &encode(&state.timeline)?)?;
        store.put_meta(TOKEN_INDEX_KEY, &encode(&state.tokens)?)?;
        for (account, position) in state.positions.iter() {
            store.put_position(account, &encode(position)?)?;
        }
        info!(
            positions = state.positions.len(),
            conditions = state.timeline.len(),
            "ledger state saved"
        );
        Ok(())
    }

    /// Restore a ledger from `store`.
    ///
    /// A store with no saved timeline starts from the configured initial
    /// condition. A snapshot whose positions and token index disagree is
    /// rejected as corrupt.
    pub fn load_from_store(
        store: &dyn LedgerStore,
        config: LedgerConfig,
        collaborators: Collaborators,
    ) -> Result<Self, LedgerError> {
        config.validate()?;

        let timeline = match store.get_meta(TIMELINE_KEY)? {
            Some(bytes) => decode(&bytes)?,
            None => ConditionTimeline::with_initial(
                config.initial_time_unit,
                u128::from(config.initial_reward_rate),
                config.genesis,
            )?,
        };

        let tokens: TokenIndex = match store.get_meta(TOKEN_INDEX_KEY)? {
            Some(bytes) => decode(&bytes)?,
            None => TokenIndex::new(),
        };

        let mut positions = PositionBook::new();
        for (account, bytes) in store.iter_positions()? {
            let position: StakingPosition = decode(&bytes)?;
            positions.insert(account, position);
        }

        let state = LedgerState {
            timeline,
            positions,
            tokens,
        };
        if !state.is_consistent() {
            return Err(LedgerError::Store(
                "stored positions disagree with the token index".to_string(),
            ));
        }
        info!(
            positions = state.positions.len(),
            conditions = state.timeline.len(),
            "ledger state loaded"
        );
        Ok(Self::from_state(config, state, collaborators))
    }
}
