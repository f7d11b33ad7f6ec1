//! Unlocked-session state machine.
//!
//! The decrypted keypair lives only in the volatile store, next to the time
//! it was last used. Any read that finds the record older than the lock
//! timeout deletes it, which is how `Unlocked → Locked` happens on inactivity.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::STORAGE_KEY_SESSION;
use crate::error::{WalletError, WalletResult};
use crate::mldsa::{KeyPair, KeyPairRecord};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WalletState {
    NoVault,
    Locked,
    Unlocked,
}

impl WalletState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletState::NoVault => "noVault",
            WalletState::Locked => "locked",
            WalletState::Unlocked => "unlocked",
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    keypair: KeyPairRecord,
    last_active: u64,
}

pub struct SessionStore<S, C> {
    store: S,
    clock: C,
    timeout_ms: u64,
}

impl<S: KeyValueStore, C: Clock> SessionStore<S, C> {
    pub fn new(store: S, clock: C, timeout_ms: u64) -> Self {
        Self {
            store,
            clock,
            timeout_ms,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Begin (or replace) the session with `keypair`, active as of now.
    pub async fn start(&self, keypair: &KeyPair) -> WalletResult<()> {
        self.write(keypair.to_record(), self.clock.now_ms()).await?;
        info!("Session started for {}", keypair.address());
        Ok(())
    }

    /// Drop the session. Idempotent.
    pub async fn clear(&self) -> WalletResult<()> {
        self.store.remove(STORAGE_KEY_SESSION).await
    }

    /// The unlocked keypair, refreshing the inactivity window. `None` when no
    /// session exists or it has just expired.
    pub async fn keypair(&self) -> WalletResult<Option<KeyPair>> {
        let Some(record) = self.live_record().await? else {
            return Ok(None);
        };
        let keypair = KeyPair::from_record(&record.keypair)?;

        // A lock that landed while we were reading must not be undone.
        if self.store.get(STORAGE_KEY_SESSION).await?.is_none() {
            debug!("Session cleared during refresh; staying locked");
            return Ok(None);
        }
        self.write(record.keypair, self.clock.now_ms()).await?;
        Ok(Some(keypair))
    }

    /// Like [`keypair`](Self::keypair) but a missing session is an error.
    pub async fn require_keypair(&self) -> WalletResult<KeyPair> {
        self.keypair().await?.ok_or(WalletError::WalletLocked)
    }

    /// Whether a live session exists. A successful check counts as activity.
    pub async fn is_unlocked(&self) -> WalletResult<bool> {
        Ok(self.keypair().await?.is_some())
    }

    async fn live_record(&self) -> WalletResult<Option<SessionRecord>> {
        let Some(value) = self.store.get(STORAGE_KEY_SESSION).await? else {
            return Ok(None);
        };
        let record: SessionRecord = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(_) => {
                debug!("Discarding undecodable session record");
                self.clear().await?;
                return Ok(None);
            }
        };

        let now = self.clock.now_ms();
        if now.saturating_sub(record.last_active) > self.timeout_ms {
            self.clear().await?;
            info!("Session expired after inactivity; wallet locked");
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn write(&self, keypair: KeyPairRecord, last_active: u64) -> WalletResult<()> {
        let record = SessionRecord {
            keypair,
            last_active,
        };
        let value = serde_json::to_value(&record)
            .map_err(|e| WalletError::storage(format!("failed to encode session: {}", e)))?;
        self.store.set(STORAGE_KEY_SESSION, value).await
    }
}
