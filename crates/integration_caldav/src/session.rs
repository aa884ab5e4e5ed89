//! Shared CalDAV connection handle
//!
//! Holds the current [`HttpCalDavClient`] behind a lock. Callers take a
//! lease (an `Arc` clone) per operation, so a reconnect swaps the client for
//! later callers while in-flight requests finish on the old one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tracing::{info, instrument, warn};

use crate::client::{CalDavConfig, CalDavError, HttpCalDavClient};

/// Lease-scoped access to a CalDAV client with health checks and reconnects
#[derive(Debug)]
pub struct CalDavSession {
    config: CalDavConfig,
    client: RwLock<Arc<HttpCalDavClient>>,
    revalidate_after: Duration,
    last_validated: Mutex<Option<Instant>>,
    reconnects: AtomicU32,
}

impl CalDavSession {
    /// Create a session; no request is made until the first check
    pub fn new(config: CalDavConfig, revalidate_after: Duration) -> Result<Self, CalDavError> {
        let client = HttpCalDavClient::new(config.clone())?;
        Ok(Self {
            config,
            client: RwLock::new(Arc::new(client)),
            revalidate_after,
            last_validated: Mutex::new(None),
            reconnects: AtomicU32::new(0),
        })
    }

    /// Current client for one operation
    #[must_use]
    pub fn lease(&self) -> Arc<HttpCalDavClient> {
        Arc::clone(&self.client.read())
    }

    /// Number of reconnects since creation
    #[must_use]
    pub fn reconnect_count(&self) -> u32 {
        self.reconnects.load(Ordering::Relaxed)
    }

    /// Probe the server with the current client
    pub async fn health_check(&self) -> Result<(), CalDavError> {
        let client = self.lease();
        client.health_check().await?;
        *self.last_validated.lock() = Some(Instant::now());
        Ok(())
    }

    /// Replace the client with a freshly built one
    pub fn reconnect(&self) -> Result<(), CalDavError> {
        let fresh = HttpCalDavClient::new(self.config.clone())?;
        *self.client.write() = Arc::new(fresh);
        *self.last_validated.lock() = None;
        let count = self.reconnects.fetch_add(1, Ordering::Relaxed) + 1;
        info!(reconnects = count, "CalDAV client rebuilt");
        Ok(())
    }

    fn needs_validation(&self) -> bool {
        self.last_validated
            .lock()
            .is_none_or(|at| at.elapsed() >= self.revalidate_after)
    }

    /// Lease a client, validating it first when the last check is stale
    ///
    /// A transport failure triggers one reconnect and a second check. Any
    /// other failure (bad credentials, missing calendar home) is returned
    /// as-is.
    #[instrument(skip(self), fields(server = %self.config.server_url))]
    pub async fn ensure_healthy(&self) -> Result<Arc<HttpCalDavClient>, CalDavError> {
        if !self.needs_validation() {
            return Ok(self.lease());
        }

        match self.health_check().await {
            Ok(()) => Ok(self.lease()),
            Err(e) if e.is_transport() => {
                warn!(error = %e, "CalDAV health check failed, reconnecting");
                self.reconnect()?;
                self.health_check().await?;
                Ok(self.lease())
            },
            Err(e) => Err(e),
        }
    }
}
