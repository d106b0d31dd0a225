use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::Location;

#[derive(Debug, Clone, PartialEq)]
pub enum CacheKey {
    NearbySearch {
        location: Location,
        radius: u32,
        place_type: String,
    },
    PlaceDetails(String),
    Weather(Location),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ~11m precision keeps nearby lookups from the same spot on one key
            CacheKey::NearbySearch {
                location,
                radius,
                place_type,
            } => write!(
                f,
                "nearby:{:.4},{:.4}:{}:{}",
                location.latitude,
                location.longitude,
                radius,
                place_type.to_lowercase()
            ),
            CacheKey::PlaceDetails(place_id) => write!(f, "place:{}", place_id),
            CacheKey::Weather(location) => write!(
                f,
                "weather:{:.2},{:.2}",
                location.latitude, location.longitude
            ),
        }
    }
}

/// Longest wait for the writer to flush its queue on shutdown
const SHUTDOWN_FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Creates a Redis client for caching
///
/// Opening the client does not connect; connections are made on first use.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for storing and retrieving data from Redis
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    writer: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Stops the cache writer and waits for it to flush queued writes
    ///
    /// Returns once the writer task has exited, or after
    /// `SHUTDOWN_FLUSH_TIMEOUT` if Redis is too slow to drain the queue.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");

        match tokio::time::timeout(SHUTDOWN_FLUSH_TIMEOUT, self.writer).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "Cache writer task failed"),
            Err(_) => tracing::warn!(
                timeout_secs = SHUTDOWN_FLUSH_TIMEOUT.as_secs(),
                "Cache writer did not finish flushing in time"
            ),
        }
    }
}

impl Cache {
    /// Creates a new Cache instance with an async write background task
    ///
    /// Cache writes are processed by a spawned task so that they never block
    /// API responses.
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let writer = tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        let handle = CacheWriterHandle {
            shutdown_tx,
            writer,
        };

        (cache, handle)
    }

    /// Background task that processes cache write messages
    ///
    /// One connection is reused across writes and reopened after a failure.
    /// On shutdown signal, drains whatever is already queued before exiting.
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");
        let mut failed_writes = 0u64;
        let mut conn: Option<MultiplexedConnection> = None;

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, &mut conn, msg).await {
                        failed_writes += 1;
                        tracing::error!(error = %e, failed_writes, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!(failed_writes, "Cache writer shutting down, flushing remaining writes");

                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, &mut conn, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!("Cache writer task stopped");
                    break;
                }
            }
        }
    }

    /// Writes a single message to Redis, connecting first if needed
    async fn write_to_redis(
        client: &Client,
        conn: &mut Option<MultiplexedConnection>,
        msg: CacheWriteMessage,
    ) -> AppResult<()> {
        let mut active = match conn.take() {
            Some(active) => active,
            None => client.get_multiplexed_async_connection().await?,
        };

        let written: redis::RedisResult<()> = active.set_ex(msg.key, msg.value, msg.ttl).await;
        if written.is_ok() {
            *conn = Some(active);
        }
        written?;
        Ok(())
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` on a miss. An unreachable Redis is logged and treated as
    /// a miss so that lookups fall through to the provider; a stored value that
    /// no longer deserializes is an error.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let cached: Option<String> = match self.read_raw(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Redis get failed, treating as cache miss");
                return Ok(None);
            }
        };

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                tracing::debug!(key = %key, "Cache hit");
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    async fn read_raw(&self, key: &CacheKey) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;
        Ok(cached)
    }

    /// Stores a value in the cache asynchronously without blocking
    ///
    /// The value is serialized here and handed to the background writer; the
    /// Redis write itself happens later.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}
