use super::types::SaveHandler;

/// Purge records older than `max_lifetime` seconds.
///
/// Meant for a periodic host task. Failures are logged and reported as `None`,
/// never raised, so they cannot disturb request handling.
pub async fn collect_garbage(handler: &mut dyn SaveHandler, max_lifetime: u64) -> Option<u64> {
    match handler.gc(max_lifetime).await {
        Ok(purged) => {
            tracing::info!(purged, max_lifetime, "Session garbage collection finished");
            Some(purged)
        }
        Err(e) => {
            tracing::error!(error = %e, max_lifetime, "Session garbage collection failed");
            None
        }
    }
}
