//! Notification effect handlers

use async_trait::async_trait;
use blindpoll_core::NotificationEffects;
use std::io::Write;

/// Routes user messages into the tracing pipeline.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

#[async_trait]
impl NotificationEffects for TracingNotifier {
    async fn notify(&self, message: &str) {
        tracing::info!(target: "blindpoll::notify", "{message}");
    }
}

/// Prints user messages on stdout, one per line.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl NotificationEffects for ConsoleNotifier {
    async fn notify(&self, message: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{message}") {
            tracing::warn!(error = %e, "failed to print notification");
        }
    }
}
