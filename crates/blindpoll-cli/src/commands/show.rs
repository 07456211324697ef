//! Show command

use super::file_store;
use crate::config::CliConfig;
use anyhow::{Context, Result};
use blindpoll_core::PollStoreEffects;

/// Print items with vote counts and how many keys have been spent.
pub async fn run(config: &CliConfig) -> Result<()> {
    let store = file_store(config);
    let snapshot = store
        .fetch_current_poll()
        .await
        .with_context(|| format!("Failed to load poll from {}", store.path().display()))?;

    let used = snapshot
        .keys
        .iter()
        .filter(|key| snapshot.is_consumed_key(&key.value))
        .count();

    println!("=== Poll {} ===", config.poll_id);
    for (name, votes) in snapshot.tally() {
        println!("{name:<30} {votes}");
    }
    println!("Keys used: {used} of {}", snapshot.keys.len());

    Ok(())
}
