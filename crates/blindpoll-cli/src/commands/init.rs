//! Init command

use super::file_store;
use crate::config::CliConfig;
use anyhow::{bail, Result};
use blindpoll_core::{PollItem, PollKey, PollSnapshot, AUTH_KEY_LEN};
use std::collections::BTreeSet;

/// Write a fresh poll with `items` and issued `keys`.
pub async fn run(config: &CliConfig, items: &[String], keys: &[String], force: bool) -> Result<()> {
    let snapshot = new_poll(items, keys)?;
    file_store(config).initialize(&snapshot, force).await?;

    println!(
        "Created poll {} with {} items and {} keys in {}",
        config.poll_id,
        snapshot.items.len(),
        snapshot.keys.len(),
        config.store_path.display()
    );
    Ok(())
}

fn new_poll(items: &[String], keys: &[String]) -> Result<PollSnapshot> {
    if items.len() < 2 {
        bail!("A poll needs at least two items");
    }
    if let Some(name) = first_duplicate(items) {
        bail!("Duplicate item name {name:?}");
    }
    if let Some(key) = first_duplicate(keys) {
        bail!("Duplicate auth key {key:?}");
    }

    for key in keys {
        let len = key.chars().count();
        if len != AUTH_KEY_LEN {
            tracing::warn!(len, "issued key can never pass validation");
        }
    }

    Ok(PollSnapshot::new(
        items.iter().map(PollItem::new).collect(),
        keys.iter().map(PollKey::new).collect(),
    ))
}

fn first_duplicate(values: &[String]) -> Option<&str> {
    let mut seen = BTreeSet::new();
    values
        .iter()
        .map(String::as_str)
        .find(|value| !seen.insert(*value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blindpoll_core::{PollId, PollStoreEffects};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_new_poll_rejects_duplicates() {
        assert!(new_poll(&strings(&["A", "B", "A"]), &[]).is_err());
        assert!(new_poll(
            &strings(&["A", "B"]),
            &strings(&["ABCDEFGHIJKLMNOP", "ABCDEFGHIJKLMNOP"])
        )
        .is_err());
        assert!(new_poll(&strings(&["A"]), &[]).is_err());
    }

    #[tokio::test]
    async fn test_init_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CliConfig {
            store_path: dir.path().join("poll.json"),
            ..CliConfig::default()
        };
        config.poll_id = PollId(1);

        run(&config, &strings(&["A", "B"]), &strings(&["ABCDEFGHIJKLMNOP"]), false)
            .await
            .unwrap();

        let snapshot = file_store(&config).fetch_current_poll().await.unwrap();
        assert_eq!(snapshot.item_names().collect::<Vec<_>>(), vec!["A", "B"]);
        assert!(snapshot.is_issued_key("ABCDEFGHIJKLMNOP"));
        assert!(run(&config, &strings(&["A", "B"]), &[], false).await.is_err());
    }
}
