//! CLI command handlers

pub mod init;
pub mod show;
pub mod vote;

use crate::config::CliConfig;
use blindpoll_effects::{ConsoleNotifier, FileDocumentStore, PollEffectSystem, PushIdGenerator};
use std::sync::Arc;

/// Effect system used by every command.
pub type CliEffects = PollEffectSystem<FileDocumentStore, PushIdGenerator, ConsoleNotifier>;

/// File store for the configured document and poll.
pub fn file_store(config: &CliConfig) -> FileDocumentStore {
    FileDocumentStore::new(config.store_path.clone(), config.poll_id)
}

/// Production handlers wired for `config`.
pub fn effect_system(config: &CliConfig) -> Arc<CliEffects> {
    Arc::new(PollEffectSystem::new(
        file_store(config),
        PushIdGenerator::new(),
        ConsoleNotifier,
    ))
}
