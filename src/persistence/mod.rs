//! Save and restore

pub mod snapshot;
pub mod storage;

pub use snapshot::{SaveData, CURRENT_SCHEMA_VERSION};
pub use storage::{
    delete_save, has_save, load_backup, load_game, load_with_fallback, save_game, FileSaveStore,
    MemorySaveStore, SaveSlot, SaveStore,
};
