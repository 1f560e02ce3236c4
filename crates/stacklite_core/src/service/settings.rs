//! User preference load/save over the `userSettings` key.

use crate::model::settings::UserSettings;
use crate::store::{keys, Store, StoreResult};

/// Current preferences; first-run defaults when absent or malformed.
pub fn load_settings(store: &Store) -> UserSettings {
    store.read(keys::USER_SETTINGS)
}

/// Persists preferences as a whole-key write.
pub fn save_settings(store: &Store, settings: &UserSettings) -> StoreResult<()> {
    store.write(keys::USER_SETTINGS, settings)?;
    log::debug!(
        "event=settings_saved module=settings status=ok theme={} language={}",
        settings.theme,
        settings.language
    );
    Ok(())
}
