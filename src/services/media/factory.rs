/// Factory: build the media store from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::media::{CdnStore, MediaError, MediaStore};

pub fn build_media_store(config: &Config) -> Result<Arc<dyn MediaStore>, MediaError> {
    let store = CdnStore::new(
        &config.media_upload_url,
        &config.media_account,
        &config.media_key,
        &config.media_secret,
        &config.media_folder,
        &config.media_allowed_formats,
    )?;

    Ok(Arc::new(store))
}
