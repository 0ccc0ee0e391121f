//! HTTP upload client for the hosted media store.
//!
//! Uploads go to `{upload_url}/{account}/upload` as a multipart form with the
//! file under `file` and the target folder under `folder`, authenticated with
//! the account's key/secret pair. The endpoint answers with a JSON document
//! carrying the stable `url` of the stored object.
//!
//! Format whitelisting happens here (the store's configuration), not in the
//! resource handlers.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use super::store::{MediaError, MediaStore};

pub struct CdnStore {
    http: reqwest::Client,
    endpoint: Url,
    key: String,
    secret: String,
    folder: String,
    allowed_formats: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UploadedMedia {
    #[serde(default)]
    url: Option<String>,
}

impl CdnStore {
    pub fn new(
        upload_url: &Url,
        account: &str,
        key: &str,
        secret: &str,
        folder: &str,
        allowed_formats: &[String],
    ) -> Result<Self, MediaError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(MediaError::Client)?;

        let mut endpoint = upload_url.clone();
        endpoint
            .path_segments_mut()
            .map_err(|_| MediaError::BadEndpoint)?
            .pop_if_empty()
            .push(account)
            .push("upload");

        Ok(Self {
            http,
            endpoint,
            key: key.to_string(),
            secret: secret.to_string(),
            folder: folder.to_string(),
            allowed_formats: allowed_formats
                .iter()
                .map(|f| f.to_ascii_lowercase())
                .collect(),
        })
    }

    /// Whitelist check on the file extension; returns the normalized format.
    fn check_format(&self, file_name: &str) -> Result<String, MediaError> {
        let format = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if format.is_empty() || !self.allowed_formats.contains(&format) {
            return Err(MediaError::UnsupportedFormat(format));
        }
        Ok(format)
    }
}

#[async_trait]
impl MediaStore for CdnStore {
    async fn put(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Vec<u8>,
    ) -> Result<String, MediaError> {
        self.check_format(file_name)?;

        let mut part = Part::bytes(data).file_name(file_name.to_string());
        if let Some(content_type) = content_type {
            part = part.mime_str(content_type)?;
        }

        let form = Form::new()
            .text("folder", self.folder.clone())
            .part("file", part);

        let res = self
            .http
            .post(self.endpoint.clone())
            .basic_auth(&self.key, Some(&self.secret))
            .multipart(form)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(MediaError::Rejected(res.status().as_u16()));
        }

        let uploaded: UploadedMedia = res.json().await?;
        uploaded.url.ok_or(MediaError::MissingUrl)
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::CdnStore;
    use crate::services::media::MediaError;

    fn store() -> CdnStore {
        let formats: Vec<String> = ["jpeg", "png", "jpg", "gif"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        CdnStore::new(
            &Url::parse("https://media.example.com/v1").unwrap(),
            "acct_123",
            "key",
            "secret",
            "uploads",
            &formats,
        )
        .unwrap()
    }

    #[test]
    fn endpoint_includes_account_and_upload_segments() {
        assert_eq!(
            store().endpoint.as_str(),
            "https://media.example.com/v1/acct_123/upload"
        );
    }

    #[test]
    fn whitelisted_formats_pass_case_insensitively() {
        assert_eq!(store().check_format("photo.JPG").unwrap(), "jpg");
        assert_eq!(store().check_format("a.b.png").unwrap(), "png");
    }

    #[test]
    fn unlisted_or_missing_extensions_are_rejected() {
        assert!(matches!(
            store().check_format("malware.exe"),
            Err(MediaError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            store().check_format("noextension"),
            Err(MediaError::UnsupportedFormat(_))
        ));
    }
}
