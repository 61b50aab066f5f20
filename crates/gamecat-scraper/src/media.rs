//! Image transfer into the content backend's upload endpoint.
//!
//! Each image is downloaded from its catalog URL and re-posted as a
//! `multipart/form-data` file attached to a stored game.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;

use crate::error::ScraperError;

/// Media field of a game an uploaded file is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaField {
    Cover,
    Gallery,
}

impl MediaField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MediaField::Cover => "cover",
            MediaField::Gallery => "gallery",
        }
    }
}

impl std::fmt::Display for MediaField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct MediaClient {
    client: Client,
    upload_url: String,
    upload_ref: String,
    upload_token: Option<String>,
}

impl MediaClient {
    /// Creates a client posting to `upload_url`. `upload_ref` is sent as the
    /// `ref` field (the entity type the file belongs to) and `upload_token`,
    /// when set, as a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `upload_url` does not parse, or
    /// [`ScraperError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn new(
        upload_url: &str,
        upload_ref: &str,
        upload_token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        reqwest::Url::parse(upload_url).map_err(|e| ScraperError::InvalidUrl {
            url: upload_url.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            upload_url: upload_url.to_owned(),
            upload_ref: upload_ref.to_owned(),
            upload_token: upload_token.map(str::to_owned),
        })
    }

    /// Downloads an image and returns its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] on network failure, or
    /// [`ScraperError::NotFound`] / [`ScraperError::UnexpectedStatus`] for
    /// non-2xx responses.
    pub async fn fetch_image(&self, image_url: &str) -> Result<Vec<u8>, ScraperError> {
        let response = self.client.get(image_url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: image_url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: image_url.to_owned(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Posts `bytes` as `{file_stem}.jpg` attached to `field` of entity `ref_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] on network failure or
    /// [`ScraperError::UnexpectedStatus`] if the endpoint rejects the upload.
    pub async fn upload_image(
        &self,
        ref_id: i64,
        field: MediaField,
        file_stem: &str,
        bytes: Vec<u8>,
    ) -> Result<(), ScraperError> {
        let file = Part::bytes(bytes)
            .file_name(format!("{file_stem}.jpg"))
            .mime_str("image/jpeg")?;
        let form = Form::new()
            .text("refId", ref_id.to_string())
            .text("ref", self.upload_ref.clone())
            .text("field", field.as_str())
            .part("files", file);

        let mut request = self.client.post(&self.upload_url).multipart(form);
        if let Some(token) = &self.upload_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.upload_url.clone(),
            });
        }
        Ok(())
    }

    /// Downloads `image_url` and uploads it to `field` of entity `ref_id`.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_image`] or [`Self::upload_image`].
    pub async fn transfer_image(
        &self,
        image_url: &str,
        ref_id: i64,
        field: MediaField,
        file_stem: &str,
    ) -> Result<(), ScraperError> {
        let bytes = self.fetch_image(image_url).await?;
        tracing::info!(ref_id, field = %field, file = %format!("{file_stem}.jpg"), "uploading image");
        self.upload_image(ref_id, field, file_stem, bytes).await
    }
}
