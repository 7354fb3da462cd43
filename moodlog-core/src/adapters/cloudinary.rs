//! Cloudinary API client
//!
//! Uploads and deletes profile images through the Cloudinary REST API.
//! Requests are signed with SHA-256 over the sorted parameters followed by
//! the API secret.
//!
//! API Documentation: https://cloudinary.com/documentation/image_upload_api_reference

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::blocking::{multipart, Client, Response};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::CloudinaryConfig;
use crate::domain::result::{Error as DomainError, Result as DomainResult};
use crate::domain::{ImageRef, ImageUpload};
use crate::ports::AssetHost;

/// Default production API URL
pub const CLOUDINARY_PRODUCTION_URL: &str = "https://api.cloudinary.com";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Compute the request signature for a set of parameters.
///
/// Parameters are sorted by name, joined as `k=v&k=v`, and the secret is
/// appended before hashing.
pub(crate) fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Cloudinary-backed asset host
#[derive(Debug)]
pub struct CloudinaryAssetHost {
    client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
    base_url: String,
}

impl CloudinaryAssetHost {
    /// Create a client from loaded configuration.
    ///
    /// `base_url` in the config overrides the production API (used by tests
    /// and `CLOUDINARY_BASE_URL`).
    pub fn new(config: &CloudinaryConfig) -> Result<Self> {
        if config.cloud_name.is_empty() || config.api_key.is_empty() || config.api_secret.is_empty()
        {
            anyhow::bail!("Cloudinary cloud name, API key and API secret are all required");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or(CLOUDINARY_PRODUCTION_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            folder: config.folder.clone(),
            base_url,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/v1_1/{}/image/{}", self.base_url, self.cloud_name, action)
    }

    /// Upload an image into the configured folder
    pub fn upload_image(&self, file: &ImageUpload) -> Result<ImageRef> {
        let timestamp = Utc::now().timestamp().to_string();
        let signed = [
            ("folder", self.folder.clone()),
            ("timestamp", timestamp),
            ("unique_filename", "true".to_string()),
            ("use_filename", "true".to_string()),
        ];
        let signature = sign(&signed, &self.api_secret);

        let part = multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        let mut form = multipart::Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (name, value) in signed {
            form = form.text(name, value);
        }

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .map_err(|e| self.map_request_error(e))?;

        let response = self.check_response_status(response)?;
        let uploaded: UploadResponse = response
            .json()
            .context("Failed to parse Cloudinary upload response")?;

        tracing::debug!(public_id = %uploaded.public_id, "uploaded image");

        Ok(ImageRef {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    /// Delete an image by public id
    pub fn destroy(&self, public_id: &str) -> Result<()> {
        let timestamp = Utc::now().timestamp().to_string();
        let signed = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp.clone()),
        ];
        let signature = sign(&signed, &self.api_secret);

        let params = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
            ("api_key", self.api_key.clone()),
            ("signature", signature),
            ("signature_algorithm", "sha256".to_string()),
        ];

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&params)
            .send()
            .map_err(|e| self.map_request_error(e))?;

        let response = self.check_response_status(response)?;
        let destroyed: DestroyResponse = response
            .json()
            .context("Failed to parse Cloudinary destroy response")?;

        // "not found" comes back as HTTP 200 with a different result
        if destroyed.result != "ok" {
            anyhow::bail!("Cloudinary could not delete '{}': {}", public_id, destroyed.result);
        }
        Ok(())
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> anyhow::Error {
        if error.is_timeout() {
            anyhow::anyhow!("Connection timed out after 60 seconds")
        } else if error.is_connect() {
            anyhow::anyhow!("Unable to connect to Cloudinary servers")
        } else {
            anyhow::anyhow!("Cloudinary request failed: {}", error)
        }
    }

    /// Check response status and return appropriate errors
    fn check_response_status(&self, response: Response) -> Result<Response> {
        let status = response.status().as_u16();
        if status == 200 {
            return Ok(response);
        }

        let detail = response
            .json::<ErrorResponse>()
            .map(|e| e.error.message)
            .unwrap_or_default();

        match status {
            401 => anyhow::bail!(
                "Cloudinary authentication failed. Check the API key and secret. {}",
                detail
            ),
            420 | 429 => anyhow::bail!("Cloudinary rate limit exceeded. {}", detail),
            400 => anyhow::bail!("Cloudinary rejected the request: {}", detail),
            404 => anyhow::bail!("Cloudinary resource not found. {}", detail),
            status => anyhow::bail!("Cloudinary API error: HTTP {} {}", status, detail),
        }
    }
}

impl AssetHost for CloudinaryAssetHost {
    fn name(&self) -> &str {
        "cloudinary"
    }

    fn upload(&self, file: &ImageUpload) -> DomainResult<ImageRef> {
        self.upload_image(file)
            .map_err(|e| DomainError::asset_host(e.to_string()))
    }

    fn delete(&self, public_id: &str) -> DomainResult<()> {
        self.destroy(public_id)
            .map_err(|e| DomainError::asset_host(e.to_string()))
    }
}
