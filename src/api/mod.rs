//! Request handlers and form/upload plumbing.

mod account;
mod admin;
mod business;
mod lifestyle;
mod locations;
mod pages;

pub use account::*;
pub use admin::*;
pub use business::*;
pub use lifestyle::*;
pub use locations::*;
pub use pages::*;

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;

/// Region triple as it appears in query strings.
#[derive(Debug, Deserialize)]
pub struct RegionQuery {
    pub sido: String,
    pub sigungu: String,
    pub dong: String,
}

impl RegionQuery {
    pub fn into_triple(self) -> crate::models::RegionTriple {
        crate::models::RegionTriple {
            sido: self.sido,
            sigungu: self.sigungu,
            dong: self.dong,
        }
    }
}

/// Collected multipart form: text fields plus an optionally saved image.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    pub image_url: Option<String>,
}

impl FormData {
    /// Drain a multipart stream. Text fields are collected by name; a field
    /// named `image` carrying a file is persisted under `upload_dir` and
    /// exposed as `{url_prefix}/{uuid}.{ext}`.
    pub async fn from_multipart(
        mut multipart: Multipart,
        upload_dir: &Path,
        url_prefix: &str,
    ) -> Result<Self, AppError> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("잘못된 요청: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("잘못된 요청: {}", e)))?;
                // Empty file input on a form without a selection
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.image_url =
                    Some(save_upload(upload_dir, url_prefix, &filename, &bytes).await?);
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("잘못된 요청: {}", e)))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// A field that must be present and non-empty.
    pub fn required(&self, name: &str) -> Result<String, AppError> {
        self.optional(name)
            .ok_or_else(|| AppError::BadRequest(format!("{} 값이 필요합니다.", name)))
    }

    /// A field that may be absent; empty strings count as absent.
    pub fn optional(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Checkbox semantics: present means on.
    pub fn flag(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// Persist an uploaded image under a collision-resistant name and return
/// its public URL. Extension comes from the original filename, `jpg` when
/// it has none.
pub async fn save_upload(
    upload_dir: &Path,
    url_prefix: &str,
    original_filename: &str,
    bytes: &[u8],
) -> Result<String, AppError> {
    let ext = original_filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("jpg");
    let filename = format!("{}.{}", Uuid::new_v4(), ext);

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("upload dir: {}", e)))?;
    tokio::fs::write(upload_dir.join(&filename), bytes)
        .await
        .map_err(|e| AppError::Internal(format!("upload write: {}", e)))?;

    Ok(format!("{}/{}", url_prefix, filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_upload_names_and_extensions() {
        let dir = tempfile::tempdir().unwrap();

        let url = save_upload(dir.path(), "/static/uploads", "photo.png", b"data")
            .await
            .unwrap();
        assert!(url.starts_with("/static/uploads/"));
        assert!(url.ends_with(".png"));

        // No extension falls back to jpg
        let url = save_upload(dir.path(), "/static/uploads", "photo", b"data")
            .await
            .unwrap();
        assert!(url.ends_with(".jpg"));

        let saved = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(saved, 2);
    }

    #[test]
    fn test_form_field_semantics() {
        let mut form = FormData::default();
        form.fields.insert("name".to_string(), " 국밥집 ".to_string());
        form.fields.insert("phone".to_string(), "".to_string());
        form.fields.insert("opt_parking".to_string(), "on".to_string());

        assert_eq!(form.required("name").unwrap(), "국밥집");
        assert!(form.required("category").is_err());
        assert_eq!(form.optional("phone"), None);
        assert!(form.flag("opt_parking"));
        assert!(!form.flag("opt_wifi"));
    }
}
