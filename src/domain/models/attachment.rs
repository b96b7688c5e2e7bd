#[cfg(test)]
#[path = "attachment_test.rs"]
mod tests;

use std::path::Path;

use anyhow::bail;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;
use tokio::fs;

/// Coarse kind of a staged file, resolved from the MIME families the file
/// picker accepts: `image/*`, `application/pdf`, `audio/*` and `text/*`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttachmentType {
    Image,
    Pdf,
    Audio,
    Text,
}

impl AttachmentType {
    pub fn from_mime(mime: &str) -> Option<AttachmentType> {
        let mime = mime.trim().to_lowercase();
        if mime.starts_with("image/") {
            return Some(AttachmentType::Image);
        }
        if mime == "application/pdf" {
            return Some(AttachmentType::Pdf);
        }
        if mime.starts_with("audio/") {
            return Some(AttachmentType::Audio);
        }
        if mime.starts_with("text/") {
            return Some(AttachmentType::Text);
        }

        return None;
    }

    pub fn mime_from_extension(extension: &str) -> Option<&'static str> {
        let res = match extension.to_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            "svg" => "image/svg+xml",
            "heic" => "image/heic",
            "tif" | "tiff" => "image/tiff",
            "pdf" => "application/pdf",
            "mp3" => "audio/mpeg",
            "wav" => "audio/wav",
            "ogg" | "oga" => "audio/ogg",
            "m4a" => "audio/mp4",
            "flac" => "audio/flac",
            "aac" => "audio/aac",
            "txt" | "log" => "text/plain",
            "md" | "markdown" => "text/markdown",
            "csv" => "text/csv",
            "tsv" => "text/tab-separated-values",
            "html" | "htm" => "text/html",
            "xml" => "text/xml",
            _ => return None,
        };

        return Some(res);
    }

    /// Short label rendered in attachment chips.
    pub fn label(&self) -> &'static str {
        match self {
            AttachmentType::Image => return "IMG",
            AttachmentType::Pdf => return "PDF",
            AttachmentType::Audio => return "AUD",
            AttachmentType::Text => return "TXT",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentType,
    pub name: String,
    /// Local reference to the selected file. Nothing is uploaded.
    pub url: String,
}

impl Attachment {
    pub fn new(kind: AttachmentType, name: &str, url: &str) -> Attachment {
        return Attachment {
            kind,
            name: name.to_string(),
            url: url.to_string(),
        };
    }

    pub async fn from_path(path: &Path) -> Result<Attachment> {
        let display = path.to_string_lossy().to_string();
        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(_) => bail!(format!("No file found at {display}")),
        };
        if !metadata.is_file() {
            bail!(format!("{display} is not a file"));
        }

        let extension = path
            .extension()
            .map(|ext| return ext.to_string_lossy().to_string())
            .unwrap_or_default();

        let kind = match AttachmentType::mime_from_extension(&extension)
            .and_then(AttachmentType::from_mime)
        {
            Some(kind) => kind,
            None => bail!(format!(
                "{display} is not a supported file. Images, PDFs, audio recordings and text files can be attached."
            )),
        };

        let absolute = fs::canonicalize(path).await?;
        let name = path
            .file_name()
            .map(|name| return name.to_string_lossy().to_string())
            .unwrap_or(display);

        return Ok(Attachment {
            kind,
            name,
            url: format!("file://{}", absolute.to_string_lossy()),
        });
    }
}
