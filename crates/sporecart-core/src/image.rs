use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobHandle {
    pub id: u64,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    /// Already a usable URL or data URI.
    Raw { value: String },
    /// A file picked on the device and not yet uploaded.
    LocalFile(BlobHandle),
    /// A stored media record relative to the media host.
    RemoteRecord { path: String },
}

impl ImageSource {
    pub fn resolve(&self, media_base_url: &str) -> String {
        match self {
            Self::Raw { value } => value.clone(),
            Self::LocalFile(handle) => format!("blob:{}/{}", handle.id, handle.file_name),
            Self::RemoteRecord { path } => format!(
                "{}/{}",
                media_base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
        }
    }
}
