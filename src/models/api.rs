// src/models/api.rs

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Dropbox 元数据接口返回的目录项
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Entry {
    pub path: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default)]
    pub thumb_exists: bool,
    #[serde(default)]
    pub contents: Option<Vec<Entry>>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub rev: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, deserialize_with = "deserialize_rfc2822")]
    pub modified: Option<DateTime<FixedOffset>>,
}

impl Entry {
    /// 路径最后一段，用于显示
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

// Dropbox 的时间格式形如 "Sat, 21 Aug 2010 22:31:20 +0000"
fn deserialize_rfc2822<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| DateTime::parse_from_rfc2822(&s).ok()))
}

/// 服务端错误响应体
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub user_error: Option<String>,
}

/// 缩略图尺寸预设
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ThumbSize {
    Xs,
    S,
    M,
    L,
    Xl,
    #[value(name = "bestfit-640x480")]
    Bestfit640x480,
    #[default]
    #[value(name = "bestfit-960x640")]
    Bestfit960x640,
    #[value(name = "bestfit-1024x768")]
    Bestfit1024x768,
}

impl ThumbSize {
    pub fn as_query(&self) -> &'static str {
        match self {
            ThumbSize::Xs => "xs",
            ThumbSize::S => "s",
            ThumbSize::M => "m",
            ThumbSize::L => "l",
            ThumbSize::Xl => "xl",
            ThumbSize::Bestfit640x480 => "640x480_bestfit",
            ThumbSize::Bestfit960x640 => "960x640_bestfit",
            ThumbSize::Bestfit1024x768 => "1024x768_bestfit",
        }
    }
}

/// 缩略图格式预设
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ThumbFormat {
    #[default]
    Jpeg,
    Png,
}

impl ThumbFormat {
    pub fn as_query(&self) -> &'static str {
        match self {
            ThumbFormat::Jpeg => "JPEG",
            ThumbFormat::Png => "PNG",
        }
    }

    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            ThumbFormat::Jpeg => image::ImageFormat::Jpeg,
            ThumbFormat::Png => image::ImageFormat::Png,
        }
    }
}

impl fmt::Display for ThumbFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_deserializes_folder_listing() {
        let json = r#"{
            "path": "/Photos",
            "is_dir": true,
            "bytes": 0,
            "hash": "37eb1ba1849d4b0fb0b28caf7ef3af52",
            "thumb_exists": false,
            "contents": [
                {
                    "path": "/Photos/beach.jpg",
                    "bytes": 230783,
                    "size": "225.4KB",
                    "is_dir": false,
                    "thumb_exists": true,
                    "mime_type": "image/jpeg",
                    "rev": "35e97029684fe",
                    "modified": "Tue, 19 Jul 2011 21:55:38 +0000"
                },
                { "path": "/Photos/notes.txt", "bytes": 12, "is_dir": false, "thumb_exists": false }
            ]
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert!(entry.is_dir);
        let contents = entry.contents.unwrap();
        assert_eq!(contents.len(), 2);
        assert!(contents[0].thumb_exists);
        assert_eq!(contents[0].bytes, 230783);
        assert_eq!(contents[0].file_name(), "beach.jpg");
        assert!(contents[0].modified.is_some());
        assert!(contents[1].modified.is_none());
    }

    #[test]
    fn test_bad_date_is_ignored() {
        let entry: Entry =
            serde_json::from_str(r#"{"path": "/a.png", "modified": "yesterday"}"#).unwrap();
        assert!(entry.modified.is_none());
        assert!(entry.contents.is_none());
    }

    #[test]
    fn test_presets_query_values() {
        assert_eq!(ThumbSize::default().as_query(), "960x640_bestfit");
        assert_eq!(ThumbFormat::default().as_query(), "JPEG");
        assert_eq!(ThumbFormat::Png.image_format(), image::ImageFormat::Png);
    }
}
