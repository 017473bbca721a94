// src/utils.rs

use crate::{constants, error::*};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::Regex;
use std::{
    ffi::OsStr,
    path::{Component, Path, PathBuf},
    sync::LazyLock,
};

// 路径段中需要转义的字符，'/' 保留作为分隔符
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

static ILLEGAL_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub fn sanitize_filename(name: &str) -> String {
    let original_name = name.trim();
    if original_name.is_empty() { return "unknown".to_string(); }

    let stem = Path::new(original_name)
        .file_stem()
        .unwrap_or_else(|| OsStr::new(original_name))
        .to_string_lossy()
        .to_uppercase();
    let windows_reserved = [
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
        "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];

    let mut name = if windows_reserved.contains(&stem.as_ref()) {
        format!("_{}", original_name)
    } else {
        original_name.to_string()
    };

    name = ILLEGAL_CHARS_RE.replace_all(&name, " ").into_owned();
    name = WHITESPACE_RE.replace_all(&name, " ").trim().to_string();
    name = name.trim_matches(|c: char| c == '.' || c.is_whitespace()).to_string();
    if name.is_empty() { return "unnamed".to_string(); }

    if name.len() > constants::MAX_FILENAME_BYTES {
        if let (Some(stem_part), Some(ext)) = (Path::new(&name).file_stem(), Path::new(&name).extension()) {
            let stem_part_str = stem_part.to_string_lossy();
            let ext_str = format!(".{}", ext.to_string_lossy());
            let max_stem_bytes = constants::MAX_FILENAME_BYTES.saturating_sub(ext_str.len());
            let truncated_stem = safe_truncate_utf8(&stem_part_str, max_stem_bytes);
            name = format!("{}{}", truncated_stem, ext_str);
        } else {
            name = safe_truncate_utf8(&name, constants::MAX_FILENAME_BYTES).to_string();
        }
    }
    name
}

fn safe_truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes { return s; }
    let mut i = max_bytes;
    while i > 0 && !s.is_char_boundary(i) { i -= 1; }
    &s[..i]
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}

/// 取远程路径按 '/' 切分后的第二段作为本地缓存文件名。
/// 对 "/Photos/beach.jpg" 来说是 "Photos"，对 "/beach.jpg" 来说是 "beach.jpg"。
pub fn cache_file_name(remote_path: &str) -> Option<String> {
    let segment = remote_path.split('/').nth(1)?.trim();
    if segment.is_empty() {
        return None;
    }
    Some(sanitize_filename(segment))
}

/// 多槽位模式下给缓存文件名加上槽位序号，扩展名保持在最后。
/// "Photos" 在槽位 1 变为 "Photos-2"，"a.png" 在槽位 0 变为 "a-1.png"。
pub fn slot_file_name(name: &str, slot: usize) -> String {
    let path = Path::new(name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => format!(
            "{}-{}.{}",
            stem.to_string_lossy(),
            slot + 1,
            ext.to_string_lossy()
        ),
        _ => format!("{}-{}", name, slot + 1),
    }
}

/// 进度百分比，四舍五入并限制在 0..=100
pub fn progress_percent(bytes: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (100.0 * bytes as f64 / total as f64 + 0.5).floor();
    percent.min(100.0) as u8
}

/// 将 Dropbox 路径编码为 URL 路径，保证以 '/' 开头
pub fn encode_remote_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    format!("/{}", utf8_percent_encode(trimmed, PATH_SEGMENT))
}

pub fn secure_join_path(base_dir: &Path, file_name: &str) -> AppResult<PathBuf> {
    let relative_path = Path::new(file_name);
    let mut final_path = base_dir.to_path_buf();
    for component in relative_path.components() {
        match component {
            Component::Normal(part) => final_path.push(part),
            Component::ParentDir => {
                return Err(AppError::UserInputError(format!("检测到路径遍历: '{}'", file_name)));
            }
            _ => continue,
        }
    }
    if final_path == base_dir {
        return Err(AppError::UserInputError(format!("无效的缓存文件名: '{}'", file_name)));
    }
    Ok(final_path)
}
