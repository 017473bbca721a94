// src/thumbnail/selection.rs

use crate::{
    error::*,
    models::{SelectionMode, api::Entry},
};
use log::debug;
use rand::{Rng, seq::index};

/// 取出文件夹的目录项; 不是文件夹或没有内容时报错
pub fn folder_contents(listing: &Entry) -> AppResult<&[Entry]> {
    match &listing.contents {
        Some(contents) if listing.is_dir && !contents.is_empty() => Ok(contents),
        _ => Err(AppError::NotAFolder(listing.path.clone())),
    }
}

/// 筛选出服务端能生成缩略图的目录项
pub fn thumbnail_candidates<'a>(listing: &Entry, contents: &'a [Entry]) -> AppResult<Vec<&'a Entry>> {
    let candidates: Vec<&Entry> = contents.iter().filter(|e| e.thumb_exists).collect();
    debug!(
        "目录 '{}' 共 {} 项，其中 {} 项有缩略图",
        listing.path,
        contents.len(),
        candidates.len()
    );
    if candidates.is_empty() {
        return Err(AppError::NoThumbnails(listing.path.clone()));
    }
    Ok(candidates)
}

/// floor(random() * count)
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, count: usize) -> usize {
    debug_assert!(count > 0);
    let index = (rng.r#gen::<f64>() * count as f64) as usize;
    index.min(count.saturating_sub(1))
}

/// 按选择模式挑出要下载的目录项，结果顺序即槽位顺序
pub fn pick<'a, R: Rng + ?Sized>(
    candidates: &[&'a Entry],
    mode: SelectionMode,
    rng: &mut R,
) -> Vec<&'a Entry> {
    if candidates.is_empty() {
        return Vec::new();
    }
    match mode {
        SelectionMode::Single => vec![candidates[pick_index(rng, candidates.len())]],
        SelectionMode::Distinct(_) => {
            let amount = mode.wanted().min(candidates.len());
            index::sample(rng, candidates.len(), amount)
                .into_iter()
                .map(|i| candidates[i])
                .collect()
        }
    }
}
