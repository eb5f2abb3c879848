use anyhow::Result;
use std::num::NonZeroUsize;
use std::path::Path;

use super::config::{FrameOrder, FramePattern};
use crate::utils::file_utils;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub name: String,
    pub index: u64,
}

/// Matching frame files of `dir`, in listing order.
pub fn scan_frames(dir: &Path, pattern: &FramePattern) -> Result<Vec<Frame>> {
    let frames = file_utils::list_file_names(dir)?
        .into_iter()
        .filter_map(|name| {
            let index = pattern.frame_index(&name)?;
            Some(Frame { name, index })
        })
        .collect();
    Ok(frames)
}

pub fn sort_frames(frames: &mut [Frame], order: FrameOrder) {
    match order {
        FrameOrder::Numeric => {
            frames.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.name.cmp(&b.name)))
        }
        FrameOrder::Listing => {}
    }
}

/// Picks positions `offset, offset + stride, offset + 2 * stride, ...`.
pub fn select(frames: &[Frame], stride: NonZeroUsize, offset: usize) -> Vec<&Frame> {
    frames.iter().skip(offset).step_by(stride.get()).collect()
}
