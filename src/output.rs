//! 清单持久化
//!
//! 把指令行原样以换行连接写入目标文件。

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

use crate::codegen::Listing;

/// 未指定输出文件时使用的文件名
pub const DEFAULT_OUTPUT: &str = "NEWCODE.asm";

pub fn write_lines<S: AsRef<str>>(lines: &[S], path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    let text = lines.iter().map(|t| t.as_ref()).collect::<Vec<&str>>().join("\n");
    fs::write(path, &text)?;
    info!(path = %path.display(), lines = lines.len(), bytes = text.len(), "listing written");
    Ok(())
}

pub fn write_listing(listing: &Listing, path: impl AsRef<Path>) -> io::Result<()> {
    write_lines(&listing.lines(), path)
}
