//! 文件下载：PhotoSize → getFile → download_file。

use anyhow::{Context, Result};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::PhotoSize;

/// 下载一张图片的原始字节。
pub(crate) async fn download_photo(bot: &teloxide::Bot, photo: &PhotoSize) -> Result<Vec<u8>> {
    let file = bot
        .get_file(photo.file.id.clone())
        .await
        .context("get_file failed")?;
    let mut buf: Vec<u8> = Vec::new();
    bot.download_file(&file.path, &mut buf)
        .await
        .with_context(|| format!("download_file failed for {}", file.path))?;
    Ok(buf)
}
