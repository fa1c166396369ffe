use std::path::{Path, PathBuf};

use super::Context;

pub async fn run(
    ctx: &Context,
    voice_id: &str,
    text: Option<&str>,
    out: &Path,
) -> anyhow::Result<()> {
    let audio = ctx.client.preview_voice(voice_id, text).await?;
    let out = with_audio_extension(out, &audio);

    tokio::fs::write(&out, &audio).await?;
    println!("saved {} ({} bytes)", out.display(), audio.len());
    Ok(())
}

fn with_audio_extension(out: &Path, audio: &[u8]) -> PathBuf {
    match out.file_name().and_then(|name| name.to_str()) {
        Some(name) => out.with_file_name(wb_audio_mime::ensure_extension(name, audio)),
        None => out.to_path_buf(),
    }
}
