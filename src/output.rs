use std::path::Path;

use anyhow::Context;
use tracing::info;

/// Writes the reassembled stream to its artifact path. The buffer is
///  borrowed: a failed write surfaces the error and leaves the bytes with
///  the caller, to be reported rather than lost.
pub async fn write_artifact(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    tokio::fs::write(path, data).await
        .with_context(|| format!("writing {} bytes to {:?}", data.len(), path))?;

    info!("wrote {} bytes to {:?}", data.len(), path);
    Ok(())
}
