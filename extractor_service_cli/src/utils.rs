use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn save_json<T: Serialize>(data: &T, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(data)?.as_bytes())?;
    file.write_all(b"\n")?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}
