use crate::error::Result;
use crate::log_info;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub fn to_json(data: &impl serde::Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn save_json(data: &impl serde::Serialize, path: impl AsRef<Path>) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }

    let json_string = to_json(data)?;
    let mut file = File::create(path.as_ref())?;
    file.write_all(json_string.as_bytes())?;
    log_info!("[utils] Saved JSON to {}", path.as_ref().display());
    Ok(())
}
