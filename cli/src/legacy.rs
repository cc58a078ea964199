//! Pre-conversion of legacy `.doc` files through LibreOffice.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

const SOFFICE: &str = "soffice";

/// A DOCX produced from a legacy document. The file lives in a temporary
/// directory that is removed when this value is dropped.
pub struct ConvertedDocx {
    _dir: TempDir,
    pub path: PathBuf,
}

/// Convert `input` to DOCX with `soffice --headless`.
pub fn convert_to_docx(input: &Path) -> Result<ConvertedDocx, Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    log::info!("Converting {} with LibreOffice", input.display());

    let output = Command::new(SOFFICE)
        .arg("--headless")
        .args(["--convert-to", "docx", "--outdir"])
        .arg(dir.path())
        .arg(input)
        .output()
        .map_err(|e| -> Box<dyn std::error::Error> {
            if e.kind() == ErrorKind::NotFound {
                "LibreOffice (soffice) not found on PATH; it is required for .doc files".into()
            } else {
                format!("Failed to run {}: {}", SOFFICE, e).into()
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::warn!("LibreOffice failed on {}: {}", input.display(), stderr.trim());
        return Err(format!("LibreOffice conversion failed ({})", output.status).into());
    }

    let path = converted_path(dir.path(), input)
        .ok_or_else(|| format!("LibreOffice produced no output for {}", input.display()))?;

    Ok(ConvertedDocx { _dir: dir, path })
}

fn converted_path(dir: &Path, input: &Path) -> Option<PathBuf> {
    let mut name = input.file_stem()?.to_os_string();
    name.push(".docx");
    let path = dir.join(name);
    path.exists().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converted_path_requires_output() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(converted_path(dir.path(), Path::new("old/report.doc")), None);

        std::fs::write(dir.path().join("report.docx"), b"PK").unwrap();
        assert_eq!(
            converted_path(dir.path(), Path::new("old/report.doc")),
            Some(dir.path().join("report.docx"))
        );
    }
}
