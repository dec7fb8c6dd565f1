//! All-or-nothing CSV output.
//!
//! Outputs are written to a sibling `.tmp` file and renamed over the
//! destination only once every row has been written and flushed, so an
//! aborted run never leaves a truncated CSV behind.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::SourceError;
use crate::paths::ensure_dir;

/// Returns the temporary path used while `path` is being written.
#[must_use]
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes a CSV file atomically.
///
/// `write` receives a [`csv::Writer`] over the temporary file. If it
/// returns an error the temporary file is removed and the destination is
/// left untouched.
///
/// # Errors
///
/// Returns [`SourceError`] if the parent directory can't be created, `write`
/// fails, or the final rename fails.
pub fn write_csv_atomically<F>(path: &Path, write: F) -> Result<(), SourceError>
where
    F: FnOnce(&mut csv::Writer<File>) -> Result<(), SourceError>,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_dir(parent)?;
    }

    let tmp = tmp_path(path);

    if let Err(e) = write_to(&tmp, write) {
        std::fs::remove_file(&tmp).ok();
        return Err(e);
    }

    std::fs::rename(&tmp, path)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

fn write_to<F>(path: &Path, write: F) -> Result<(), SourceError>
where
    F: FnOnce(&mut csv::Writer<File>) -> Result<(), SourceError>,
{
    let mut writer = csv::Writer::from_path(path)?;
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sf_crime_output_{}_{name}", std::process::id()))
    }

    #[test]
    fn tmp_path_is_sibling() {
        let path = Path::new("data/clean-data/out.csv");
        assert_eq!(tmp_path(path), Path::new("data/clean-data/out.csv.tmp"));
    }

    #[test]
    fn writes_and_overwrites() {
        let path = temp_path("overwrite.csv");

        write_csv_atomically(&path, |w| {
            w.write_record(["a", "b"])?;
            w.write_record(["1", "2"])?;
            Ok(())
        })
        .unwrap();
        write_csv_atomically(&path, |w| {
            w.write_record(["a"])?;
            Ok(())
        })
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["a"]);
        assert!(!tmp_path(&path).exists());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn failed_write_leaves_destination_untouched() {
        let path = temp_path("untouched.csv");
        std::fs::write(&path, "original\n").unwrap();

        let result = write_csv_atomically(&path, |w| {
            w.write_record(["partial"])?;
            Err(SourceError::Config {
                message: "boom".to_string(),
            })
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original\n");
        assert!(!tmp_path(&path).exists());
        std::fs::remove_file(&path).unwrap();
    }
}
