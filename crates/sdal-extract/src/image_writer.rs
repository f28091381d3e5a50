//! Default image writer: an explicit out-of-scope stand-in for a real
//! ISO9660 level-3 writer. No ISO9660-writing crate appears anywhere in
//! this retrieval pack, so rather than fabricate one, this stages the
//! input files under `out_path` using the same naming rule a real writer
//! would apply (uppercased, `;1`-suffixed) and stops there.

use std::fs;
use std::path::{Path, PathBuf};

use sdal_types::{SdalError, SdalResult};

use crate::traits::ImageWriter;

#[derive(Default)]
pub struct FilesystemImageWriter;

fn iso9660_entry_name(path: &Path) -> String {
    let stem = path.file_name().map(|s| s.to_string_lossy().to_uppercase()).unwrap_or_default();
    format!("{stem};1")
}

impl ImageWriter for FilesystemImageWriter {
    fn write_iso(&self, file_paths: &[PathBuf], out_path: &Path, _volume_id: &str) -> SdalResult<()> {
        fs::create_dir_all(out_path)?;
        for path in file_paths {
            let dest = out_path.join(iso9660_entry_name(path));
            fs::copy(path, &dest).map_err(|e| {
                SdalError::ExtractorError(format!("staging {} -> {}: {e}", path.display(), dest.display()))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_name_is_uppercased_with_version_suffix() {
        let name = iso9660_entry_name(Path::new("/tmp/r0001.sdl"));
        assert_eq!(name, "R0001.SDL;1");
    }

    #[test]
    fn stages_files_into_out_dir() {
        let tmp = std::env::temp_dir().join(format!("sdal-extract-test-{}", std::process::id()));
        let src_dir = tmp.join("src");
        let out_dir = tmp.join("out");
        fs::create_dir_all(&src_dir).unwrap();
        let src_file = src_dir.join("init.sdl");
        fs::write(&src_file, b"hello").unwrap();

        let writer = FilesystemImageWriter;
        writer.write_iso(&[src_file.clone()], &out_dir, "260726_12").unwrap();

        assert!(out_dir.join("INIT.SDL;1").exists());
        let _ = fs::remove_dir_all(&tmp);
    }
}
