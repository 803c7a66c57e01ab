//! Archive Output
//!
//! Serializes a result set into a zip byte stream whose entry paths mirror
//! the preview tree exactly: `{CategoryFolder}/{leaf}.md`, with FAQ results
//! at the archive root. Path rewriting lives in [`crate::tree`] so the two
//! views cannot drift apart.

use std::io::{Cursor, Write};
use std::path::Path;

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::tree::archive_path;
use crate::types::{Result, ResultSet};

/// Serialize the result set into an in-memory zip archive.
pub fn build_archive(results: &ResultSet) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, result) in results.iter() {
        writer.start_file(archive_path(&result.category, path), options)?;
        writer.write_all(result.content.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Build and write the archive to `dest`.
pub fn write_archive(results: &ResultSet, dest: &Path) -> Result<()> {
    let bytes = build_archive(results)?;
    std::fs::write(dest, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GenerationResult;
    use std::io::Read;

    fn sample() -> ResultSet {
        let mut set = ResultSet::new();
        set.insert(
            "foo/bar.component.ts",
            GenerationResult {
                category: "component".to_string(),
                content: "# Bar".to_string(),
            },
        );
        set.insert(
            "foo/baz.service.ts",
            GenerationResult {
                category: "service".to_string(),
                content: "# Baz".to_string(),
            },
        );
        set.insert(
            "faqs",
            GenerationResult {
                category: "faqs".to_string(),
                content: "# FAQs".to_string(),
            },
        );
        set
    }

    fn read_entries(bytes: &[u8]) -> Vec<(String, String)> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entries = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            entries.push((entry.name().to_string(), content));
        }
        entries
    }

    #[test]
    fn test_archive_paths_match_tree_layout() {
        let set = sample();
        let bytes = build_archive(&set).unwrap();
        let entries = read_entries(&bytes);

        assert_eq!(
            entries,
            vec![
                ("Components/bar.md".to_string(), "# Bar".to_string()),
                ("Services/baz.md".to_string(), "# Baz".to_string()),
                ("faqs.md".to_string(), "# FAQs".to_string()),
            ]
        );
    }

    #[test]
    fn test_every_result_has_exactly_one_entry() {
        let set = sample();
        let bytes = build_archive(&set).unwrap();
        let entries = read_entries(&bytes);
        assert_eq!(entries.len(), set.len());

        for (path, result) in set.iter() {
            let expected = archive_path(&result.category, path);
            assert_eq!(entries.iter().filter(|(name, _)| *name == expected).count(), 1);
        }
    }

    #[test]
    fn test_write_archive_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("documentation.zip");
        write_archive(&sample(), &dest).unwrap();

        let bytes = std::fs::read(&dest).unwrap();
        assert_eq!(read_entries(&bytes).len(), 3);
    }

    #[test]
    fn test_empty_result_set_yields_empty_archive() {
        let bytes = build_archive(&ResultSet::new()).unwrap();
        assert!(read_entries(&bytes).is_empty());
    }
}
