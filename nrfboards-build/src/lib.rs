//! nrfboards build tools.

use std::{
    collections::HashMap,
    ffi::OsStr,
    fs,
    fs::File,
    io::{BufRead, BufReader, Error, ErrorKind, Result},
    path::{Path, PathBuf},
};

/// Reads board settings from comments in a source file.
///
/// A setting line has the form: `// BOARD-SETTING: value`
pub fn read_settings(path: &Path) -> Result<HashMap<String, String>> {
    let file = File::open(path)?;
    let lines = BufReader::new(file);

    let mut settings = HashMap::new();
    for line in lines.lines() {
        let line = line?;
        let line = line.trim();
        if let Some(line) = line.strip_prefix("// BOARD-") {
            if let Some((name, value)) = line.split_once(':') {
                settings.insert(name.trim().to_ascii_uppercase().to_string(), value.trim().to_string());
            }
        }
    }

    Ok(settings)
}

/// A board source module found in the boards directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSource {
    /// Board identifier.
    ///
    /// Taken from the `BOARD-ID` setting, or the upper-cased file stem if absent.
    pub id: String,
    /// Rust module name (file stem).
    pub module: String,
    /// Canonical path of the source file.
    pub path: PathBuf,
}

/// Enumerates the board source modules in `dir`, sorted by board id.
///
/// `mod.rs` is skipped. Two modules declaring the same id are an error.
pub fn board_sources(dir: &Path) -> Result<Vec<BoardSource>> {
    let mut sources = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.metadata()?.is_file()
            || path.extension() != Some(OsStr::new("rs"))
            || entry.file_name() == OsStr::new("mod.rs")
        {
            continue;
        }

        let module = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, format!("bad board file name {}", path.display())))?
            .to_string();
        let settings = read_settings(&path)?;
        let id = settings.get("ID").cloned().unwrap_or_else(|| module.to_ascii_uppercase());

        sources.push(BoardSource { id, module, path: path.canonicalize()? });
    }

    sources.sort_by_key(|s| s.id.to_ascii_uppercase());
    if let Some(w) = sources.windows(2).find(|w| w[0].id.eq_ignore_ascii_case(&w[1].id)) {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("board id {} declared by both {} and {}", w[0].id, w[0].module, w[1].module),
        ));
    }

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_are_read_from_header_comments() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("xenon.rs");
        fs::write(&file, "//! Xenon.\n//\n// BOARD-ID: XENON\n// board-gpios: 48\n  // BOARD-note:a:b\nfn x() {}\n")
            .unwrap();

        let settings = read_settings(&file).unwrap();
        assert_eq!(settings.get("ID").map(String::as_str), Some("XENON"));
        assert_eq!(settings.get("NOTE").map(String::as_str), Some("a:b"));
        assert!(!settings.contains_key("GPIOS"));
    }

    #[test]
    fn sources_are_sorted_and_mod_rs_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("mod.rs"), "// BOARD-ID: NOPE\n").unwrap();
        fs::write(dir.path().join("xenon.rs"), "// BOARD-ID: XENON\n").unwrap();
        fs::write(dir.path().join("dongle.rs"), "// nothing here\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "// BOARD-ID: TXT\n").unwrap();

        let sources = board_sources(dir.path()).unwrap();
        let ids: Vec<_> = sources.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["DONGLE", "XENON"]);
        assert_eq!(sources[0].module, "dongle");
        assert!(sources[0].path.is_absolute());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "// BOARD-ID: SAME\n").unwrap();
        fs::write(dir.path().join("b.rs"), "// BOARD-ID: same\n").unwrap();

        let err = board_sources(dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
