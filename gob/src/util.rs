use std::path::{Component, Path, PathBuf};

use gob_format::{field, GobArchive, GobFile};

use crate::error::{Error, Result};

/// Entry names are the uppercased file name, as the format conventionally stores them.
pub fn entry_name_for(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_ascii_uppercase())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| Error::InvalidFileName {
            path: path.to_path_buf(),
        })
}

/// The stored bytes of a name typed by the user. Listings show each byte as
/// one Latin-1 character, so typing a listed name gives back its bytes. Text
/// outside Latin-1 cannot match a listed name and is kept as UTF-8.
pub fn name_bytes(name: &str) -> Vec<u8> {
    field::to_latin1(name).unwrap_or_else(|| name.as_bytes().to_vec())
}

/// Where an entry named `name` lands under `dest`. Names that would escape
/// `dest` are rejected.
pub fn output_path(dest: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains('\\') => Ok(dest.join(name)),
        _ => Err(Error::UnsafeEntryName {
            name: name.to_string(),
        }),
    }
}

pub fn open_archive(path: &Path) -> Result<GobFile> {
    GobFile::open(path).map_err(|source| Error::OpenArchive {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_archive(file: &mut GobFile) -> Result<u64> {
    file.save().map_err(|source| Error::SaveArchive {
        path: file.path().to_path_buf(),
        source,
    })
}

/// Reads each file and appends it to `archive`. Directories are skipped.
pub fn import_files(archive: &mut GobArchive, files: &[PathBuf], verbose: bool) -> Result<()> {
    for path in files {
        if path.is_dir() {
            tracing::warn!(path = %path.display(), "skipping directory");
            continue;
        }

        let name = entry_name_for(path)?;
        let bytes = std::fs::read(path).map_err(|source| Error::ReadFile {
            path: path.clone(),
            source,
        })?;

        let entry = archive
            .import(name_bytes(&name), bytes)
            .map_err(|source| Error::Import {
                path: path.clone(),
                source,
            })?;

        if verbose {
            println!("{}", entry.name);
        }
    }
    Ok(())
}

pub fn format_size(size: u32) -> String {
    use humansize::{file_size_opts as options, FileSize};

    (size as u64)
        .file_size(options::BINARY)
        .unwrap_or_else(|_| size.to_string())
}
