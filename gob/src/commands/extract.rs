use std::path::{Path, PathBuf};

use gob_format::{export_content, Entry, ExportError};

use crate::error::{Error, Result};
use crate::util::{name_bytes, open_archive, output_path};

fn write_entry(dest: &Path, entry: &Entry, verbose: bool) -> Result<()> {
    let name = entry.name.to_string();
    let data = export_content(entry).map_err(|source| Error::Export {
        name: name.clone(),
        source: ExportError::InvalidEntry(source),
    })?;

    let out = output_path(dest, &name)?;
    std::fs::write(&out, data).map_err(|source| Error::WriteFile { path: out, source })?;

    if verbose {
        println!("{}", name);
    }
    Ok(())
}

pub fn run(path: PathBuf, names: Vec<String>, output: Option<PathBuf>, verbose: bool) -> Result<()> {
    let file = open_archive(&path)?;
    let archive = file.archive();

    let dest = output.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dest).map_err(|source| Error::CreateDirectory {
        path: dest.clone(),
        source,
    })?;

    if names.is_empty() {
        for entry in archive {
            write_entry(&dest, entry, verbose)?;
        }
        return Ok(());
    }

    // Resolve every name first so a typo does not leave a partial extraction.
    let entries = names
        .iter()
        .map(|name| {
            archive
                .find(name_bytes(name))
                .ok_or_else(|| gob_format::NotFoundError::Name(name.clone()))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    for entry in entries {
        write_entry(&dest, entry, verbose)?;
    }
    Ok(())
}
