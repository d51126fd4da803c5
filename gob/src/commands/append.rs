use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::util::{import_files, open_archive, save_archive};

pub fn run(path: PathBuf, files: Vec<PathBuf>, verbose: bool) -> Result<()> {
    if files.is_empty() {
        return Err(Error::NoFilesSpecified);
    }

    if files.contains(&path) {
        return Err(Error::ArchiveSelf { path });
    }

    let mut file = open_archive(&path)?;
    for name in files.iter().filter_map(|f| f.file_name()) {
        let name = name.to_string_lossy();
        if file.archive().find(name.as_bytes()).is_some() {
            tracing::warn!(%name, "archive already contains an entry with this name");
        }
    }

    import_files(file.archive_mut(), &files, verbose)?;
    save_archive(&mut file)?;
    Ok(())
}
