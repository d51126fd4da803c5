use std::path::PathBuf;

use gob_format::GobFile;

use crate::error::{Error, Result};
use crate::util::{import_files, save_archive};

pub fn run(path: PathBuf, files: Vec<PathBuf>, force: bool, verbose: bool) -> Result<()> {
    if files.contains(&path) {
        return Err(Error::ArchiveSelf { path });
    }

    if path.exists() && !force {
        return Err(Error::ArchiveExists { path });
    }

    let mut file = GobFile::create(&path);
    import_files(file.archive_mut(), &files, verbose)?;
    let bytes = save_archive(&mut file)?;

    tracing::debug!(path = %path.display(), entries = file.archive().len(), bytes, "created archive");
    Ok(())
}
