use std::path::PathBuf;

use crate::error::Result;
use crate::util::{name_bytes, open_archive, save_archive};

pub fn run(path: PathBuf, names: Vec<String>, verbose: bool) -> Result<()> {
    let mut file = open_archive(&path)?;

    for name in &names {
        let entry = file.archive_mut().remove(name_bytes(name))?;
        if verbose {
            println!("{}", entry.name);
        }
    }

    save_archive(&mut file)?;
    Ok(())
}
