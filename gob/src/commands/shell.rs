use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use gob_format::GobFile;

use crate::commands::list::print_table;
use crate::error::{Error, Result};
use crate::util::{entry_name_for, format_size, name_bytes, output_path};

const HELP: &str = "\
Commands:
  load <gobfile>            Open an archive, or reload the current one from disk
  new <gobfile>             Start an empty archive
  save [gobfile]            Write the archive to its path, or to a new one
  list [ext]                List entries, optionally only those with an extension
  import <file> [name]      Add a file as a new entry
  export <name> [file]      Write an entry's content to a file
  remove <name>             Remove the first entry with this name
  info                      Show the current archive
  help                      Show this message
  quit                      Leave the shell";

#[derive(Debug)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Default)]
struct Session {
    file: Option<GobFile>,
}

impl Session {
    fn file(&self) -> anyhow::Result<&GobFile> {
        self.file.as_ref().context("no archive loaded (use `load` or `new`)")
    }

    fn file_mut(&mut self) -> anyhow::Result<&mut GobFile> {
        self.file.as_mut().context("no archive loaded (use `load` or `new`)")
    }

    fn load(&mut self, path: &Path) -> anyhow::Result<()> {
        let current = self.file.as_ref().map_or(false, |file| file.path() == path);
        if current {
            self.file_mut()?.reload()?;
        } else {
            self.file = Some(GobFile::open(path)?);
        }
        println!("{} entries", self.file()?.archive().len());
        Ok(())
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> anyhow::Result<Flow> {
        match (command, args) {
            ("load", [path]) => self.load(Path::new(path))?,
            ("new", [path]) => self.file = Some(GobFile::create(path)),
            ("save", []) => {
                let bytes = self.file_mut()?.save()?;
                println!("{} bytes written", bytes);
            }
            ("save", [path]) => {
                let bytes = self.file_mut()?.save_as(path)?;
                println!("{} bytes written", bytes);
            }
            ("list", []) => print_table(&self.file()?.archive().iter().collect::<Vec<_>>()),
            ("list", [ext]) => print_table(&self.file()?.archive().require_extension(ext)?),
            ("import", [file, rest @ ..]) if rest.len() <= 1 => {
                let path = Path::new(file);
                let name = match rest.first() {
                    Some(name) => name.to_string(),
                    None => entry_name_for(path)?,
                };
                let bytes = std::fs::read(path)
                    .with_context(|| format!("cannot read `{}`", path.display()))?;
                let entry = self
                    .file_mut()?
                    .archive_mut()
                    .import(name_bytes(&name), bytes)?;
                println!(
                    "{} ({}) at {:#010x}",
                    entry.name,
                    format_size(entry.size()),
                    entry.start
                );
            }
            ("export", [name, rest @ ..]) if rest.len() <= 1 => {
                let out = match rest.first() {
                    Some(out) => PathBuf::from(out),
                    None => output_path(Path::new("."), name)?,
                };
                let data = self.file()?.archive().export(name_bytes(name))?;
                std::fs::write(&out, data)
                    .with_context(|| format!("cannot write `{}`", out.display()))?;
                println!("{} bytes written to {}", data.len(), out.display());
            }
            ("remove", [name]) => {
                let entry = self.file_mut()?.archive_mut().remove(name_bytes(name))?;
                println!("removed {}", entry.name);
            }
            ("info", []) => {
                let file = self.file()?;
                let archive = file.archive();
                println!("Archive: {}", file.path().display());
                println!("Entries: {}", archive.len());
                println!("Content: {} bytes", archive.content_len());
                if archive.has_fresh() {
                    println!("Unsaved changes (entries marked * in `list`)");
                }
            }
            ("help", _) => println!("{}", HELP),
            ("quit", _) | ("exit", _) => return Ok(Flow::Quit),
            _ => bail!("unrecognized command `{}`; try `help`", args_line(command, args)),
        }
        Ok(Flow::Continue)
    }
}

fn args_line(command: &str, args: &[&str]) -> String {
    std::iter::once(command)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs a line-oriented command loop on stdin until `quit` or end of input.
/// A failing command is reported and the loop carries on with the archive unchanged.
pub fn run(path: Option<PathBuf>) -> Result<()> {
    let mut session = Session::default();

    if let Some(path) = path {
        if let Err(e) = session.load(&path) {
            eprintln!("error: {:#}", e);
        }
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("gob> ");
        std::io::stdout().flush().map_err(Error::Terminal)?;

        line.clear();
        if input.read_line(&mut line).map_err(Error::Terminal)? == 0 {
            println!();
            break;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let (command, args) = match words.split_first() {
            Some((command, args)) => (*command, args),
            None => continue,
        };

        match session.dispatch(command, args) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("error: {:#}", e),
        }
    }

    if session.file.as_ref().map_or(false, |f| f.archive().has_fresh()) {
        tracing::warn!("leaving shell with unsaved entries");
    }
    Ok(())
}
