use std::path::PathBuf;

use structopt::clap::AppSettings::*;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod util;

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(name = "c", visible_alias = "create", about = "Create a new archive")]
    Create {
        #[structopt(short, long, help = "Overwrite the archive if it already exists")]
        force: bool,

        #[structopt(
            name = "gobfile",
            parse(from_os_str),
            help = "Path to the .gob archive"
        )]
        path: PathBuf,

        #[structopt(name = "files", parse(from_os_str), help = "Files to add")]
        files: Vec<PathBuf>,
    },

    #[structopt(
        name = "a",
        visible_alias = "append",
        about = "Append files to an existing archive"
    )]
    Append {
        #[structopt(
            name = "gobfile",
            parse(from_os_str),
            help = "Path to the .gob archive"
        )]
        path: PathBuf,

        #[structopt(name = "files", parse(from_os_str), help = "Files to add")]
        files: Vec<PathBuf>,
    },

    #[structopt(name = "l", visible_alias = "list", about = "List entries of an archive")]
    List {
        #[structopt(short, long, help = "Only list entries with this extension, e.g. LEV")]
        extension: Option<String>,

        #[structopt(long, help = "Print the listing as JSON")]
        json: bool,

        #[structopt(
            name = "gobfile",
            parse(from_os_str),
            help = "Path to the .gob archive"
        )]
        path: PathBuf,
    },

    #[structopt(
        name = "x",
        visible_alias = "extract",
        about = "Extract entries from an archive"
    )]
    Extract {
        #[structopt(
            short,
            long,
            parse(from_os_str),
            help = "Directory to extract into [default: current directory]"
        )]
        output: Option<PathBuf>,

        #[structopt(
            name = "gobfile",
            parse(from_os_str),
            help = "Path to the .gob archive"
        )]
        path: PathBuf,

        #[structopt(name = "names", help = "Entries to extract [default: all]")]
        names: Vec<String>,
    },

    #[structopt(
        name = "r",
        visible_alias = "remove",
        about = "Remove entries from an archive"
    )]
    Remove {
        #[structopt(
            name = "gobfile",
            parse(from_os_str),
            help = "Path to the .gob archive"
        )]
        path: PathBuf,

        #[structopt(name = "names", required = true, help = "Entries to remove")]
        names: Vec<String>,
    },

    #[structopt(name = "shell", about = "Edit an archive interactively")]
    Shell {
        #[structopt(
            name = "gobfile",
            parse(from_os_str),
            help = "Archive to load on start"
        )]
        path: Option<PathBuf>,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "gob",
    about = "Create, modify and extract GOB archives.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands],
    usage = "gob (a|c|l|r|x|shell) [FLAGS|OPTIONS] <gobfile> [files|names]..."
)]
struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    verbose: bool,

    #[structopt(subcommand)]
    cmd: Commands,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let opts = CliOpts::from_iter(wild::args_os());
    init_tracing(opts.verbose);

    let verbose = opts.verbose;
    let result = match opts.cmd {
        Commands::Create { force, path, files } => {
            commands::create(path, files, force, verbose)
        }
        Commands::Append { path, files } => commands::append(path, files, verbose),
        Commands::List {
            extension,
            json,
            path,
        } => commands::list(path, extension, json),
        Commands::Extract {
            output,
            path,
            names,
        } => commands::extract(path, names, output, verbose),
        Commands::Remove { path, names } => commands::remove(path, names, verbose),
        Commands::Shell { path } => commands::shell(path),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  Caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}
