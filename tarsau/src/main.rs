use std::ffi::OsString;
use std::path::PathBuf;

use structopt::clap::AppSettings::*;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(
        name = "b",
        visible_alias = "build",
        about = "Bundle plain-text files into a new archive"
    )]
    Build {
        #[structopt(
            short,
            long,
            parse(from_os_str),
            default_value = "a.sau",
            help = "Path of the archive to create"
        )]
        output: PathBuf,

        #[structopt(
            name = "files",
            parse(from_os_str),
            required = true,
            help = "Plain-text files to add, at most 32 and 200 MiB in total"
        )]
        files: Vec<PathBuf>,
    },

    #[structopt(
        name = "a",
        visible_alias = "extract",
        about = "Extract an archive into a directory"
    )]
    Extract {
        #[structopt(name = "archive", parse(from_os_str), help = "Path to the .sau archive")]
        archive: PathBuf,

        #[structopt(
            name = "directory",
            parse(from_os_str),
            help = "Output directory, created if missing"
        )]
        output: PathBuf,
    },

    #[structopt(name = "l", visible_alias = "list", about = "List the entries of an archive")]
    List {
        #[structopt(long, help = "Print the listing as JSON")]
        json: bool,

        #[structopt(name = "archive", parse(from_os_str), help = "Path to the .sau archive")]
        archive: PathBuf,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "tarsau",
    about = "Bundle plain-text files into .sau archives and extract them again.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands],
    usage = "tarsau (b|a|l) [FLAGS|OPTIONS] <args>...\n    tarsau (-b|-a|-l) [FLAGS|OPTIONS] <args>..."
)]
struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    verbose: bool,

    #[structopt(subcommand)]
    cmd: Commands,
}

/// Accepts `-b`, `-a` and `-l` in place of the subcommand names.
fn subcommand_flags<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    let mut args: Vec<OsString> = args.into_iter().collect();
    if let Some(first) = args.get_mut(1) {
        let name = match first.to_str() {
            Some("-b") => "b",
            Some("-a") => "a",
            Some("-l") => "l",
            _ => return args,
        };
        *first = OsString::from(name);
    }
    args
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
    let opts = CliOpts::from_iter(subcommand_flags(wild::args_os()));
    init_tracing(opts.verbose);

    let result = match opts.cmd {
        Commands::Build { output, files } => commands::build(output, files, opts.verbose),
        Commands::Extract { archive, output } => {
            commands::extract(archive, output, opts.verbose)
        }
        Commands::List { json, archive } => commands::list(archive, json, opts.verbose),
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", anyhow::Error::new(e));
        std::process::exit(1);
    }
}
