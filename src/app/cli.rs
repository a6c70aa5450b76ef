use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate JSON file structure from a folder"
)]
pub struct Cli {
    /// Root folder path
    pub root: PathBuf,

    /// Maximum nested depth to scan [default: 3]
    #[arg(long)]
    pub depth: Option<usize>,

    /// Include file contents in output
    #[arg(long)]
    pub checkfile: bool,

    /// Max file size to read in bytes [default: 1000000]
    #[arg(long)]
    pub maxfilesize: Option<u64>,

    /// Extra ignore patterns, applied on top of .folderignore
    #[arg(long, num_args = 1..)]
    pub ignore: Option<Vec<String>>,

    /// Visit directory entries in name order instead of OS order
    #[arg(long)]
    pub sort: bool,

    /// Use a named preset from presets.toml instead of the folder name
    #[arg(long)]
    pub preset: Option<String>,

    /// Write the JSON here instead of outputs/<folder>.json next to the binary
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
