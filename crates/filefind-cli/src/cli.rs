//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Fingerprint a directory tree and query the index later
#[derive(Parser, Debug)]
#[command(name = "filefind", version, about)]
pub struct Cli {
    /// JSON configuration file (defaults apply when absent)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the datastore snapshot location
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fingerprint every file under a directory
    Build {
        /// Directory to index
        #[arg(value_name = "DIR")]
        root: PathBuf,

        /// Machine name for the partition key (defaults to the host name)
        #[arg(short, long)]
        machine: Option<String>,

        /// Follow symbolic links while walking
        #[arg(long)]
        follow_links: bool,
    },

    /// Number the indexed partitions so a query can refer to one by id
    List {
        /// Only list partitions of this machine
        #[arg(short, long)]
        machine: Option<String>,
    },

    /// Run a query against a listed partition
    Query(QueryArgs),
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Partition id from the last `list`
    #[arg(value_name = "ID")]
    pub id: String,

    /// Base name contains (`a|b` any, `a&b` all)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory contains
    #[arg(long)]
    pub path: Option<String>,

    /// Full lowercased path contains
    #[arg(long)]
    pub any: Option<String>,

    /// Extension equals, or an extension class such as `office`
    #[arg(long)]
    pub ext: Option<String>,

    /// Size: `N`, `-N`, `N-` or `N-M` with optional k/m/g/... suffix
    #[arg(long)]
    pub size: Option<String>,

    /// Date: `today`, `last_week`, `-Nd`, `mm/dd/yyyy-mm/dd/yyyy` or `mm/*/yyyy`
    #[arg(long)]
    pub date: Option<String>,

    /// Work filter applied after selection: all, empty, duplicates, missing, changed
    #[arg(short, long, default_value = "all")]
    pub work: String,

    /// Sort key such as `size-` or `name+`; repeatable, first key dominates
    #[arg(short, long = "sort", value_name = "KEY")]
    pub sort: Vec<String>,
}
