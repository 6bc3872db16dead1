use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "reviewctx")]
#[command(author, version, about = "On-demand git code context for AI code review")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List a repository's files as size-bounded upload chunks
    ListFiles {
        /// Project name (bare repository at `<git_root>/<project>.git`)
        project: String,

        /// Pretty-print the chunk JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Locate a symbol definition starting from the file referencing it
    FindDefinition {
        /// Project name (bare repository at `<git_root>/<project>.git`)
        project: String,

        /// Symbol to locate (dotted references reduce to the last segment)
        symbol: String,

        /// Repository path of the file the symbol is referenced from
        file: String,
    },
}
