//! vsixedit - A tool for inspecting and editing VSIX extension bundles
//!
//! Usage:
//!   vsixedit list <vsix> [filter]                  - List bundle entries
//!   vsixedit info <vsix>                           - Show bundle information
//!   vsixedit rows <vsix> <entry>                   - Show path/value rows of a JSON entry
//!   vsixedit set <vsix> <entry> <addr> <value>     - Set a value by address
//!   vsixedit replace <vsix> <find> <replacement>   - Replace across all JSON entries
//!   vsixedit cat <vsix> <entry>                    - Print a text entry
//!   vsixedit extract <vsix> [filter]               - Extract entries to a directory
//!   vsixedit export <vsix> <output>                - Repackage the bundle

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vsixedit::vsix_utils::{
    cat_entry, export_bundle, extract_entries, list_entries, replace_in_bundle, set_value,
    show_info, show_rows,
};

#[derive(Parser)]
#[command(name = "vsixedit")]
#[command(version = "0.1.0")]
#[command(about = "Inspect and edit VSIX (ZIP) extension bundles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List entries in the bundle
    List {
        /// Path to the .vsix file
        vsix: PathBuf,
        /// Filter pattern (e.g., *.json, snippets)
        filter: Option<String>,
    },
    /// Show bundle information
    Info {
        /// Path to the .vsix file
        vsix: PathBuf,
    },
    /// Show the path/value rows of a JSON entry
    Rows {
        /// Path to the .vsix file
        vsix: PathBuf,
        /// Entry name (e.g., "extension/package.json")
        entry: String,
        /// Only show rows whose address contains this text
        #[arg(short, long)]
        path: Option<String>,
        /// Only show rows whose value contains this text
        #[arg(short, long)]
        value: Option<String>,
    },
    /// Set a value by address in a JSON entry and export the bundle
    Set {
        /// Path to the .vsix file
        vsix: PathBuf,
        /// Entry name (e.g., "extension/package.json")
        entry: String,
        /// Address of the value (e.g., "contributes.commands[0].title")
        address: String,
        /// New value; JSON literals keep their type, other text becomes a string
        value: String,
        /// Output .vsix path
        #[arg(short, long)]
        output: PathBuf,
        /// Skip the automatic manifest patch-version bump
        #[arg(long)]
        no_bump: bool,
    },
    /// Find & replace across all JSON entries and export the bundle
    Replace {
        /// Path to the .vsix file
        vsix: PathBuf,
        /// Literal text to find
        find: String,
        /// Replacement text
        replacement: String,
        /// Match case exactly
        #[arg(short, long)]
        case_sensitive: bool,
        /// Output .vsix path
        #[arg(short, long)]
        output: PathBuf,
        /// Skip the automatic manifest patch-version bump
        #[arg(long)]
        no_bump: bool,
    },
    /// Print a text entry (binary content is marked, not dumped)
    Cat {
        /// Path to the .vsix file
        vsix: PathBuf,
        /// Entry name
        entry: String,
    },
    /// Extract entries to a directory
    Extract {
        /// Path to the .vsix file
        vsix: PathBuf,
        /// Filter pattern
        filter: Option<String>,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Repackage the bundle to a new .vsix
    Export {
        /// Path to the .vsix file
        vsix: PathBuf,
        /// Output .vsix path
        output: PathBuf,
        /// Skip the automatic manifest patch-version bump
        #[arg(long)]
        no_bump: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List { vsix, filter } => {
            list_entries(&vsix, filter.as_deref())?;
        }
        Commands::Info { vsix } => {
            show_info(&vsix)?;
        }
        Commands::Rows {
            vsix,
            entry,
            path,
            value,
        } => {
            show_rows(&vsix, &entry, path.as_deref(), value.as_deref())?;
        }
        Commands::Set {
            vsix,
            entry,
            address,
            value,
            output,
            no_bump,
        } => {
            set_value(&vsix, &entry, &address, &value, &output, !no_bump)?;
        }
        Commands::Replace {
            vsix,
            find,
            replacement,
            case_sensitive,
            output,
            no_bump,
        } => {
            replace_in_bundle(&vsix, &find, &replacement, case_sensitive, &output, !no_bump)?;
        }
        Commands::Cat { vsix, entry } => {
            cat_entry(&vsix, &entry)?;
        }
        Commands::Extract {
            vsix,
            filter,
            output,
        } => {
            extract_entries(&vsix, filter.as_deref(), &output)?;
        }
        Commands::Export {
            vsix,
            output,
            no_bump,
        } => {
            export_bundle(&vsix, &output, !no_bump)?;
        }
    }

    Ok(())
}
