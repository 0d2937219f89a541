use anyhow::Result;
use clap::{Parser, Subcommand};
use quick_directions::commands::*;

/// Saved-location driving directions from a text-selection context menu.
///
/// This CLI is a thin wrapper around `directions-core`. It acts as the
/// settings surface (edit the saved locations and the map-search flag) and as
/// a host simulator (show the menu, activate an entry, watch for changes).
#[derive(Parser, Debug)]
#[command(
    name = "quick-directions",
    version,
    about = "Context-menu driving directions from saved locations",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new profile at the given root.
    ///
    /// This creates `.quick-directions/profile.json` and the SQLite store.
    InitProfile {
        /// Profile root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional profile name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,
    },

    /// Show basic information about an existing profile.
    ProfileInfo {
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Append a saved location.
    AddLocation {
        #[arg(long, default_value = ".")]
        root: String,

        /// Menu label (e.g., "Home").
        #[arg(long)]
        name: String,

        /// Address handed to the mapping service.
        #[arg(long)]
        address: String,
    },

    /// Replace the name and address of the location at an index.
    EditLocation {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        index: usize,

        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,
    },

    /// Delete the location at an index.
    DeleteLocation {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        index: usize,
    },

    /// Move a location to a new position in the menu order.
    MoveLocation {
        #[arg(long, default_value = ".")]
        root: String,

        #[arg(long)]
        from: usize,

        #[arg(long)]
        to: usize,
    },

    /// List saved locations in menu order.
    ListLocations {
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Turn the "Search on Map" entry on or off.
    SetMapSearch {
        #[arg(long, default_value = ".")]
        root: String,

        /// on/off (also accepts true/false).
        value: String,
    },

    /// Build the context menu from the current profile state and print it.
    ShowMenu {
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Simulate clicking a menu entry with some selected text.
    Activate {
        #[arg(long, default_value = ".")]
        root: String,

        /// Menu entry identifier (e.g., location-0, map-search, no-locations).
        #[arg(long)]
        id: String,

        /// Text selected on the page.
        #[arg(long)]
        selection: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Keep a simulated menu in sync with the store and print every change.
    Watch {
        #[arg(long, default_value = ".")]
        root: String,

        /// Polling interval for changes made by other processes.
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,

        /// Stop after this many polls (runs until interrupted if omitted).
        #[arg(long)]
        max_polls: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match cli.command {
        Command::InitProfile { root, name } => init_profile_command(&root, name)?,
        Command::ProfileInfo { root, json } => profile_info_command(&root, json)?,
        Command::AddLocation { root, name, address } => {
            add_location_command(&root, &name, &address)?
        }
        Command::EditLocation { root, index, name, address } => {
            edit_location_command(&root, index, &name, &address)?
        }
        Command::DeleteLocation { root, index } => delete_location_command(&root, index)?,
        Command::MoveLocation { root, from, to } => move_location_command(&root, from, to)?,
        Command::ListLocations { root, json } => list_locations_command(&root, json)?,
        Command::SetMapSearch { root, value } => set_map_search_command(&root, &value)?,
        Command::ShowMenu { root, json } => show_menu_command(&root, json)?,
        Command::Activate { root, id, selection, json } => {
            activate_command(&root, &id, selection.as_deref(), json)?
        }
        Command::Watch { root, interval_ms, max_polls } => {
            watch_command(&root, interval_ms, max_polls)?
        }
    }

    Ok(())
}

/// Log to stderr so command output on stdout stays machine-readable.
fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("directions_core=debug,quick_directions=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });

    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
