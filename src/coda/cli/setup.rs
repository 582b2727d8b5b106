use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

/// Returns the version string, including the git hash for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON records
    #[default]
    Json,
    /// One aligned `id  name` line per record
    Text,
}

#[derive(Parser, Debug)]
#[command(
    name = "coda",
    bin_name = "coda",
    version = get_version(),
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Query Coda docs and round-trip them through YAML templates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Record output format for list/get commands
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json, help_heading = "Options")]
    pub format: OutputFormat,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Query,
    Template,
    Registry,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Query => "Query Commands:",
            CommandGroup::Template => "Template Commands:",
            CommandGroup::Registry => "Registry Commands:",
        }
    }

    /// Returns the group for a given command name
    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "register-template" | "list-templates" | "remove-template" => {
                Some(CommandGroup::Registry)
            }
            "export-template" | "import-template" | "export-table" => {
                Some(CommandGroup::Template)
            }
            n if n.starts_with("list-") || n.starts_with("get-") => Some(CommandGroup::Query),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Query,
            CommandGroup::Template,
            CommandGroup::Registry,
        ]
    }
}

pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("coda {version}\n"));
    output.push_str("Query Coda docs and round-trip them through YAML templates\n");
    output.push('\n');
    output.push_str("Usage: coda [OPTIONS] <COMMAND>\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<18} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("      --format <FORMAT>  Record output format [json, text]\n");
    output.push_str("  -v, --verbose          Verbose output\n");
    output.push_str("  -h, --help             Print help\n");
    output.push_str("  -V, --version          Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for a command by name
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            let help = subcmd.render_help();
            print!("{}", help);
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Query(QueryCommands),

    #[command(flatten)]
    Template(TemplateCommands),

    #[command(flatten)]
    Registry(RegistryCommands),
}

impl Commands {
    /// The subcommand's name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Query(c) => match c {
                QueryCommands::ListDocs => "list-docs",
                QueryCommands::ListSections { .. } => "list-sections",
                QueryCommands::ListTables { .. } => "list-tables",
                QueryCommands::ListViews { .. } => "list-views",
                QueryCommands::ListColumns { .. } => "list-columns",
                QueryCommands::ListRows { .. } => "list-rows",
                QueryCommands::ListControls { .. } => "list-controls",
                QueryCommands::ListFolders { .. } => "list-folders",
                QueryCommands::ListFormulas { .. } => "list-formulas",
                QueryCommands::GetDoc { .. } => "get-doc",
                QueryCommands::GetSection { .. } => "get-section",
                QueryCommands::GetColumn { .. } => "get-column",
            },
            Commands::Template(c) => match c {
                TemplateCommands::ExportTemplate { .. } => "export-template",
                TemplateCommands::ImportTemplate { .. } => "import-template",
                TemplateCommands::ExportTable { .. } => "export-table",
            },
            Commands::Registry(c) => match c {
                RegistryCommands::RegisterTemplate { .. } => "register-template",
                RegistryCommands::ListTemplates => "list-templates",
                RegistryCommands::RemoveTemplate { .. } => "remove-template",
            },
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum QueryCommands {
    /// List documents you own
    #[command(display_order = 1)]
    ListDocs,

    /// List the sections of a document
    #[command(display_order = 2)]
    ListSections {
        /// Document id or registered template name
        #[arg(long)]
        doc: String,
    },

    /// List the tables of a document
    #[command(display_order = 3)]
    ListTables {
        #[arg(long)]
        doc: String,
    },

    /// List the views of a document
    #[command(display_order = 4)]
    ListViews {
        #[arg(long)]
        doc: String,
    },

    /// List the columns of a table
    #[command(display_order = 5)]
    ListColumns {
        #[arg(long)]
        doc: String,
        #[arg(long)]
        table: String,
    },

    /// List the rows of a table
    #[command(display_order = 6)]
    ListRows {
        #[arg(long)]
        doc: String,
        #[arg(long)]
        table: String,
    },

    /// List the controls of a document
    #[command(display_order = 7)]
    ListControls {
        #[arg(long)]
        doc: String,
    },

    /// List the folders of a document
    #[command(display_order = 8)]
    ListFolders {
        #[arg(long)]
        doc: String,
    },

    /// List the named formulas of a document
    #[command(display_order = 9)]
    ListFormulas {
        #[arg(long)]
        doc: String,
    },

    /// Show a document's metadata
    #[command(display_order = 10)]
    GetDoc {
        #[arg(long)]
        doc: String,
    },

    /// Show one section
    #[command(display_order = 11)]
    GetSection {
        #[arg(long)]
        doc: String,
        #[arg(long)]
        section: String,
    },

    /// Show one column
    #[command(display_order = 12)]
    GetColumn {
        #[arg(long)]
        doc: String,
        #[arg(long)]
        table: String,
        #[arg(long)]
        column: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// Export a document as a YAML template
    #[command(display_order = 20)]
    ExportTemplate {
        /// Document id or registered template name
        #[arg(long)]
        doc: String,

        /// Write the template here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Create a new document from a YAML template
    #[command(display_order = 21)]
    ImportTemplate {
        /// YAML template file
        #[arg(long)]
        file: String,

        /// Placeholder values, e.g. "DOC_NAME=Launch OWNER_NAME='Ann Lee'"
        #[arg(long)]
        variables: Option<String>,
    },

    /// Export a table's rows as CSV
    #[command(display_order = 22)]
    ExportTable {
        #[arg(long)]
        doc: String,
        #[arg(long)]
        table: String,

        /// Write the CSV here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegistryCommands {
    /// Register a document as a named template
    #[command(display_order = 30)]
    RegisterTemplate {
        #[arg(long)]
        name: String,
        #[arg(long)]
        doc: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// List registered templates
    #[command(display_order = 31)]
    ListTemplates,

    /// Forget a registered template
    #[command(display_order = 32)]
    RemoveTemplate {
        #[arg(long)]
        name: String,
    },
}
