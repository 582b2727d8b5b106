use super::print::{eprint_messages, print_messages, render_records, render_templates};
use super::setup::{
    print_grouped_help, print_help_for_command, Cli, Commands, OutputFormat, QueryCommands,
    RegistryCommands, TemplateCommands,
};
use clap::Parser;
use coda::commands::query::Resource;
use coda::commands::CmdResult;
use coda::error::{CodaError, Result};
use coda::init::{initialize, CodaContext};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.help {
        match &cli.command {
            Some(command) => print_help_for_command(command.name()),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    let Some(command) = cli.command else {
        print_grouped_help();
        return Ok(());
    };

    init_logging(cli.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut ctx = initialize(&cwd)?;

    match command {
        Commands::Query(cmd) => handle_query(&ctx, cmd, cli.format),
        Commands::Template(cmd) => match cmd {
            TemplateCommands::ExportTemplate { doc, output } => {
                handle_export_template(&ctx, &doc, output.as_deref())
            }
            TemplateCommands::ImportTemplate { file, variables } => {
                handle_import_template(&ctx, &file, variables.as_deref())
            }
            TemplateCommands::ExportTable { doc, table, output } => {
                handle_export_table(&ctx, &doc, &table, output.as_deref())
            }
        },
        Commands::Registry(cmd) => handle_registry(&mut ctx, cmd),
    }
}

/// Log to stderr so stdout stays clean for YAML and CSV. `RUST_LOG` applies unless
/// `--verbose` asks for debug output.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("coda=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_query(ctx: &CodaContext, cmd: QueryCommands, format: OutputFormat) -> Result<()> {
    let (doc, resource, single) = match cmd {
        QueryCommands::ListDocs => {
            let result = ctx.api.list_docs()?;
            print!("{}", with_newline(render_records(&result.records, format, false)));
            return Ok(());
        }
        QueryCommands::ListSections { doc } => (doc, Resource::Sections, false),
        QueryCommands::ListTables { doc } => (doc, Resource::Tables, false),
        QueryCommands::ListViews { doc } => (doc, Resource::Views, false),
        QueryCommands::ListColumns { doc, table } => (doc, Resource::Columns { table }, false),
        QueryCommands::ListRows { doc, table } => (doc, Resource::Rows { table }, false),
        QueryCommands::ListControls { doc } => (doc, Resource::Controls, false),
        QueryCommands::ListFolders { doc } => (doc, Resource::Folders, false),
        QueryCommands::ListFormulas { doc } => (doc, Resource::Formulas, false),
        QueryCommands::GetDoc { doc } => (doc, Resource::Doc, true),
        QueryCommands::GetSection { doc, section } => (doc, Resource::Section(section), true),
        QueryCommands::GetColumn { doc, table, column } => {
            (doc, Resource::Column { table, column }, true)
        }
    };

    let result = ctx.api.query(&doc, &resource)?;
    print!("{}", with_newline(render_records(&result.records, format, single)));
    print_messages(&result.messages);
    Ok(())
}

fn handle_export_template(ctx: &CodaContext, doc: &str, output: Option<&str>) -> Result<()> {
    let result = ctx.api.export_template(doc)?;
    emit_output(result, output, "Template exported to")
}

fn handle_import_template(ctx: &CodaContext, file: &str, variables: Option<&str>) -> Result<()> {
    let path = Path::new(file);
    if !path.exists() {
        return Err(CodaError::Usage(format!(
            "Template file '{}' not found",
            file
        )));
    }
    let text = fs::read_to_string(path).map_err(|e| io_error_at(file, e))?;
    let variables = variables.map(parse_variables).unwrap_or_default();

    let result = ctx.api.import_template(&text, &variables)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export_table(
    ctx: &CodaContext,
    doc: &str,
    table: &str,
    output: Option<&str>,
) -> Result<()> {
    let result = ctx.api.export_table(doc, table)?;
    emit_output(result, output, "Table data exported to")
}

fn handle_registry(ctx: &mut CodaContext, cmd: RegistryCommands) -> Result<()> {
    let result = match cmd {
        RegistryCommands::RegisterTemplate {
            name,
            doc,
            description,
        } => ctx
            .api
            .register_template(&name, &doc, description.as_deref())?,
        RegistryCommands::ListTemplates => {
            let result = ctx.api.list_templates()?;
            print!("{}", render_templates(&result.templates));
            result
        }
        RegistryCommands::RemoveTemplate { name } => ctx.api.remove_template(&name)?,
    };
    tracing::debug!(path = %ctx.registry_path.display(), "registry");
    print_messages(&result.messages);
    Ok(())
}

/// Write `result.output` to `path`, or to stdout with messages moved to stderr.
fn emit_output(result: CmdResult, path: Option<&str>, written: &str) -> Result<()> {
    let Some(content) = result.output else {
        print_messages(&result.messages);
        return Ok(());
    };

    match path {
        Some(path) => {
            fs::write(path, &content).map_err(|e| io_error_at(path, e))?;
            print_messages(&result.messages);
            println!("{} {}", written, path);
        }
        None => {
            print!("{}", with_newline(content));
            eprint_messages(&result.messages);
        }
    }
    Ok(())
}

fn with_newline(mut text: String) -> String {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

fn io_error_at(path: &str, e: std::io::Error) -> CodaError {
    CodaError::Io(std::io::Error::new(e.kind(), format!("{}: {}", path, e)))
}

/// Parse `K=V K2='v w'` into a map.
///
/// Splitting follows shell rules: whitespace separates words, single quotes are literal,
/// double quotes allow `\"` and `\\`. Only the first `=` splits a word; words without
/// one are ignored. Unbalanced quotes fall back to a plain whitespace split.
pub(super) fn parse_variables(input: &str) -> HashMap<String, String> {
    let words = split_words(input)
        .unwrap_or_else(|| input.split_whitespace().map(str::to_string).collect());

    words
        .into_iter()
        .filter_map(|word| {
            word.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
        })
        .collect()
}

fn split_words(input: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '\'' => break,
                        other => current.push(other),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => match chars.next()? {
                            escaped @ ('"' | '\\' | '$' | '`') => current.push(escaped),
                            other => {
                                current.push('\\');
                                current.push(other);
                            }
                        },
                        other => current.push(other),
                    }
                }
            }
            '\\' => {
                in_word = true;
                current.push(chars.next()?);
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            other => {
                in_word = true;
                current.push(other);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Some(words)
}
