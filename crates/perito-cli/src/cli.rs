//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use perito_domain::DocumentType;
use std::path::PathBuf;

/// PeritoAI - insurance adjuster document retrieval and report drafting.
#[derive(Debug, Parser)]
#[command(name = "perito")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Engine configuration file (TOML)
    #[arg(short, long, global = true, env = "PERITO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (ids and bare text only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Index policy and protocol documents
    Index(IndexArgs),

    /// List indexed documents
    Documents(DocumentsArgs),

    /// Search chunks within selected documents
    Search(SearchArgs),

    /// Print the formatted context for selected documents
    Context(ContextArgs),

    /// Parse pasted claim data into structured fields
    Parse(ParseArgs),

    /// Draft an adjuster report
    Report(ReportArgs),

    /// List report templates
    Templates,

    /// Run the HTTP server
    Serve,
}

/// Arguments for the index command.
#[derive(Debug, Parser)]
pub struct IndexArgs {
    /// Clear the index before indexing
    #[arg(long)]
    pub overwrite: bool,

    /// Skip the policies directory
    #[arg(long, conflicts_with = "no_protocols")]
    pub no_policies: bool,

    /// Skip the protocols directory
    #[arg(long)]
    pub no_protocols: bool,
}

/// Arguments for the documents command.
#[derive(Debug, Parser)]
pub struct DocumentsArgs {
    /// Only documents of this type
    #[arg(short = 't', long = "type", value_enum)]
    pub document_type: Option<DocumentTypeArg>,

    /// Case-insensitive filter on id and display name
    #[arg(short, long)]
    pub search: Option<String>,
}

/// Document type argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DocumentTypeArg {
    /// Insurance policies
    Policy,
    /// Internal coverage protocols
    Protocol,
}

impl From<DocumentTypeArg> for DocumentType {
    fn from(arg: DocumentTypeArg) -> Self {
        match arg {
            DocumentTypeArg::Policy => DocumentType::Policy,
            DocumentTypeArg::Protocol => DocumentType::Protocol,
        }
    }
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Search query text
    pub query: String,

    /// Document ids to search (partial ids match)
    #[arg(short, long = "doc", required_unless_present = "policy")]
    pub documents: Vec<String>,

    /// Search a single policy instead
    #[arg(short, long, conflicts_with = "documents")]
    pub policy: Option<String>,

    /// Results per document
    #[arg(short)]
    pub k: Option<usize>,
}

/// Arguments for the context command.
#[derive(Debug, Parser)]
pub struct ContextArgs {
    /// Search query text
    pub query: String,

    /// Document ids to draw from
    #[arg(short, long = "doc")]
    pub documents: Vec<String>,

    /// Chunks per document
    #[arg(short, long)]
    pub max_chunks: Option<usize>,
}

/// Text taken from an argument, a file or stdin.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct TextInput {
    /// Text given inline
    #[arg(long)]
    pub text: Option<String>,

    /// Read text from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Read text from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    #[command(flatten)]
    pub input: TextInput,
}

/// Arguments for the report command.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    /// Field notes file
    #[arg(short, long)]
    pub notes: PathBuf,

    /// Document ids to draw context from
    #[arg(short, long = "doc", required = true)]
    pub documents: Vec<String>,

    /// Template id (completo, simplificado)
    #[arg(short, long, default_value = perito_report::DEFAULT_TEMPLATE_ID)]
    pub template: String,

    /// Claim number
    #[arg(long)]
    pub claim_id: Option<String>,

    /// Explicit retrieval query
    #[arg(short, long)]
    pub query: Option<String>,

    /// File with pasted claim data to parse and include
    #[arg(long)]
    pub claim_file: Option<PathBuf>,

    /// Adjuster name
    #[arg(long)]
    pub perito_name: Option<String>,

    /// Adjuster registration number (colegiado)
    #[arg(long)]
    pub perito_license: Option<String>,

    /// Adjuster firm
    #[arg(long)]
    pub perito_firm: Option<String>,

    /// Write the report as a text file into the reports directory
    #[arg(long)]
    pub export: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_command() {
        let cli = Cli::parse_from(["perito", "index", "--overwrite", "--no-protocols"]);
        match cli.command {
            Command::Index(args) => {
                assert!(args.overwrite);
                assert!(!args.no_policies);
                assert!(args.no_protocols);
            }
            _ => panic!("Expected Index command"),
        }
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from([
            "perito", "search", "daños por agua", "-d", "HOGAR", "-d", "05_Agua", "-k", "3",
        ]);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.documents, vec!["HOGAR", "05_Agua"]);
                assert_eq!(args.k, Some(3));
                assert!(args.policy.is_none());
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_search_requires_targets() {
        assert!(Cli::try_parse_from(["perito", "search", "agua"]).is_err());
        assert!(Cli::try_parse_from(["perito", "search", "agua", "--policy", "HOGAR"]).is_ok());
    }

    #[test]
    fn test_parse_input_is_exclusive() {
        assert!(Cli::try_parse_from(["perito", "parse"]).is_err());
        assert!(Cli::try_parse_from(["perito", "parse", "--text", "a", "--stdin"]).is_err());
        assert!(Cli::try_parse_from(["perito", "parse", "--stdin"]).is_ok());
    }

    #[test]
    fn test_report_defaults() {
        let cli = Cli::parse_from(["perito", "report", "-n", "notas.txt", "-d", "HOGAR"]);
        match cli.command {
            Command::Report(args) => {
                assert_eq!(args.template, "completo");
                assert!(!args.export);
            }
            _ => panic!("Expected Report command"),
        }
    }

    #[test]
    fn test_document_type_conversion() {
        let doc_type: DocumentType = DocumentTypeArg::Protocol.into();
        assert_eq!(doc_type, DocumentType::Protocol);
    }
}
