use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "bilty",
    version,
    about = "lorry receipt (bilty) book for a small transport firm",
    long_about = "Bilty keeps firm profiles, consignees and saved lorry receipts, works out freight and balance, and writes the balance in Hindi words.\n\nExamples:\n  bilty words 12345\n  bilty template -o draft.yml\n  bilty new --from draft.yml --save --export\n  bilty edit 17 -o draft.yml\n  bilty export 17 -o receipt.html\n\nTip: Use --config to keep the store location and export settings in one place."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.bilty/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 's',
        long = "st",
        visible_alias = "store",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to the JSON store (defaults to ~/.bilty/store.json)."
    )]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write an amount in Hindi words.
    Words(WordsArgs),
    /// Write a blank bilty draft to fill in.
    Template(TemplateArgs),
    /// Compute and preview a bilty from a draft file.
    New(NewArgs),
    /// Write a saved bilty back out as a draft for editing.
    Edit(EditArgs),
    /// Preview a saved bilty.
    Preview(PreviewArgs),
    /// Export a saved bilty as a printable receipt.
    Export(ExportArgs),
    /// List or manage saved bilties.
    History(HistoryArgs),
    /// Manage the consignee list.
    #[command(subcommand)]
    Consignee(ConsigneeCommand),
    /// Manage firm profiles.
    #[command(subcommand)]
    Firm(FirmCommand),
}

#[derive(Args, Debug, Clone)]
pub struct WordsArgs {
    #[arg(
        value_name = "AMOUNT",
        allow_hyphen_values = true,
        help = "Amount in rupees; fractions are dropped."
    )]
    pub amount: String,

    #[arg(
        long = "sfx",
        visible_alias = "suffix",
        value_name = "TEXT",
        help_heading = "Output",
        help = "Text appended after the words (e.g. \"रुपये मात्र\")."
    )]
    pub suffix: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TemplateArgs {
    #[arg(
        short = 'o',
        long = "o",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the draft here instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        long = "firm",
        value_name = "ID",
        help_heading = "Input",
        help = "Firm the draft is written for (defaults to the active firm)."
    )]
    pub firm: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    #[arg(
        short = 'f',
        long = "from",
        visible_alias = "draft",
        value_name = "FILE",
        help_heading = "Input",
        help = "Draft file (YAML or JSON)."
    )]
    pub from: String,

    #[arg(
        long = "save",
        help_heading = "Store",
        help = "Save the bilty to history (replaces an entry with the same id)."
    )]
    pub save: bool,

    #[arg(
        long = "ac",
        visible_alias = "add-consignee",
        help_heading = "Store",
        help = "Add the consignee to the consignee list when saving."
    )]
    pub add_consignee: bool,

    #[arg(
        short = 'e',
        long = "exp",
        visible_alias = "export",
        help_heading = "Output",
        help = "Also export the receipt file."
    )]
    pub export: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    #[arg(value_name = "BILTY", help = "Saved bilty id or number.")]
    pub key: String,

    #[arg(
        long = "fmt",
        visible_alias = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Preview format: text or json."
    )]
    pub format: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    #[arg(value_name = "BILTY", help = "Saved bilty id or number.")]
    pub key: String,

    #[arg(
        short = 'o',
        long = "o",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the draft here instead of stdout (.json for JSON, YAML otherwise)."
    )]
    pub output: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[arg(value_name = "BILTY", help = "Saved bilty id or number.")]
    pub key: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    #[arg(
        short = 'o',
        long = "o",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Export file (defaults to Rampura_Bilty_<number>.<ext> in the output directory)."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Export format: html, text or json."
    )]
    pub output_format: Option<String>,

    #[arg(
        long = "od",
        visible_alias = "output-dir",
        value_name = "DIR",
        help_heading = "Output",
        help = "Directory for exported receipts."
    )]
    pub output_dir: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    #[arg(
        long = "rm",
        visible_alias = "delete",
        value_name = "BILTY",
        help_heading = "Store",
        help = "Delete a saved bilty by id or number."
    )]
    pub delete: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConsigneeCommand {
    /// List consignees.
    List,
    /// Add a consignee.
    Add {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Remove a consignee.
    Remove {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum FirmCommand {
    /// List firm profiles; the active one is marked.
    List,
    /// Show a firm profile (defaults to the active firm).
    Show {
        #[arg(value_name = "ID")]
        id: Option<String>,
    },
    /// Add a firm profile.
    Add(FirmFields),
    /// Change fields of an existing firm profile.
    Edit {
        #[arg(value_name = "ID")]
        id: String,
        #[command(flatten)]
        fields: FirmFields,
    },
    /// Make a firm the active one.
    Use {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Remove a firm profile.
    Remove {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FirmFields {
    #[arg(long = "name", value_name = "TEXT", help = "Firm name printed in the header.")]
    pub name: Option<String>,

    #[arg(long = "address", value_name = "TEXT")]
    pub address: Option<String>,

    #[arg(long = "left-phones", value_name = "TEXT")]
    pub left_phones: Option<String>,

    #[arg(long = "right-phones", value_name = "TEXT")]
    pub right_phones: Option<String>,

    #[arg(long = "left-name", value_name = "TEXT")]
    pub left_name: Option<String>,

    #[arg(long = "right-name", value_name = "TEXT")]
    pub right_name: Option<String>,

    #[arg(
        long = "blessing",
        value_name = "TEXT",
        help = "Header blessing; use \\n to split lines."
    )]
    pub blessing: Option<String>,

    #[arg(long = "activate", help = "Make this firm the active one.")]
    pub activate: bool,
}
