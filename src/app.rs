use std::path::{Path, PathBuf};

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use log::LevelFilter;

use crate::cli::args::{
    CliArgs, Command, ConsigneeCommand, EditArgs, ExportArgs, FirmCommand, FirmFields,
    HistoryArgs, NewArgs, OutputArgs, PreviewArgs, TemplateArgs, WordsArgs,
};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::freight::FreightSummary;
use crate::model::{self, Bilty, Firm};
use crate::output::{self, OutputFormat, ReceiptRecord, DEFAULT_AMOUNT_SUFFIX};
use crate::store::Store;
use crate::utils;
use crate::words;

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn format_opt_value<'a>(v: &'a str, default: &'a str) -> &'a str {
    if v.trim().is_empty() {
        default
    } else {
        v
    }
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub command: Command,
    pub store_path: PathBuf,
    pub output_dir: PathBuf,
    pub output_format: OutputFormat,
    pub amount_suffix: String,
    pub no_color: bool,
    pub verbose: u8,
}

pub fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let store_path = args
        .store
        .as_deref()
        .or(cfg.store.as_deref())
        .map(config::expand_tilde)
        .unwrap_or_else(config::default_store_path);

    let output_dir = cfg
        .output_dir
        .as_deref()
        .map(config::expand_tilde)
        .unwrap_or_else(|| PathBuf::from("."));

    let output_format = match cfg.output_format.as_deref() {
        Some(raw) => OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid output_format '{raw}' in config"))?,
        None => OutputFormat::Html,
    };

    let amount_suffix = cfg
        .amount_suffix
        .unwrap_or_else(|| DEFAULT_AMOUNT_SUFFIX.to_string());

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    Ok(RunConfig {
        command: args.command,
        store_path,
        output_dir,
        output_format,
        amount_suffix,
        no_color,
        verbose: args.verbose,
    })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None);
    let _ = builder.try_init();
}

fn open_store(run: &RunConfig) -> Result<Store, String> {
    log::debug!("opening store {}", run.store_path.display());
    Store::open(&run.store_path).map_err(|e| e.to_string())
}

fn save_store(store: &Store) -> Result<(), String> {
    store.save().map_err(|e| e.to_string())
}

fn resolve_export(
    args: &OutputArgs,
    run: &RunConfig,
    bilty_number: &str,
) -> Result<(PathBuf, OutputFormat), String> {
    let format = match args.output_format.as_deref() {
        Some(raw) => OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid --output-format '{raw}'"))?,
        None => args
            .output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(run.output_format),
    };
    let path = match args.output.as_deref() {
        Some(p) => config::expand_tilde(p.trim()),
        None => {
            let dir = args
                .output_dir
                .as_deref()
                .map(config::expand_tilde)
                .unwrap_or_else(|| run.output_dir.clone());
            dir.join(output::export_file_name(bilty_number, format))
        }
    };
    Ok((path, format))
}

fn write_export(path: &Path, rendered: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                format!("failed to create output directory '{}': {e}", parent.display())
            })?;
        }
    }
    std::fs::write(path, rendered)
        .map_err(|e| format!("failed to write output file '{}': {e}", path.display()))
}

fn export_record(
    record: &ReceiptRecord,
    args: &OutputArgs,
    run: &RunConfig,
) -> Result<PathBuf, String> {
    let (path, format) = resolve_export(args, run, &record.bilty_number)?;
    write_export(&path, &output::render(record, format))?;
    log::info!("exported bilty {} as {:?}", record.bilty_number, format);
    Ok(path)
}

fn print_preview(record: &ReceiptRecord) {
    let text = String::from_utf8_lossy(&output::render_text(record)).to_string();
    println!("{text}");
}

fn print_balance(record: &ReceiptRecord) {
    let balance = format!("₹ {}", record.balance);
    let balance = if record.balance_rupees.map_or(true, |b| b < 0) {
        balance.red().bold()
    } else {
        balance.green().bold()
    };
    println!(":: {:<10}: {}", "Balance", balance);
    format_kv_line("In words", &record.amount_in_words);
}

fn run_words(args: &WordsArgs) -> Result<(), String> {
    let amount = utils::parse_amount_text(&args.amount)
        .map_err(|e| format!("invalid amount '{}': {e}", args.amount))?;
    let text = words::optional_amount_in_words(amount);
    match args.suffix.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(suffix) => println!("{text} {suffix}"),
        None => println!("{text}"),
    }
    Ok(())
}

fn run_template(args: &TemplateArgs, run: &RunConfig) -> Result<(), String> {
    let store = open_store(run)?;
    let firm_id = match args.firm.as_deref() {
        Some(id) => store
            .firm(id)
            .map(|f| f.id.clone())
            .ok_or_else(|| format!("firm not found: {id}"))?,
        None => store.active_firm().id.clone(),
    };
    let yaml = model::draft_template_yaml(&firm_id);
    match args.output.as_deref() {
        Some(path) => {
            let path = config::expand_tilde(path);
            write_export(&path, yaml.as_bytes())?;
            format_kv_line("Draft", &path.display().to_string());
        }
        None => print!("{yaml}"),
    }
    Ok(())
}

fn run_edit(args: &EditArgs, run: &RunConfig) -> Result<(), String> {
    let store = open_store(run)?;
    let bilty = store.find_bilty(&args.key).map_err(|e| e.to_string())?;
    let as_json = args
        .output
        .as_deref()
        .is_some_and(|p| p.trim().to_lowercase().ends_with(".json"));
    let draft = if as_json {
        serde_json::to_string_pretty(bilty).map_err(|e| e.to_string())? + "\n"
    } else {
        model::bilty_to_yaml(bilty).map_err(|e| e.to_string())?
    };
    match args.output.as_deref() {
        Some(path) => {
            let path = config::expand_tilde(path);
            write_export(&path, draft.as_bytes())?;
            format_kv_line("Draft", &path.display().to_string());
            log::info!("wrote bilty {} for editing", bilty.id);
        }
        None => print!("{draft}"),
    }
    Ok(())
}

fn run_new(args: &NewArgs, run: &RunConfig) -> Result<(), String> {
    let mut store = open_store(run)?;
    let mut bilty =
        model::load_draft(&config::expand_tilde(&args.from)).map_err(|e| e.to_string())?;
    let active_id = store.active_firm().id.clone();
    bilty.normalize(&active_id);
    if store.firm(&bilty.firm_id).is_none() {
        log::warn!(
            "draft firm '{}' is unknown, using active firm '{}'",
            bilty.firm_id,
            active_id
        );
        bilty.firm_id = active_id;
    }

    let record = output::build_record(&bilty, store.firm_for(&bilty), &run.amount_suffix);
    print_preview(&record);
    print_balance(&record);

    if args.save {
        let consignee = bilty.consignee_name.trim().to_string();
        let replaced = store.upsert_bilty(bilty.clone());
        if args.add_consignee && !consignee.is_empty() {
            store.add_consignee(&consignee).map_err(|e| e.to_string())?;
        }
        save_store(&store)?;
        let verb = if replaced { "updated" } else { "saved" };
        println!(
            ":: {:<10}: bilty #{} {} ({})",
            "Store",
            record.bilty_number,
            verb.green(),
            bilty.id
        );
    }

    if args.export {
        let path = export_record(&record, &args.output, run)?;
        format_kv_line("Exported", &path.display().to_string());
    }
    Ok(())
}

fn run_preview(args: &PreviewArgs, run: &RunConfig) -> Result<(), String> {
    let store = open_store(run)?;
    let bilty = store.find_bilty(&args.key).map_err(|e| e.to_string())?;
    let record = output::build_record(bilty, store.firm_for(bilty), &run.amount_suffix);
    match args.format.as_deref().and_then(OutputFormat::parse) {
        Some(OutputFormat::Json) => {
            println!("{}", String::from_utf8_lossy(&output::render_json(&record)))
        }
        _ => {
            print_preview(&record);
            print_balance(&record);
        }
    }
    Ok(())
}

fn run_export(args: &ExportArgs, run: &RunConfig) -> Result<(), String> {
    let store = open_store(run)?;
    let bilty = store.find_bilty(&args.key).map_err(|e| e.to_string())?;
    let record = output::build_record(bilty, store.firm_for(bilty), &run.amount_suffix);
    let path = export_record(&record, &args.output, run)?;
    format_kv_line("Exported", &path.display().to_string());
    Ok(())
}

fn history_line(bilty: &Bilty) -> String {
    let balance = FreightSummary::compute(bilty).balance_rupees();
    format!(
        "#{:<8} {:<12} {:<28} ₹ {:>12}  {}",
        format_opt_value(&bilty.bilty_number, "1"),
        utils::format_receipt_date(&bilty.date),
        format_opt_value(&bilty.consignee_name, "-"),
        output::display_rupees(balance),
        bilty.id.dimmed()
    )
}

fn run_history(args: &HistoryArgs, run: &RunConfig) -> Result<(), String> {
    let mut store = open_store(run)?;
    if let Some(key) = args.delete.as_deref() {
        let removed = store.remove_bilty(key).map_err(|e| e.to_string())?;
        save_store(&store)?;
        println!(
            ":: {:<10}: bilty #{} {}",
            "Store",
            removed.bilty_number,
            "deleted".red()
        );
        return Ok(());
    }
    if store.history().is_empty() {
        println!("{}", "इतिहास खाली है".dimmed());
        return Ok(());
    }
    for bilty in store.history() {
        println!("{}", history_line(bilty));
    }
    format_kv_line("Total", &store.history().len().to_string());
    Ok(())
}

fn run_consignee(cmd: &ConsigneeCommand, run: &RunConfig) -> Result<(), String> {
    let mut store = open_store(run)?;
    match cmd {
        ConsigneeCommand::List => {
            if store.consignees().is_empty() {
                println!("{}", "कोई प्राप्तकर्ता नहीं".dimmed());
            }
            for name in store.consignees() {
                println!("{name}");
            }
        }
        ConsigneeCommand::Add { name } => {
            let added = store.add_consignee(name).map_err(|e| e.to_string())?;
            if added {
                save_store(&store)?;
                format_kv_line("Added", name.trim());
            } else {
                format_kv_line("Exists", name.trim());
            }
        }
        ConsigneeCommand::Remove { name } => {
            if !store.remove_consignee(name) {
                return Err(format!("consignee not found: {}", name.trim()));
            }
            save_store(&store)?;
            format_kv_line("Removed", name.trim());
        }
    }
    Ok(())
}

fn apply_firm_fields(firm: &mut Firm, fields: &FirmFields) {
    let assign = |slot: &mut String, value: &Option<String>| {
        if let Some(v) = value {
            *slot = v.trim().to_string();
        }
    };
    assign(&mut firm.name, &fields.name);
    assign(&mut firm.address, &fields.address);
    assign(&mut firm.left_phones, &fields.left_phones);
    assign(&mut firm.right_phones, &fields.right_phones);
    assign(&mut firm.left_name, &fields.left_name);
    assign(&mut firm.right_name, &fields.right_name);
    if let Some(blessing) = &fields.blessing {
        firm.blessing = blessing.replace("\\n", "\n");
    }
}

fn print_firm(firm: &Firm, active: bool) {
    let marker = if active { "*".green().bold() } else { " ".normal() };
    println!("{marker} {} {}", firm.id.bold(), firm.name);
}

fn run_firm(cmd: &FirmCommand, run: &RunConfig) -> Result<(), String> {
    let mut store = open_store(run)?;
    match cmd {
        FirmCommand::List => {
            let active = store.active_firm().id.clone();
            for firm in store.firms() {
                print_firm(firm, firm.id == active);
            }
        }
        FirmCommand::Show { id } => {
            let firm = match id.as_deref() {
                Some(id) => store.firm(id).ok_or_else(|| format!("firm not found: {id}"))?,
                None => store.active_firm(),
            };
            format_kv_line("Id", &firm.id);
            format_kv_line("Name", &firm.name);
            format_kv_line("Address", &firm.address);
            format_kv_line("Phones", &format!("{} | {}", firm.left_phones, firm.right_phones));
            format_kv_line("Partners", &format!("{} | {}", firm.left_name, firm.right_name));
            for line in firm.blessing.lines() {
                format_kv_line("Blessing", line);
            }
        }
        FirmCommand::Add(fields) => {
            let mut firm = Firm::blank(String::new());
            apply_firm_fields(&mut firm, fields);
            let id = store.add_firm(firm).id.clone();
            if fields.activate {
                store.set_active_firm(&id).map_err(|e| e.to_string())?;
            }
            save_store(&store)?;
            format_kv_line("Added", &id);
        }
        FirmCommand::Edit { id, fields } => {
            let mut firm = store
                .firm(id)
                .cloned()
                .ok_or_else(|| format!("firm not found: {id}"))?;
            apply_firm_fields(&mut firm, fields);
            store.update_firm(firm).map_err(|e| e.to_string())?;
            if fields.activate {
                store.set_active_firm(id).map_err(|e| e.to_string())?;
            }
            save_store(&store)?;
            format_kv_line("Updated", id);
        }
        FirmCommand::Use { id } => {
            store.set_active_firm(id).map_err(|e| e.to_string())?;
            save_store(&store)?;
            format_kv_line("Active", id);
        }
        FirmCommand::Remove { id } => {
            let removed = store.remove_firm(id).map_err(|e| e.to_string())?;
            save_store(&store)?;
            format_kv_line("Removed", &removed.id);
            format_kv_line("Active", &store.active_firm().id);
        }
    }
    Ok(())
}

pub fn run(run: RunConfig) -> Result<(), String> {
    match &run.command {
        Command::Words(args) => run_words(args),
        Command::Template(args) => run_template(args, &run),
        Command::New(args) => run_new(args, &run),
        Command::Edit(args) => run_edit(args, &run),
        Command::Preview(args) => run_preview(args, &run),
        Command::Export(args) => run_export(args, &run),
        Command::History(args) => run_history(args, &run),
        Command::Consignee(cmd) => run_consignee(cmd, &run),
        Command::Firm(cmd) => run_firm(cmd, &run),
    }
}

fn load_user_config(args: &CliArgs) -> Result<ConfigFile, String> {
    if let Some(path) = args.config.as_deref() {
        return config::load_config(&config::expand_tilde(path), false);
    }
    let Some(path) = config::default_config_path() else {
        return Ok(ConfigFile::default());
    };
    if let Err(e) = config::ensure_default_config_file(&path) {
        log::warn!("{e}");
    }
    config::load_config(&path, true)
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_logging(args.verbose);

    let cfg = load_user_config(&args)?;
    let run_config = build_run_config(args, cfg)?;
    if run_config.no_color {
        colored::control::set_override(false);
    }
    log::debug!("run config: {run_config:?}");

    run(run_config)
}
