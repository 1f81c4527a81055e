use crate::cli::args::{CliArgs, Command, FirmCommand, OutputArgs};
use crate::output::{self, OutputFormat};

fn validate_output(args: &OutputArgs) -> Result<(), String> {
    if let Some(raw) = args.output_format.as_deref() {
        OutputFormat::parse(raw).ok_or_else(|| {
            format!("invalid --output-format '{raw}', expected html, text or json")
        })?;
    }
    if let Some(path) = args.output.as_deref() {
        if path.trim().is_empty() {
            return Err("invalid --output, expected a file path".to_string());
        }
        if args.output_format.is_none() && output::infer_format_from_path(path).is_none() {
            let has_ext = std::path::Path::new(path.trim()).extension().is_some();
            if has_ext {
                return Err(format!(
                    "cannot infer export format from '{path}', use --output-format"
                ));
            }
        }
    }
    Ok(())
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    match &args.command {
        Command::Words(w) => {
            crate::utils::parse_amount_text(&w.amount)
                .map_err(|e| format!("invalid amount '{}': {e}", w.amount))?;
        }
        Command::New(n) => {
            if n.from.trim().is_empty() {
                return Err("invalid --from, expected a draft file".to_string());
            }
            if n.add_consignee && !n.save {
                return Err("--add-consignee requires --save".to_string());
            }
            validate_output(&n.output)?;
        }
        Command::Preview(p) => {
            if let Some(raw) = p.format.as_deref() {
                match OutputFormat::parse(raw) {
                    Some(OutputFormat::Text) | Some(OutputFormat::Json) => {}
                    _ => {
                        return Err(format!(
                            "invalid --format '{raw}', expected text or json"
                        ))
                    }
                }
            }
        }
        Command::Edit(e) => {
            if e.key.trim().is_empty() {
                return Err("edit requires a bilty id or number".to_string());
            }
        }
        Command::Export(e) => validate_output(&e.output)?,
        Command::Firm(FirmCommand::Add(fields)) => {
            if fields.name.as_deref().map(str::trim).unwrap_or("").is_empty() {
                return Err("firm add requires --name".to_string());
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn check(argv: &[&str]) -> Result<(), String> {
        validate(&CliArgs::parse_from(argv))
    }

    #[test]
    fn words_rejects_negative_amounts() {
        assert!(check(&["bilty", "words", "1200"]).is_ok());
        assert!(check(&["bilty", "words", "abc"]).is_ok());
        assert!(check(&["bilty", "words", "--", "-5"]).is_err());
    }

    #[test]
    fn export_format_must_be_known() {
        assert!(check(&["bilty", "export", "17", "--output-format", "pdf"]).is_err());
        assert!(check(&["bilty", "export", "17", "-o", "r.pdf"]).is_err());
        assert!(check(&["bilty", "export", "17", "-o", "r.html"]).is_ok());
        assert!(check(&["bilty", "export", "17", "-o", "receipt"]).is_ok());
    }

    #[test]
    fn add_consignee_needs_save() {
        assert!(check(&["bilty", "new", "--from", "d.yml", "--add-consignee"]).is_err());
        assert!(check(&["bilty", "new", "--from", "d.yml", "--save", "--add-consignee"]).is_ok());
    }

    #[test]
    fn firm_add_needs_a_name() {
        assert!(check(&["bilty", "firm", "add"]).is_err());
        assert!(check(&["bilty", "firm", "add", "--name", "नयी फर्म"]).is_ok());
    }
}
