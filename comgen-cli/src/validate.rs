use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::Format;
use crate::generate::parse_text;

/// Every problem found in `input`: schema, parse, compile and structural.
pub fn collect_errors(input: &Path) -> Result<Vec<String>> {
    let mut all_errors: Vec<String> = Vec::new();

    let format = crate::detect_format(input).context("input file")?;
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;

    let schema = match format {
        Format::Json => comgen_json::validate_json_schema(&text),
        Format::Yaml => comgen_json::validate_yaml_schema(&text),
    };
    if let Err(schema_errors) = schema {
        for e in &schema_errors {
            all_errors.push(format!("schema: {e}"));
        }
    }

    let config = match parse_text(&text, format) {
        Ok(config) => config,
        Err(e) => {
            all_errors.push(format!("parse: {e}"));
            return Ok(all_errors);
        }
    };

    match comgen_ir::compile(&config) {
        Ok(compiled) => {
            for result in [
                comgen_ir::validate_network(&compiled.network),
                comgen_ir::validate_routing(&compiled.routing),
            ] {
                if let Err(errors) = result {
                    all_errors.extend(errors.iter().map(ToString::to_string));
                }
            }
            // The mirror carries the same routes; checked only after the main pass.
            if let Err(e) = comgen_ir::compile_self_test(&config) {
                all_errors.push(format!("self-test: {e}"));
            }
        }
        Err(e) => all_errors.push(format!("compile: {e}")),
    }

    Ok(all_errors)
}

pub fn run_validate(input: &Path, quiet: bool, summary: bool) -> Result<()> {
    let all_errors = collect_errors(input)?;

    if all_errors.is_empty() {
        if !quiet {
            println!("{}: valid", input.display());
        }
        return Ok(());
    }

    if !quiet && !summary {
        for e in &all_errors {
            eprintln!("{}: {e}", input.display());
        }
    }

    if summary || !quiet {
        println!(
            "{}: {} validation error{}",
            input.display(),
            all_errors.len(),
            if all_errors.len() == 1 { "" } else { "s" }
        );
    }

    bail!(
        "{} validation error{} in {}",
        all_errors.len(),
        if all_errors.len() == 1 { "" } else { "s" },
        input.display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../test-fixtures")
            .join(name)
    }

    #[test]
    fn fixture_is_valid() {
        assert_eq!(collect_errors(&fixture("network.json")).unwrap(), Vec::<String>::new());
        assert!(run_validate(&fixture("network.yml"), true, false).is_ok());
    }

    #[test]
    fn unknown_class_reported() {
        let errors = collect_errors(&fixture("unknown-class.json")).unwrap();
        assert_eq!(errors, vec!["compile: unknown class Xcp".to_string()]);
        let err = run_validate(&fixture("unknown-class.json"), true, false).unwrap_err();
        assert!(err.to_string().starts_with("1 validation error in"));
    }

    #[test]
    fn unknown_route_module_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("com.json");
        std::fs::write(
            &path,
            r#"{
                "Modules": [{
                    "class": "SomeIp",
                    "SD": {"multicast": "224.224.224.245"},
                    "servers": [{"name": "math", "reliable": 30560}]
                }],
                "routes": [{"from": "Com", "to": "CanIf", "name": "SIG"}]
            }"#,
        )
        .unwrap();
        let errors = collect_errors(&path).unwrap();
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].starts_with("compile: "), "{errors:?}");
        assert!(errors[0].contains("Com"), "{errors:?}");
    }

    #[test]
    fn schema_and_parse_errors_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"Modules": [{"class": "DoIp", "max_connections": 1}]}"#).unwrap();
        let errors = collect_errors(&path).unwrap();
        assert!(errors.iter().any(|e| e.starts_with("schema: ")), "{errors:?}");
        assert!(
            errors.iter().any(|e| e.starts_with("parse: ") && e.contains("discovery")),
            "{errors:?}"
        );
    }

    #[test]
    fn structural_errors_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dup.json");
        std::fs::write(
            &path,
            r#"{"routes": [
                {"from": "CanTp", "to": "DoIP", "name": "GW"},
                {"from": "LinTp", "to": "DoIP", "name": "GW"}
            ]}"#,
        )
        .unwrap();
        let errors = collect_errors(&path).unwrap();
        // no SOME/IP module, so there is no self-test set to check
        assert_eq!(
            errors,
            vec!["gateway buffer 'GW' is shared by more than one route".to_string()]
        );
    }
}
