use anyhow::{Context, Result, bail};
use comgen_ir::{CompiledConfig, NetworkConfig};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::Format;

pub const GEN_DIR: &str = "GEN";
pub const SELF_TEST_DIR: &str = "GENT";
pub const NETWORK_FILE: &str = "Network.json";
pub const ROUTING_FILE: &str = "PduR.json";

pub fn parse_text(text: &str, format: Format) -> Result<NetworkConfig, comgen_json::ParseError> {
    match format {
        Format::Json => comgen_json::parse_json(text),
        Format::Yaml => comgen_json::parse_yaml(text),
    }
}

pub fn load_config(input: &Path) -> Result<NetworkConfig> {
    let format = crate::detect_format(input).context("input file")?;
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    parse_text(&text, format).with_context(|| format!("parsing {}", input.display()))
}

/// Directory GEN/ and GENT/ go below for `input`.
pub fn output_root(input: &Path, output: Option<&Path>, batch: bool) -> PathBuf {
    match output {
        Some(dir) if batch => {
            let stem = input.file_stem().unwrap_or_default();
            dir.join(stem)
        }
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    }
}

fn log_validation(input: &Path, compiled: &CompiledConfig) {
    for result in [
        comgen_ir::validate_network(&compiled.network),
        comgen_ir::validate_routing(&compiled.routing),
    ] {
        if let Err(errors) = result {
            for e in &errors {
                log::warn!("{}: {e}", input.display());
            }
        }
    }
}

/// Rendered documents of one compiled configuration.
struct Rendered {
    network: String,
    routing: String,
}

fn render(compiled: &CompiledConfig) -> Result<Rendered> {
    Ok(Rendered {
        network: comgen_json::write_network(&compiled.network).context("writing network")?,
        routing: comgen_json::write_routing(&compiled.routing).context("writing routing")?,
    })
}

fn write_rendered(dir: &Path, rendered: &Rendered) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    for (file, content) in [(NETWORK_FILE, &rendered.network), (ROUTING_FILE, &rendered.routing)] {
        let path = dir.join(file);
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Written: {}", path.display());
    }
    Ok(())
}

pub fn run_generate(input: &Path, root: &Path, dry_run: bool, self_test: bool) -> Result<()> {
    let start = Instant::now();
    let config = load_config(input)?;
    log::info!(
        "Parsed {}: modules={}, routes={}",
        input.display(),
        config.modules.len(),
        config.routes.len()
    );

    let compiled =
        comgen_ir::compile(&config).with_context(|| format!("compiling {}", input.display()))?;
    log_validation(input, &compiled);

    let mirrored = if self_test {
        comgen_ir::compile_self_test(&config)
            .with_context(|| format!("compiling self-test for {}", input.display()))?
    } else {
        None
    };

    // Everything is rendered before the first file is written, so a failing
    // document leaves no output behind.
    let main = render(&compiled)?;
    let loopback = mirrored.as_ref().map(render).transpose()?;

    if dry_run {
        println!(
            "dry run: {} -> {} sockets, {} routing paths{}",
            input.display(),
            compiled.network.sockets().len(),
            compiled.routing.paths.len(),
            if loopback.is_some() { ", with self-test" } else { "" }
        );
        return Ok(());
    }

    write_rendered(&root.join(GEN_DIR), &main)?;
    if let Some(loopback) = &loopback {
        write_rendered(&root.join(SELF_TEST_DIR), loopback)?;
    }

    log::debug!("Generate time: {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);
    println!("Generated {} -> {}", input.display(), root.join(GEN_DIR).display());
    Ok(())
}

pub fn run_batch_generate(
    inputs: &[PathBuf],
    output: Option<&Path>,
    dry_run: bool,
    self_test: bool,
) -> Result<()> {
    use rayon::prelude::*;

    let roots: Vec<PathBuf> = inputs
        .iter()
        .map(|input| output_root(input, output, true))
        .collect();
    let mut seen = HashSet::new();
    for (input, root) in inputs.iter().zip(&roots) {
        if !seen.insert(root) {
            bail!(
                "{} would overwrite the output of another input in {}; use --output",
                input.display(),
                root.display()
            );
        }
    }

    let results: Vec<(PathBuf, Result<()>)> = inputs
        .par_iter()
        .zip(roots.par_iter())
        .map(|(input, root)| {
            let result = run_generate(input, root, dry_run, self_test);
            (input.clone(), result)
        })
        .collect();

    let mut failed = 0;
    for (input, result) in &results {
        if let Err(e) = result {
            eprintln!("FAILED {}: {e:#}", input.display());
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} files failed to generate", inputs.len());
    }

    println!("Batch complete: {} configurations generated", inputs.len());
    Ok(())
}
