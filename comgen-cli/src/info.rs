use anyhow::{Context, Result};
use comgen_ir::ModuleDecl;
use std::path::Path;

use crate::Format;
use crate::generate::load_config;

pub fn run_info(input: &Path) -> Result<()> {
    let format = crate::detect_format(input).context("input file")?;
    let config = load_config(input)?;
    let compiled =
        comgen_ir::compile(&config).with_context(|| format!("compiling {}", input.display()))?;

    let format_str = match format {
        Format::Json => "JSON",
        Format::Yaml => "YAML",
    };

    println!("File:        {}", input.display());
    println!("Format:      {format_str}");

    let classes: Vec<&str> = config.modules.iter().map(ModuleDecl::class_name).collect();
    println!("Modules:     {} ({})", classes.len(), classes.join(", "));

    let declared = config.sockets().len();
    let total = compiled.network.sockets().len();
    println!("Sockets:     {total} ({declared} declared, {} derived)", total - declared);

    if let Some(someip) = config.someip() {
        println!(
            "SOME/IP:     {} servers, {} clients",
            someip.servers.len(),
            someip.clients.len()
        );
    }

    let routing = &compiled.routing;
    println!("Routes:      {}", routing.paths.len());
    if !routing.paths.is_empty() {
        let modules: Vec<&str> = routing.api_bindings.iter().map(|b| b.module.as_str()).collect();
        println!("Route mods:  {}", modules.join(", "));
        println!(
            "Gateway:     {} ({} buffers)",
            if routing.use_tp_gateway { "yes" } else { "no" },
            routing.buffers.len()
        );
        let ids = &routing.base_ids;
        println!(
            "Base ids:    DCM_TX={} DOIP_RX={} DOIP_TX={} CANTP_RX={} CANTP_TX={}",
            ids.dcm_tx, ids.doip_rx, ids.doip_tx, ids.cantp_rx, ids.cantp_tx
        );
    }

    Ok(())
}
