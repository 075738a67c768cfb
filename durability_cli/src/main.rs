//! durability_cli - Host simulator for durability_core
//!
//! Loads a catalog and saved settings, starts the engine, prints the scaled
//! catalog and optionally quotes a repair for one item.

use clap::Parser;
use durability_core::config::{ConfigError, MemoryStore, SettingsStore, TomlStore};
use durability_core::item::{Catalog, ItemDefinition, ItemState};
use durability_core::repair::vanilla_repair;
use durability_core::runtime::{DurabilityMod, HostDependencies, StartupError};
use durability_core::types::ItemId;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Host price per point of healed durability, relative to item value
const HOST_PRICE_PER_POINT: f64 = 0.5;

#[derive(Debug, Parser)]
#[command(name = "durability_cli", version)]
#[command(about = "Simulate a host game driving the durability engine")]
struct Args {
    /// Item catalog (JSON)
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog.json"))]
    catalog: PathBuf,

    /// Saved settings (TOML). Defaults apply when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Override the durability multiplier after startup
    #[arg(long)]
    multiplier: Option<f64>,

    /// Catalog id of the item to quote a repair for
    #[arg(long)]
    quote: Option<u32>,

    /// Current durability of the quoted item
    #[arg(long, requires = "quote")]
    durability: Option<f64>,

    /// Eroded ceiling fraction of the quoted item
    #[arg(long, default_value_t = 0.0, requires = "quote")]
    loss: f64,

    /// Ceiling erosion per healed durability point of a plain host repair
    #[arg(long)]
    loss_rate: Option<f64>,

    /// Turn the panel's restore toggle off
    #[arg(long)]
    no_restore_toggle: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("no catalog entry with id {0}")]
    UnknownItem(ItemId),
    #[error("item {0} does not use durability")]
    NoDurability(ItemId),
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let catalog = Catalog::load_json(&args.catalog)?.into_shared();
    let store: Box<dyn SettingsStore> = match &args.settings {
        Some(path) => Box::new(TomlStore::load(path)?),
        None => Box::new(MemoryStore::new()),
    };

    let deps = HostDependencies {
        catalog: Some(catalog),
        store: Some(store),
        localizer: None,
    };
    let mut engine = DurabilityMod::start(deps)?;

    for rejected in &engine.load_report().rejected {
        println!("ignored saved setting: {}", rejected);
    }

    if let Some(multiplier) = args.multiplier {
        engine.config_mut().set_multiplier(multiplier)?;
    }
    if let Some(rate) = args.loss_rate {
        engine.config_mut().set_vanilla_repair_loss_rate(rate)?;
    }
    if args.no_restore_toggle {
        engine.set_restore_toggle(false);
    }

    print_catalog(&engine);

    if let Some(id) = args.quote {
        quote(&mut engine, ItemId(id), args.durability, args.loss)?;
    }
    Ok(())
}

fn print_catalog(engine: &DurabilityMod) {
    let settings = engine.config().settings();
    println!(
        "multiplier {:.1} | whitelist [{}] | no loss {} | restore {} (cost x{:.1})",
        settings.multiplier,
        settings.whitelist,
        settings.no_max_durability_loss,
        settings.restore_max_durability,
        settings.restore_cost_multiplier,
    );
    println!("{:<8} {:<24} {:>10} {:>10} {:>10}", "id", "name", "base", "max", "default");

    let catalog = engine.catalog().borrow();
    for entry in catalog.iter() {
        match &entry.constants {
            Some(c) if entry.uses_durability => println!(
                "{:<8} {:<24} {:>10.1} {:>10.1} {:>10.1}",
                entry.id.to_string(),
                entry.name,
                c.base_max_or_current(),
                c.max_durability,
                c.default_durability
            ),
            _ => println!("{:<8} {:<24} {:>10}", entry.id.to_string(), entry.name, "-"),
        }
    }
}

fn quote(
    engine: &mut DurabilityMod,
    id: ItemId,
    durability: Option<f64>,
    loss: f64,
) -> Result<(), CliError> {
    let item = {
        let catalog = engine.catalog().borrow();
        let entry = catalog.get(id).ok_or(CliError::UnknownItem(id))?;
        spawn_damaged(entry, durability, loss).ok_or(CliError::NoDurability(id))?
    };

    // Host base price: value-weighted cost of the missing durability
    let base_price = (item.missing_durability() / item.max_durability
        * item.value as f64
        * HOST_PRICE_PER_POINT)
        .ceil() as u32;
    let price = engine.repair_price(&item, base_price);
    let rendered = engine.refresh_view(&item, price);

    println!();
    println!(
        "{} {}: durability {:.1} / {:.1} (loss {:.3})",
        id,
        item.name,
        item.durability,
        item.effective_ceiling(),
        item.durability_loss
    );
    println!("  can repair: {}", engine.can_repair(&item));
    if rendered {
        println!("  price:      {}", engine.view().price_text());
        if let Some(text) = engine.view().durability_text() {
            println!("  preview:    {}", text);
        }
    } else {
        println!("  price:      {} (breakdown unavailable)", price);
    }

    let mut repaired = item;
    let guard = engine.before_repair(&repaired);
    vanilla_repair(&mut repaired, engine.config().vanilla_repair_loss_rate());
    let outcome = engine.after_repair(&mut repaired, guard);
    println!(
        "  after:      {:.1} / {:.1} (loss {:.3}, {:?})",
        repaired.durability,
        repaired.effective_ceiling(),
        repaired.durability_loss,
        outcome
    );
    Ok(())
}

fn spawn_damaged(
    entry: &ItemDefinition,
    durability: Option<f64>,
    loss: f64,
) -> Option<ItemState> {
    entry.max_durability()?;
    let item = entry.spawn().with_loss(loss);
    let current = durability.unwrap_or_else(|| item.effective_ceiling());
    Some(item.with_durability(current))
}
