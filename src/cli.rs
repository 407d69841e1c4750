use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::data::loader::{load_store, LoadError, MonsterStore};
use crate::data::validate::{validate_records, ValidationSeverity};
use crate::encounter::{Encounter, Party, MAX_PARTY_LEVEL, MAX_PARTY_SIZE, MIN_PARTY_LEVEL};
use crate::export::to_external_document;
use crate::filter::{apply, FilterState, SortKey};
use crate::render::{render, RenderOptions};
use crate::server;
use crate::server::api::list_items;

const USAGE: &str = "usage: compendium <serve|list|show|export|encounter|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    List,
    Show,
    Export,
    Encounter,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("list") => Some(Command::List),
        Some("show") => Some(Command::Show),
        Some("export") => Some(Command::Export),
        Some("encounter") => Some(Command::Encounter),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = AppConfig::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(&config),
        Some(Command::List) => handle_list(&config, args),
        Some(Command::Show) => handle_show(&config, args),
        Some(Command::Export) => handle_export(&config, args),
        Some(Command::Encounter) => handle_encounter(&config, args),
        Some(Command::Validate) => handle_validate(&config, args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn runtime() -> io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build()
}

/// Blocking load for the one-shot commands.
fn load_blocking(data_dir: &Path) -> Result<Arc<MonsterStore>, i32> {
    let rt = runtime().map_err(|err| {
        eprintln!("failed to start runtime: {err}");
        1
    })?;
    rt.block_on(load_store(data_dir)).map_err(report_load_error)
}

fn report_load_error(err: LoadError) -> i32 {
    eprintln!("load failed: {err}");
    1
}

fn handle_serve(config: &AppConfig) -> i32 {
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            return 1;
        }
    };

    rt.block_on(async {
        let store = match load_store(&config.data_dir).await {
            Ok(store) => store,
            Err(err) => return report_load_error(err),
        };
        tracing::info!(
            monsters = store.len(),
            data_dir = %config.data_dir.display(),
            "dataset loaded"
        );
        match server::run_server(config, store).await {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("server error: {err}");
                1
            }
        }
    })
}

/// `list [--search TEXT] [--species S] [--cr TOKEN] [--sort KEY] [--csv]`
fn handle_list(config: &AppConfig, args: &[String]) -> i32 {
    let mut filter = FilterState::default();
    let mut as_csv = false;
    let mut rest = args.iter().skip(2);
    while let Some(flag) = rest.next() {
        if flag == "--csv" {
            as_csv = true;
            continue;
        }
        let Some(value) = rest.next() else {
            eprintln!(
                "usage: compendium list [--search TEXT] [--species S] [--cr TOKEN] [--sort KEY] [--csv]"
            );
            return 2;
        };
        match flag.as_str() {
            "--search" => filter.search_text = value.clone(),
            "--species" => filter.species = value.clone(),
            "--cr" => filter.challenge_rating = value.clone(),
            "--sort" => filter.sort_key = SortKey::parse(value),
            other => {
                eprintln!("unknown list option '{other}'");
                return 2;
            }
        }
    }

    let store = match load_blocking(&config.data_dir) {
        Ok(store) => store,
        Err(code) => return code,
    };
    let items = list_items(apply(store.monsters(), &filter));

    if as_csv {
        return match write_list_csv(&items) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("failed to write csv: {err}");
                1
            }
        };
    }

    match serde_json::to_string_pretty(&items) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize monster list: {err}");
            1
        }
    }
}

fn write_list_csv(items: &[server::api::MonsterListItem]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record([
        "name_jp",
        "name_en",
        "species",
        "challenge_rating",
        "xp",
        "armor_class",
    ])?;
    for item in items {
        writer.write_record([
            item.name_jp.as_str(),
            item.name_en.as_deref().unwrap_or(""),
            item.species.as_deref().unwrap_or(""),
            item.challenge_rating.as_deref().unwrap_or(""),
            item.xp.to_string().as_str(),
            item.armor_class.to_string().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn handle_show(config: &AppConfig, args: &[String]) -> i32 {
    let Some(name) = args.get(2) else {
        eprintln!("usage: compendium show <name_jp>");
        return 2;
    };
    let store = match load_blocking(&config.data_dir) {
        Ok(store) => store,
        Err(code) => return code,
    };
    let Some(monster) = store.find(name) else {
        eprintln!("monster not found: {name}");
        return 1;
    };

    let block = match render(monster, RenderOptions { single_view: true }) {
        Ok(block) => block,
        Err(err) => {
            eprintln!("render failed: {err}");
            return 1;
        }
    };
    match serde_json::to_string_pretty(&block) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize stat block: {err}");
            1
        }
    }
}

fn handle_export(config: &AppConfig, args: &[String]) -> i32 {
    let Some(name) = args.get(2) else {
        eprintln!("usage: compendium export <name_jp>");
        return 2;
    };
    let store = match load_blocking(&config.data_dir) {
        Ok(store) => store,
        Err(code) => return code,
    };
    let Some(monster) = store.find(name) else {
        eprintln!("monster not found: {name}");
        return 1;
    };

    let document = match to_external_document(monster, &config.export_context()) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("export failed: {err}");
            return 1;
        }
    };
    match serde_json::to_string_pretty(&document) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize export: {err}");
            1
        }
    }
}

/// `encounter <party_level> <party_size> <name_jp>...`
fn handle_encounter(config: &AppConfig, args: &[String]) -> i32 {
    let level = args.get(2).and_then(|raw| raw.parse::<u32>().ok());
    let size = args.get(3).and_then(|raw| raw.parse::<u32>().ok());
    let (Some(level), Some(size)) = (level, size) else {
        eprintln!("usage: compendium encounter <party_level> <party_size> <name_jp>...");
        return 2;
    };
    if !(MIN_PARTY_LEVEL..=MAX_PARTY_LEVEL).contains(&level) {
        eprintln!("party level must be {MIN_PARTY_LEVEL}..={MAX_PARTY_LEVEL}");
        return 2;
    }
    if !(1..=MAX_PARTY_SIZE).contains(&size) {
        eprintln!("party size must be 1..={MAX_PARTY_SIZE}");
        return 2;
    }

    let store = match load_blocking(&config.data_dir) {
        Ok(store) => store,
        Err(code) => return code,
    };
    let mut encounter = Encounter::new();
    for name in &args[4..] {
        encounter.add(name.as_str());
    }
    let summary = encounter.summary(&store, Party { size, level });
    for name in &summary.unknown {
        eprintln!("unknown monster '{name}' adds no experience");
    }
    eprintln!(
        "difficulty: {} (adjusted {} XP)",
        summary.difficulty.label_jp(),
        summary.adjusted_xp
    );

    match serde_json::to_string_pretty(&summary) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize encounter summary: {err}");
            1
        }
    }
}

fn handle_validate(config: &AppConfig, args: &[String]) -> i32 {
    let data_dir = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_dir.clone());
    let store = match load_blocking(&data_dir) {
        Ok(store) => store,
        Err(code) => return code,
    };

    let report = validate_records(store.monsters());
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
    let errors = report.count(ValidationSeverity::Error);
    let warnings = report.count(ValidationSeverity::Warning);
    if report.has_errors() {
        eprintln!("validation failed: {errors} error(s), {warnings} warning(s)");
        return 1;
    }
    println!(
        "validation passed: {} ({} monsters, {warnings} warning(s))",
        data_dir.display(),
        store.len()
    );
    0
}
