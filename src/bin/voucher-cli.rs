//! # voucher-cli.rs
//!
//! Ein Kommandozeilen-Tool zum Verwalten einer Gutschein-Registry, deren
//! gesamter Zustand (Registry, In-Memory-Ledger, Zugriffskontrolle) als
//! JSON-Datei geführt wird.
//!
//! ## Befehle:
//! - `init`: Legt eine neue Zustandsdatei mit dem gegebenen Administrator an.
//! - `create-voucher`: Erstellt eine neue Gutschein-Klasse.
//! - `mint` / `batch-mint`: Prägt Einheiten in den Bestand eines Kontos.
//! - `redeem`: Löst Einheiten aus dem Bestand des Aufrufers ein.
//! - `set-active`: Schaltet die Einlösbarkeit einer Klasse um.
//! - `pause` / `resume`: Setzt bzw. löst den prozessweiten Pause-Schalter.
//! - `show` / `list` / `balance`: Lesende Abfragen.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use gastro_voucher_lib::{
    InMemoryLedger, NewVoucherClassData, StaticAccessControl, SystemClock, VoucherId,
    VoucherRegistry,
};

/// Das Haupt-Struct für das CLI-Tool, das von `clap` geparst wird.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pfad zur JSON-Zustandsdatei.
    #[arg(short, long, default_value = "voucher-registry.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Definiert die verfügbaren Unterbefehle.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Legt eine neue, leere Zustandsdatei an.
    Init {
        /// Die Identität des administrativen Akteurs.
        #[arg(long)]
        admin: String,
    },

    /// Erstellt eine neue Gutschein-Klasse (nur Administrator).
    CreateVoucher {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        id: VoucherId,
        #[arg(long)]
        dish_name: String,
        #[arg(long)]
        price: u64,
        #[arg(long)]
        max_supply: u64,
        /// Beginn des Verkaufsfensters (RFC 3339, z.B. 2026-03-01T12:00:00Z).
        #[arg(long)]
        sale_start: String,
        /// Ende des Verkaufsfensters (RFC 3339).
        #[arg(long)]
        sale_end: String,
        /// Einlösefrist (RFC 3339).
        #[arg(long)]
        use_by: String,
        #[arg(long)]
        metadata_uri: String,
    },

    /// Prägt Einheiten einer Klasse in den Bestand eines Kontos.
    Mint {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        id: VoucherId,
        #[arg(long)]
        recipient: String,
        #[arg(long)]
        amount: u64,
    },

    /// Prägt mehrere Klassen in einem atomaren Vorgang.
    BatchMint {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        recipient: String,
        /// Kennungen, komma-separiert (z.B. 1,2,3).
        #[arg(long, value_delimiter = ',')]
        ids: Vec<VoucherId>,
        /// Mengen, komma-separiert, gleiche Länge wie `ids`.
        #[arg(long, value_delimiter = ',')]
        amounts: Vec<u64>,
    },

    /// Löst Einheiten aus dem Bestand des Aufrufers ein.
    Redeem {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        id: VoucherId,
        #[arg(long)]
        amount: u64,
    },

    /// Schaltet die Einlösbarkeit einer Klasse um (nur Eigentümer).
    SetActive {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        id: VoucherId,
        #[arg(long)]
        active: bool,
    },

    /// Setzt den prozessweiten Pause-Schalter.
    Pause,

    /// Löst den prozessweiten Pause-Schalter.
    Resume,

    /// Zeigt den vollständigen Zustand einer Klasse.
    Show {
        #[arg(long)]
        id: VoucherId,
    },

    /// Listet die Kennungen eines Restaurants, optional paginiert.
    List {
        #[arg(long)]
        restaurant: String,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },

    /// Zeigt den Saldo eines Kontos für eine Klasse.
    Balance {
        #[arg(long)]
        account: String,
        #[arg(long)]
        id: VoucherId,
    },
}

/// Der gesamte von der CLI verwaltete Zustand.
#[derive(Debug, Serialize, Deserialize)]
struct CliState {
    registry: VoucherRegistry,
    ledger: InMemoryLedger,
    access: StaticAccessControl,
}

fn load_state(path: &Path) -> Result<CliState> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Konnte Zustandsdatei {} nicht lesen", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Zustandsdatei {} ist keine gültige Registry", path.display()))
}

fn save_state(path: &Path, state: &CliState) -> Result<()> {
    let contents = serde_json::to_string_pretty(state)?;
    fs::write(path, contents)
        .with_context(|| format!("Konnte Zustandsdatei {} nicht schreiben", path.display()))
}

fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("'{}' ist kein gültiger RFC-3339-Zeitstempel", value))?;
    Ok(parsed.with_timezone(&Utc))
}

/// Hauptfunktion des Programms.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let clock = SystemClock;

    match cli.command {
        Commands::Init { admin } => {
            if cli.state.exists() {
                bail!("Zustandsdatei {} existiert bereits", cli.state.display());
            }
            let state = CliState {
                registry: VoucherRegistry::new(),
                ledger: InMemoryLedger::new(),
                access: StaticAccessControl::new(&admin),
            };
            save_state(&cli.state, &state)?;
            println!("✅ Neue Registry angelegt (Administrator: {})", admin);
        }

        Commands::CreateVoucher {
            caller,
            id,
            dish_name,
            price,
            max_supply,
            sale_start,
            sale_end,
            use_by,
            metadata_uri,
        } => {
            let mut state = load_state(&cli.state)?;
            let data = NewVoucherClassData {
                voucher_id: id,
                dish_name,
                price,
                max_supply,
                sale_start: parse_rfc3339(&sale_start)?,
                sale_end: parse_rfc3339(&sale_end)?,
                use_by: parse_rfc3339(&use_by)?,
                metadata_uri,
            };
            state
                .registry
                .create_voucher_class(&state.access, &caller, data)?;
            save_state(&cli.state, &state)?;
            println!("✅ Gutschein-Klasse {} erstellt", id);
        }

        Commands::Mint {
            caller,
            id,
            recipient,
            amount,
        } => {
            let mut state = load_state(&cli.state)?;
            let CliState {
                registry,
                ledger,
                access,
            } = &mut state;
            registry.mint_units(&*access, ledger, &clock, &caller, id, &recipient, amount)?;
            save_state(&cli.state, &state)?;
            println!("✅ {} Einheiten der Klasse {} an '{}' geprägt", amount, id, recipient);
        }

        Commands::BatchMint {
            caller,
            recipient,
            ids,
            amounts,
        } => {
            let mut state = load_state(&cli.state)?;
            let CliState {
                registry,
                ledger,
                access,
            } = &mut state;
            registry.batch_mint_units(&*access, ledger, &clock, &caller, &recipient, &ids, &amounts)?;
            save_state(&cli.state, &state)?;
            println!("✅ Batch mit {} Einträgen an '{}' geprägt", ids.len(), recipient);
        }

        Commands::Redeem { caller, id, amount } => {
            let mut state = load_state(&cli.state)?;
            state
                .registry
                .redeem_units(&mut state.ledger, &clock, &caller, id, amount)?;
            save_state(&cli.state, &state)?;
            println!("✅ {} Einheiten der Klasse {} eingelöst", amount, id);
        }

        Commands::SetActive { caller, id, active } => {
            let mut state = load_state(&cli.state)?;
            state.registry.set_active(&caller, id, active)?;
            save_state(&cli.state, &state)?;
            println!("✅ Klasse {} ist jetzt {}", id, if active { "aktiv" } else { "inaktiv" });
        }

        Commands::Pause => {
            let mut state = load_state(&cli.state)?;
            state.access.set_paused(true);
            save_state(&cli.state, &state)?;
            println!("⏸️  Registry pausiert");
        }

        Commands::Resume => {
            let mut state = load_state(&cli.state)?;
            state.access.set_paused(false);
            save_state(&cli.state, &state)?;
            println!("▶️  Registry fortgesetzt");
        }

        Commands::Show { id } => {
            let state = load_state(&cli.state)?;
            match state.registry.voucher_class(id) {
                Some(class) => println!("{}", serde_json::to_string_pretty(class)?),
                None => bail!("Gutschein-Klasse {} existiert nicht", id),
            }
        }

        Commands::List {
            restaurant,
            offset,
            limit,
        } => {
            let state = load_state(&cli.state)?;
            let ids = state
                .registry
                .restaurant_vouchers_paginated(&restaurant, offset, limit);
            println!("{}", serde_json::to_string(&ids)?);
        }

        Commands::Balance { account, id } => {
            use gastro_voucher_lib::BalanceLedger;
            let state = load_state(&cli.state)?;
            println!("{}", state.ledger.balance_of(&account, id));
        }
    }

    Ok(())
}
