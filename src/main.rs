// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use cashbook::{cli, commands, config::Config, db, store::users, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    let cfg = Config::from_matches(&matches)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let conn = db::open_or_init(&cfg.db_path)?;
    if !matches!(matches.subcommand_name(), Some("init") | Some("user")) {
        users::get(&conn, cfg.owner_id)?;
    }

    match matches.subcommand() {
        Some(("init", sub)) => {
            if let Some(ccy) = sub.get_one::<String>("currency") {
                utils::set_setting(&conn, "default_currency", &ccy.trim().to_uppercase())?;
            }
            println!(
                "Database initialized at {} (default currency {})",
                cfg.db_path.display(),
                utils::get_default_currency(&conn)?
            );
        }
        Some(("user", sub)) => commands::users::handle(&conn, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&conn, &cfg, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, &cfg, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, &cfg, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &cfg, sub)?,
        Some(("maintenance", sub)) => commands::maintenance::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
