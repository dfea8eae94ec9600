use crate::chain::StorageContract;
use crate::cli::{commands::wallet_context, display::PanelDisplay, GateArgs};
use crate::core::{ClientResult, Config, FileStore};
use crate::gate::ReadinessGate;
use colored::*;
use log::info;
use std::sync::Arc;

pub async fn execute(args: GateArgs, config: Config) -> ClientResult<()> {
    println!("{}", "🚦 DEX client readiness".bold().cyan());
    config.validate()?;

    let storage = StorageContract::from_config(&config)?;
    let local = Arc::new(FileStore::new(config.state_file.clone()));
    let mut gate = ReadinessGate::from_config(&config, local);

    let (wallet_chain, wallet_account) = match (args.chain_id, &args.account) {
        (Some(chain_id), Some(account)) => (Some(chain_id), Some(account.clone())),
        _ => wallet_context(&config).await?,
    };
    let chain_id = args.chain_id.or(wallet_chain);
    let account = args.account.or(wallet_account);

    info!("Evaluating gate for chain {:?} account {:?}", chain_id, account);

    gate.set_active(!args.inactive && chain_id.is_some());
    gate.set_chain(chain_id);
    gate.set_account(account);
    gate.set_app_management(args.manage);
    if args.skip_greeting {
        gate.dismiss_greeting();
    }

    let mut effects: Vec<_> = gate.set_dark_mode(args.dark).into_iter().collect();

    let pb = PanelDisplay::create_progress_bar("Fetching domain data...");
    effects.extend(gate.refresh(&storage).await);
    pb.finish_and_clear();

    PanelDisplay::display_render_mode(&gate.render_mode(), gate.title(storage.key()));
    PanelDisplay::display_domain_config(gate.domain_config());
    println!(
        "  Network eligible: {}",
        if gate.network_eligible() {
            "yes".green()
        } else {
            "no".red()
        }
    );
    PanelDisplay::display_effects(&effects);

    Ok(())
}
