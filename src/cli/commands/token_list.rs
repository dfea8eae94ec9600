use crate::chain::{Erc20Metadata, StorageContract};
use crate::cli::{commands::wallet_context, display::PanelDisplay, ListRef, TokenListAction, TokenListArgs};
use crate::core::{ClientError, ClientResult, Config};
use crate::editor::{AddOutcome, TokenListEditor};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm};
use log::info;

pub async fn execute(args: TokenListArgs, config: Config) -> ClientResult<()> {
    config.validate()?;
    let storage = StorageContract::from_config(&config)?;

    match args.action {
        TokenListAction::Show { chain_id } => {
            let pb = PanelDisplay::create_progress_bar("Reading token lists...");
            let lists = storage.token_lists().await?;
            pb.finish_and_clear();
            PanelDisplay::display_token_lists(&lists, chain_id.as_deref());
            Ok(())
        }
        TokenListAction::Add {
            list,
            address,
            logo,
            name,
            yes,
        } => {
            let mut editor = open_editor(&config, &storage, &list, name.as_deref()).await?;
            let metadata = Erc20Metadata::from_config(&config)?;

            let pb = PanelDisplay::create_progress_bar("Looking up token...");
            let outcome = editor
                .add_token(&metadata, address.as_str(), logo.as_deref())
                .await;
            pb.finish_and_clear();

            match outcome? {
                AddOutcome::Added(token) => {
                    println!("{} Added {} ({})", "✓".green().bold(), token.name, token.symbol.bold());
                }
                AddOutcome::AlreadyPresent => {
                    println!("{}", "Token is already in the list".yellow());
                    return Ok(());
                }
                AddOutcome::Rejected => {
                    PanelDisplay::display_popups(&editor.take_popups());
                    return Ok(());
                }
            }

            submit(&mut editor, &storage, yes).await
        }
        TokenListAction::Remove { list, address, yes } => {
            let mut editor = open_editor(&config, &storage, &list, None).await?;
            if !editor.remove_token(&address) {
                println!("{}", "Token is not in the list".yellow());
                return Ok(());
            }
            submit(&mut editor, &storage, yes).await
        }
        TokenListAction::Save {
            list,
            name,
            logo,
            new_chain_id,
            new_list_id,
            yes,
        } => {
            let mut editor = open_editor(&config, &storage, &list, name.as_deref()).await?;
            if let Some(name) = name {
                editor.set_name(name);
            }
            if let Some(logo) = logo {
                editor.set_logo(logo);
            }
            if let Some(chain_id) = new_chain_id {
                editor.set_chain_id(chain_id);
            }
            if let Some(list_id) = new_list_id {
                editor.set_list_id(list_id);
            }
            submit(&mut editor, &storage, yes).await
        }
    }
}

/// Opens the stored list, or a fresh one named `name` when none exists yet.
async fn open_editor(
    config: &Config,
    storage: &StorageContract,
    list: &ListRef,
    name: Option<&str>,
) -> ClientResult<TokenListEditor> {
    let pb = PanelDisplay::create_progress_bar("Reading token lists...");
    let lists = storage.token_lists().await?;
    let (chain_id, account) = wallet_context(config).await?;
    pb.finish_and_clear();

    let stored = lists
        .get(&list.chain_id)
        .and_then(|chain_lists| chain_lists.get(&list.list_id));

    let mut editor = match stored {
        Some(stored) => TokenListEditor::open(&list.chain_id, &list.list_id, stored, config.storage_network_id),
        None => {
            let name = name.ok_or(ClientError::MissingField("name"))?;
            info!("Creating token list {}/{}", list.chain_id, list.list_id);
            let mut editor = TokenListEditor::new_list(config.storage_network_id);
            editor.set_chain_id(list.chain_id.clone());
            editor.set_list_id(list.list_id.clone());
            editor.set_name(name);
            editor
        }
    };
    editor.connect(chain_id, account);
    Ok(editor)
}

async fn submit(editor: &mut TokenListEditor, storage: &StorageContract, yes: bool) -> ClientResult<()> {
    if let Some(blocker) = editor.save_blocker() {
        println!("{} {}", "✗".red().bold(), blocker.to_string().red());
        println!("  {}", editor.save_button().to_string().dimmed());
        return Err(blocker);
    }

    PanelDisplay::display_draft(editor.draft());

    let proceed = if yes {
        true
    } else {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{}?", editor.save_button()))
            .default(false)
            .interact()
            .map_err(|e| ClientError::Other(e.to_string()))?
    };

    if !proceed {
        println!("{}", "Save cancelled".yellow());
        return Ok(());
    }

    let pb = PanelDisplay::create_progress_bar("Waiting for the wallet...");
    let result = editor.save(storage).await;
    pb.finish_and_clear();

    match result {
        Ok(hash) => {
            match hash {
                Some(hash) => println!("{} Token list saved in {}", "✓".green().bold(), hash.cyan()),
                None => println!("{} Token list saved", "✓".green().bold()),
            }
            PanelDisplay::display_popups(&editor.take_popups());
            let tracked = editor.transactions().pending().len();
            println!("  {}", format!("{} transaction(s) awaiting confirmation", tracked).dimmed());
            Ok(())
        }
        Err(e) => {
            PanelDisplay::display_popups(&editor.take_popups());
            Err(e)
        }
    }
}
