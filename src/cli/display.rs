use crate::chain::storage::TokenLists;
use crate::core::{DomainConfig, Token};
use crate::editor::{Popup, TokenListDraft};
use crate::gate::{Effect, RenderMode, Route};
use crate::utils::{chain_name, shorten_address};
use colored::*;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal rendering for gate, route and token list output
pub struct PanelDisplay;

impl PanelDisplay {
    pub fn display_render_mode(mode: &RenderMode, title: &str) {
        let mode_str = mode.to_string();
        let colored_mode = match mode {
            RenderMode::Loading => mode_str.yellow(),
            RenderMode::Panel => mode_str.magenta(),
            RenderMode::MainApp => mode_str.green(),
            RenderMode::Greeting => mode_str.cyan(),
            RenderMode::Connection {
                network_eligible: true,
            } => mode_str.blue(),
            RenderMode::Connection {
                network_eligible: false,
            } => mode_str.red(),
        };

        println!("{} {}", style("►").cyan(), style(title).bold());
        println!("  Render mode: {}", colored_mode.bold());
    }

    pub fn display_domain_config(config: Option<&DomainConfig>) {
        let Some(config) = config else {
            println!("  {}", "No data stored for this domain".dimmed());
            return;
        };
        let show = |label: &str, value: Option<String>| {
            println!("  {}: {}", label, value.unwrap_or_else(|| "-".dimmed().to_string()));
        };
        show("Admin", config.admin.as_ref().map(|a| a.to_string()));
        show("Factory", config.factory.as_ref().map(|a| a.to_string()));
        show("Router", config.router.as_ref().map(|a| a.to_string()));
        show("Favicon", config.favicon.clone());
    }

    pub fn display_effects(effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::SetColorScheme(scheme) => {
                    println!("  {} color scheme -> {}", "•".cyan(), scheme)
                }
                Effect::Reload => println!("  {} {}", "•".cyan(), "reload required (favicon changed)".yellow()),
            }
        }
    }

    pub fn display_route(path: &str, route: &Route) {
        let target = match route {
            Route::Redirect { .. } => route.to_string().yellow(),
            _ => route.to_string().green(),
        };
        println!("{} {} {}", style(path).dim(), "→".bold(), target.bold());
    }

    fn display_token(index: usize, token: &Token) {
        println!(
            "   {}. {} ({}) {}",
            index + 1,
            token.name,
            token.symbol.bold(),
            style(shorten_address(&token.address, 4)).dim()
        );
    }

    pub fn display_token_lists(lists: &TokenLists, chain_filter: Option<&str>) {
        println!("\n{}", style("📋 Token Lists").bold().underlined());

        let mut shown = 0;
        for (chain_id, chain_lists) in lists {
            if chain_filter.map_or(false, |filter| filter != chain_id.as_str()) {
                continue;
            }
            let network = chain_id.parse().map(chain_name).unwrap_or("Unknown");
            for (list_id, list) in chain_lists {
                shown += 1;
                let tokens = list.tokens.as_deref().unwrap_or_default();
                println!(
                    "{} {} [{} / {}] v{} {} tokens",
                    style("►").cyan(),
                    list.name.as_deref().unwrap_or("(unnamed)").bold(),
                    network.blue(),
                    list_id,
                    list.version.unwrap_or_default(),
                    tokens.len().to_string().green()
                );
                for (i, token) in tokens.iter().enumerate() {
                    Self::display_token(i, token);
                }
            }
        }

        if shown == 0 {
            println!("{}", "No token lists stored".dimmed());
        }
    }

    pub fn display_draft(draft: &TokenListDraft) {
        println!("\n{}", style("📝 Token list to save").bold().underlined());
        println!("  Chain: {}", draft.chain_id);
        println!("  Id: {}", draft.list_id);
        println!("  Name: {}", draft.name);
        if !draft.logo_uri.is_empty() {
            println!("  Logo: {}", draft.logo_uri);
        }
        if draft.tokens.is_empty() {
            println!("  {}", "No tokens".dimmed());
        }
        for (i, token) in draft.tokens.iter().enumerate() {
            Self::display_token(i, token);
        }
    }

    pub fn display_popups(popups: &[Popup]) {
        for popup in popups {
            if popup.is_error() {
                println!("{} {}", "⚠".red().bold(), popup.content.to_string().red());
            } else {
                println!("{} {}", "ℹ".cyan(), popup.content);
            }
        }
    }

    pub fn create_progress_bar(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }
}
