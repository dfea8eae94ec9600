use std::fmt;

/// Page (or redirect) a trading path resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Swap,
    PoolFinder,
    Pool,
    Pools,
    AddLiquidity {
        currency_a: Option<String>,
        currency_b: Option<String>,
    },
    RemoveLiquidity {
        currency_a: String,
        currency_b: String,
    },
    Redirect {
        to: String,
        open_claim_modal: bool,
    },
}

impl Route {
    fn redirect(to: impl Into<String>) -> Self {
        Route::Redirect {
            to: to.into(),
            open_claim_modal: false,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Swap => write!(f, "Swap"),
            Route::PoolFinder => write!(f, "PoolFinder"),
            Route::Pool => write!(f, "Pool"),
            Route::Pools => write!(f, "Pools"),
            Route::AddLiquidity {
                currency_a,
                currency_b,
            } => write!(
                f,
                "AddLiquidity({}, {})",
                currency_a.as_deref().unwrap_or("-"),
                currency_b.as_deref().unwrap_or("-")
            ),
            Route::RemoveLiquidity {
                currency_a,
                currency_b,
            } => write!(f, "RemoveLiquidity({}, {})", currency_a, currency_b),
            Route::Redirect {
                to,
                open_claim_modal,
            } => {
                write!(f, "Redirect -> {}", to)?;
                if *open_claim_modal {
                    write!(f, " (claim modal)")?;
                }
                Ok(())
            }
        }
    }
}

fn is_hex_address(s: &str) -> bool {
    crate::core::is_valid_address(s) && s.starts_with("0x")
}

/// `0xA-0xB` or `ETH-0xB` style pair from the old add-liquidity links.
fn split_old_add_pair(s: &str) -> Option<(&str, &str)> {
    let (a, b) = s.split_once('-')?;
    let ok = |c: &str| c == "ETH" || is_hex_address(c);
    (ok(a) && ok(b)).then_some((a, b))
}

fn split_old_remove_pair(s: &str) -> Option<(&str, &str)> {
    let (a, b) = s.split_once('-')?;
    (is_hex_address(a) && is_hex_address(b)).then_some((a, b))
}

fn add_liquidity(a: &str) -> Route {
    match split_old_add_pair(a) {
        Some((x, y)) => Route::redirect(format!("/add/{}/{}", x, y)),
        None => Route::AddLiquidity {
            currency_a: Some(a.to_string()),
            currency_b: None,
        },
    }
}

fn add_liquidity_pair(a: &str, b: &str) -> Route {
    if a.eq_ignore_ascii_case(b) {
        return Route::redirect(format!("/add/{}", a));
    }
    Route::AddLiquidity {
        currency_a: Some(a.to_string()),
        currency_b: Some(b.to_string()),
    }
}

/// Resolves a path against the trading route table.
///
/// Single-segment pages and `/remove` match strictly, so a trailing slash
/// falls through to the swap redirect; `/add` and `/create` tolerate one.
pub fn resolve(path: &str) -> Route {
    let path = path.split(['?', '#']).next().unwrap_or_default();

    match path {
        "/swap" => return Route::Swap,
        "/claim" => {
            return Route::Redirect {
                to: "/swap".to_string(),
                open_claim_modal: true,
            }
        }
        "/find" => return Route::PoolFinder,
        "/pool" => return Route::Pool,
        "/pools" => return Route::Pools,
        "/create" => return Route::redirect("/add"),
        _ => {}
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let loose: Vec<&str> = path
        .trim_start_matches('/')
        .trim_end_matches('/')
        .split('/')
        .collect();

    match loose.as_slice() {
        ["add"] | ["create"] => {
            return Route::AddLiquidity {
                currency_a: None,
                currency_b: None,
            }
        }
        ["add" | "create", a] if !a.is_empty() => return add_liquidity(a),
        ["add" | "create", a, b] if !a.is_empty() && !b.is_empty() => {
            return add_liquidity_pair(a, b)
        }
        _ => {}
    }

    match segments.as_slice() {
        ["remove", tokens] if !tokens.is_empty() => match split_old_remove_pair(tokens) {
            Some((a, b)) => Route::redirect(format!("/remove/{}/{}", a, b)),
            None => Route::redirect("/pool"),
        },
        ["remove", a, b] if !a.is_empty() && !b.is_empty() => Route::RemoveLiquidity {
            currency_a: a.to_string(),
            currency_b: b.to_string(),
        },
        _ => Route::redirect("/swap"),
    }
}
