use crate::core::{Address, ChainId};

/// `0x742d…bD18` style short form with `chars` digits kept on each side.
pub fn shorten_address(address: &Address, chars: usize) -> String {
    let s = address.as_str();
    let digits = &s[2..];
    if chars * 2 >= digits.len() {
        return s.to_string();
    }
    format!("0x{}...{}", &digits[..chars], &digits[digits.len() - chars..])
}

/// Human name of a chain, for display only.
pub fn chain_name(chain_id: ChainId) -> &'static str {
    match chain_id {
        1 => "Ethereum",
        3 => "Ropsten",
        4 => "Rinkeby",
        5 => "Goerli",
        42 => "Kovan",
        56 => "BSC",
        97 => "BSC Testnet",
        100 => "Gnosis",
        137 => "Polygon",
        250 => "Fantom",
        43114 => "Avalanche",
        80001 => "Mumbai",
        _ => "Unknown",
    }
}
