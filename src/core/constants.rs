use std::collections::HashSet;

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

// Network holding the storage contract
pub const STORAGE_NETWORK_ID: u64 = 56;

// Chains the client can trade on
pub const SUPPORTED_CHAIN_ID_LIST: [u64; 12] = [
    1,     // Ethereum
    3,     // Ropsten
    4,     // Rinkeby
    5,     // Goerli
    42,    // Kovan
    56,    // BSC
    97,    // BSC testnet
    100,   // Gnosis
    137,   // Polygon
    250,   // Fantom
    43114, // Avalanche
    80001, // Mumbai
];

lazy_static::lazy_static! {
    pub static ref SUPPORTED_CHAIN_IDS: HashSet<u64> = SUPPORTED_CHAIN_ID_LIST.iter().copied().collect();
}

// Storage contract function selectors
pub const GET_DATA_SELECTOR: [u8; 4] = [0xae, 0x55, 0xc8, 0x88]; // getData(string)
pub const SET_KEY_DATA_SELECTOR: [u8; 4] = [0xf1, 0x48, 0x05, 0xc3]; // setKeyData(string,(address,string))

// ERC-20 metadata selectors
pub const ERC20_NAME_SELECTOR: [u8; 4] = [0x06, 0xfd, 0xde, 0x03];
pub const ERC20_SYMBOL_SELECTOR: [u8; 4] = [0x95, 0xd8, 0x9b, 0x41];
pub const ERC20_DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

// Local state
pub const FAVICON_STORAGE_KEY: &str = "faviconUrl";
pub const DEFAULT_STATE_FILE: &str = ".dex-panel-state.json";

// Cache TTL in seconds
pub const TOKEN_INFO_CACHE_TTL: u64 = 3600;
pub const TOKEN_INFO_CACHE_SIZE: usize = 1000;

// RPC Configuration
pub const DEFAULT_RPC_TIMEOUT: u64 = 30;
pub const DEFAULT_RPC_URL: &str = "https://bsc-dataseed.binance.org";

// Popup keys
pub const WRONG_TOKEN_ADDRESS_POPUP: &str = "wrongTokenAddressInAdminTokenList";
pub const WRONG_TOKEN_ADDRESS_MESSAGE: &str =
    "Seems it is not a token or an address from a different network. Double check it";

pub fn is_supported_chain(chain_id: u64) -> bool {
    SUPPORTED_CHAIN_IDS.contains(&chain_id)
}
