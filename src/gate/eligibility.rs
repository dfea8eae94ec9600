use crate::core::{is_supported_chain, Address, ChainId, Config};

/// Restrictions imposed by the site hosting the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostRestrictions {
    /// Takes precedence over the on-chain admin when set.
    pub admin: Option<Address>,
    /// Allowed chains. Empty means every supported chain.
    pub network_ids: Vec<ChainId>,
}

impl HostRestrictions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            admin: config.host_admin.clone(),
            network_ids: config.host_network_ids.clone(),
        }
    }
}

/// Whether `account` administers this deployment.
///
/// With neither a host admin nor a non-zero on-chain admin nobody has claimed
/// the deployment yet, so every account counts as admin.
pub fn is_app_admin(
    account: Option<&Address>,
    domain_admin: Option<&Address>,
    host: &HostRestrictions,
) -> bool {
    if let Some(host_admin) = &host.admin {
        return account == Some(host_admin);
    }
    match domain_admin.filter(|admin| !admin.is_zero()) {
        Some(admin) => account == Some(admin),
        None => true,
    }
}

/// Whether the connected chain is usable for this deployment.
pub fn network_eligibility(
    chain_id: ChainId,
    account: Option<&Address>,
    domain_admin: Option<&Address>,
    host: &HostRestrictions,
    storage_network_id: ChainId,
) -> bool {
    if !is_supported_chain(chain_id) {
        return false;
    }

    let admin_on_storage_network =
        chain_id == storage_network_id && is_app_admin(account, domain_admin, host);

    host.network_ids.is_empty() || admin_on_storage_network || host.network_ids.contains(&chain_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{STORAGE_NETWORK_ID, SUPPORTED_CHAIN_ID_LIST};
    use proptest::prelude::*;

    const ADMIN: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18";
    const OTHER: &str = "0x1111111111111111111111111111111111111111";

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn test_unrestricted_supported_chain() {
        let host = HostRestrictions::default();
        assert!(network_eligibility(1, None, None, &host, STORAGE_NETWORK_ID));
    }

    #[test]
    fn test_restricted_chain_outside_list() {
        let host = HostRestrictions {
            admin: None,
            network_ids: vec![137],
        };
        let other = addr(OTHER);
        assert!(!network_eligibility(1, Some(&other), Some(&addr(ADMIN)), &host, STORAGE_NETWORK_ID));
        assert!(network_eligibility(137, Some(&other), Some(&addr(ADMIN)), &host, STORAGE_NETWORK_ID));
    }

    #[test]
    fn test_non_admin_cannot_reach_storage_network_when_restricted() {
        let host = HostRestrictions {
            admin: None,
            network_ids: vec![137],
        };
        let other = addr(OTHER);
        assert!(!network_eligibility(
            STORAGE_NETWORK_ID,
            Some(&other),
            Some(&addr(ADMIN)),
            &host,
            STORAGE_NETWORK_ID
        ));
    }

    #[test]
    fn test_host_admin_overrides_domain_admin() {
        let host = HostRestrictions {
            admin: Some(addr(OTHER)),
            network_ids: vec![137],
        };
        let admin = addr(ADMIN);
        assert!(!is_app_admin(Some(&admin), Some(&admin), &host));
        assert!(is_app_admin(Some(&addr(OTHER)), Some(&admin), &host));
        assert!(!is_app_admin(None, Some(&admin), &host));
    }

    #[test]
    fn test_unclaimed_deployment_everyone_is_admin() {
        let host = HostRestrictions::default();
        let zero = addr(crate::core::ZERO_ADDRESS);
        assert!(is_app_admin(None, None, &host));
        assert!(is_app_admin(Some(&addr(OTHER)), Some(&zero), &host));
    }

    fn any_address() -> impl Strategy<Value = Address> {
        proptest::array::uniform20(any::<u8>()).prop_map(|bytes| Address::from_bytes(&bytes))
    }

    proptest! {
        #[test]
        fn unsupported_chain_is_never_eligible(
            chain_id in any::<u64>().prop_filter("unsupported", |c| !is_supported_chain(*c)),
            account in proptest::option::of(any_address()),
            admin in proptest::option::of(any_address()),
            allowed in proptest::collection::vec(any::<u64>(), 0..4),
        ) {
            let host = HostRestrictions { admin: admin.clone(), network_ids: allowed };
            prop_assert!(!network_eligibility(chain_id, account.as_ref(), admin.as_ref(), &host, STORAGE_NETWORK_ID));
        }

        #[test]
        fn admin_on_storage_network_is_always_eligible(
            admin in any_address(),
            upper in any::<bool>(),
            allowed in proptest::collection::vec(
                proptest::sample::select(SUPPORTED_CHAIN_ID_LIST.to_vec()), 0..4
            ),
        ) {
            let account: Address = if upper {
                format!("0x{}", admin.as_str()[2..].to_ascii_uppercase()).parse().unwrap()
            } else {
                admin.clone()
            };
            let host = HostRestrictions { admin: None, network_ids: allowed };
            prop_assert!(network_eligibility(
                STORAGE_NETWORK_ID,
                Some(&account),
                Some(&admin),
                &host,
                STORAGE_NETWORK_ID
            ));
        }
    }
}
