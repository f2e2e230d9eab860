use crate::types::{AddressSpec, ResolvedAddress};

/// Normalize an address spec into a list of addresses.
///
/// When `single_address` is set the whole spec is treated as one address, a list is
/// joined back together instead of being split. Otherwise comma separated strings are
/// split and nested lists are flattened. Blank entries are dropped, order is kept and
/// duplicates are not removed.
///
/// Each entry of the form `Some Name <address@domain.tld>` is split into its name and
/// address, anything else is taken as the address as a whole.
pub fn parse_addresses(spec: &AddressSpec, single_address: bool) -> Vec<ResolvedAddress> {
    let mut addresses = Vec::new();

    if single_address {
        match spec {
            AddressSpec::Pair { name, address } => {
                addresses.extend(ResolvedAddress::new(address, name));
            }
            other => addresses.extend(parse_address(&other.to_string())),
        }
    } else {
        flatten(spec, &mut addresses);
    }

    addresses
}

fn flatten(spec: &AddressSpec, addresses: &mut Vec<ResolvedAddress>) {
    match spec {
        AddressSpec::Raw(raw) => {
            for entry in raw.split(',') {
                addresses.extend(parse_address(entry));
            }
        }
        AddressSpec::Pair { name, address } => {
            addresses.extend(ResolvedAddress::new(address, name));
        }
        AddressSpec::List(list) => {
            for spec in list {
                flatten(spec, addresses);
            }
        }
    }
}

/// Parse a single address entry, `None` if it is blank.
pub fn parse_address(entry: &str) -> Option<ResolvedAddress> {
    let entry = entry.trim();

    match split_display_name(entry) {
        Some((name, email)) => ResolvedAddress::new(email, name),
        None => ResolvedAddress::new(entry, ""),
    }
}

/// Split `Name <email>` at the first `<` and the first `>` after it.
///
/// The `>` has to close the entry and the brackets may not be empty. A `<` inside the
/// name is taken as the opening bracket, so `Jo<e <j@x.com>` yields the name `Jo`.
fn split_display_name(entry: &str) -> Option<(&str, &str)> {
    let open = entry.find('<')?;

    let rest = &entry[open + 1..];

    let close = rest.find('>')?;

    if close == 0 || close + 1 != rest.len() {
        return None;
    }

    Some((&entry[..open], &rest[..close]))
}
