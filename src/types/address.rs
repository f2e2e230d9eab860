use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::parser;

/// A loosely specified set of mail addresses, as found in a route config or a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AddressSpec {
    /// `address@domain.tld`, `Some Name <address@domain.tld>` or a comma separated list of those.
    Raw(String),
    Pair {
        #[cfg_attr(feature = "serde", serde(default))]
        name: String,
        address: String,
    },
    List(Vec<AddressSpec>),
}

impl Default for AddressSpec {
    fn default() -> Self {
        Self::Raw(String::new())
    }
}

impl From<&str> for AddressSpec {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for AddressSpec {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl<N: Into<String>, A: Into<String>> From<(N, A)> for AddressSpec {
    fn from((name, address): (N, A)) -> Self {
        Self::Pair {
            name: name.into(),
            address: address.into(),
        }
    }
}

impl<T: Into<AddressSpec>> From<Vec<T>> for AddressSpec {
    fn from(list: Vec<T>) -> Self {
        Self::List(list.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for AddressSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressSpec::Raw(raw) => write!(f, "{}", raw),
            AddressSpec::Pair { name, address } => {
                let (name, address) = (name.trim(), address.trim());

                if name.is_empty() {
                    write!(f, "{}", address)
                } else {
                    write!(f, "{} <{}>", name, address)
                }
            }
            AddressSpec::List(list) => {
                let joined: Vec<String> = list.iter().map(|spec| spec.to_string()).collect();

                write!(f, "{}", joined.join(","))
            }
        }
    }
}

impl AddressSpec {
    /// Whether this spec cannot produce a single address.
    pub fn is_blank(&self) -> bool {
        match self {
            AddressSpec::Raw(raw) => raw.trim().is_empty(),
            AddressSpec::Pair { address, .. } => address.trim().is_empty(),
            AddressSpec::List(list) => list.iter().all(AddressSpec::is_blank),
        }
    }

    /// Apply `f` to every string in the spec, keeping its shape.
    pub fn map_strings<F: Fn(&str) -> String>(&self, f: &F) -> Self {
        match self {
            AddressSpec::Raw(raw) => AddressSpec::Raw(f(raw)),
            AddressSpec::Pair { name, address } => AddressSpec::Pair {
                name: f(name),
                address: f(address),
            },
            AddressSpec::List(list) => {
                AddressSpec::List(list.iter().map(|spec| spec.map_strings(f)).collect())
            }
        }
    }

    /// Resolve this spec into a list of addresses, see [`parser::address::parse_addresses`].
    pub fn resolve(&self, single_address: bool) -> Vec<ResolvedAddress> {
        parser::address::parse_addresses(self, single_address)
    }
}

/// A single normalized mail address, its email is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedAddress {
    email: String,
    display_name: String,
}

impl ResolvedAddress {
    /// Returns `None` when the trimmed email is empty.
    pub fn new<E: AsRef<str>, N: AsRef<str>>(email: E, display_name: N) -> Option<Self> {
        let email = email.as_ref().trim();

        if email.is_empty() {
            return None;
        }

        Some(Self {
            email: email.to_string(),
            display_name: display_name.as_ref().trim().to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The display name, if there is one.
    pub fn name(&self) -> Option<&str> {
        if self.display_name.is_empty() {
            None
        } else {
            Some(&self.display_name)
        }
    }

    pub fn full(&self) -> String {
        match self.name() {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.to_string(),
        }
    }
}

impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_forms() {
        let spec: AddressSpec = vec![
            AddressSpec::from(("Jane", " jane@x.com ")),
            AddressSpec::from(("", "bob@x.com")),
            AddressSpec::from("raw@x.com"),
        ]
        .into();

        assert_eq!(spec.to_string(), "Jane <jane@x.com>,bob@x.com,raw@x.com");
    }

    #[test]
    fn blank_specs() {
        assert!(AddressSpec::default().is_blank());
        assert!(AddressSpec::from(("Jane", "  ")).is_blank());
        assert!(AddressSpec::from(vec!["", " "]).is_blank());
        assert!(!AddressSpec::from(vec!["", "a@b.com"]).is_blank());
    }

    #[test]
    fn resolved_address_rejects_empty_email() {
        assert_eq!(ResolvedAddress::new("  ", "Jane"), None);

        let address = ResolvedAddress::new(" jane@x.com ", " Jane ").unwrap();

        assert_eq!(address.email(), "jane@x.com");
        assert_eq!(address.name(), Some("Jane"));
        assert_eq!(address.full(), "Jane <jane@x.com>");
    }

    #[test]
    fn resolved_address_without_name() {
        let address = ResolvedAddress::new("bob@x.com", "   ").unwrap();

        assert_eq!(address.display_name(), "");
        assert_eq!(address.name(), None);
        assert_eq!(address.to_string(), "bob@x.com");
    }

    #[test]
    fn map_strings_keeps_shape() {
        let spec = AddressSpec::List(vec![
            AddressSpec::from("a"),
            AddressSpec::from(("b", "c")),
        ]);

        assert_eq!(
            spec.map_strings(&|value: &str| value.to_uppercase()),
            AddressSpec::List(vec![
                AddressSpec::from("A"),
                AddressSpec::from(("B", "C")),
            ])
        );
    }
}
