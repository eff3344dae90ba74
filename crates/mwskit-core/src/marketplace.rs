use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ConfigError;

/// Marketplace that requires UTF-8 feed bodies; all others use ISO-8859-16.
const UTF8_FEED_MARKETPLACES: [&str; 1] = ["A1VC38T7YXB528"];

/// Marketplace identifier → regional endpoint host.
static MARKETPLACE_HOSTS: [(&str, &str); 19] = [
    ("A2EUQ1WTGCTBG2", "mws.amazonservices.ca"),
    ("ATVPDKIKX0DER", "mws.amazonservices.com"),
    ("A1AM78C64UM0Y8", "mws.amazonservices.com.mx"),
    ("A1PA6795UKMFR9", "mws-eu.amazonservices.com"),
    ("A1RKKUPIHCS9HS", "mws-eu.amazonservices.com"),
    ("A13V1IB3VIYZZH", "mws-eu.amazonservices.com"),
    ("A21TJRUUN4KGV", "mws.amazonservices.in"),
    ("APJ6JRA9NG5V4", "mws-eu.amazonservices.com"),
    ("A1F83G8C2ARO7P", "mws-eu.amazonservices.com"),
    ("A1VC38T7YXB528", "mws.amazonservices.jp"),
    ("A39IBJ37TRP1C6", "mws.amazonservices.com.au"),
    ("A2Q3Y263D00KWC", "mws.amazonservices.com"),
    ("A1805IZSGTT6HS", "mws-eu.amazonservices.com"),
    ("ARBP9OOSHTCHU", "mws-eu.amazonservices.com"),
    ("A17E79C6D8DWNP", "mws.amazonservices.com"),
    ("A33AVAJ2PDY3EV", "mws.amazonservices.com"),
    ("A19VAU5U5O7RUS", "mws-fe.amazonservices.com"),
    ("A2VIGQ35RCS4UG", "mws.amazonservices.ae"),
    ("A2NODRKZP88ZB9", "mws-eu.amazonservices.com"),
];

/// A marketplace id known to the regional routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarketplaceId {
    id: &'static str,
    host: &'static str,
}

impl MarketplaceId {
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        MARKETPLACE_HOSTS
            .iter()
            .find(|entry| entry.0 == trimmed)
            .map(|&(id, host)| Self { id, host })
            .ok_or_else(|| ConfigError::UnknownMarketplace {
                value: trimmed.to_owned(),
            })
    }

    /// Every marketplace in the routing table, in table order.
    pub fn all() -> impl Iterator<Item = Self> {
        MARKETPLACE_HOSTS
            .iter()
            .map(|&(id, host)| Self { id, host })
    }

    pub const fn as_str(self) -> &'static str {
        self.id
    }

    /// Host used both for routing and in the string to sign.
    pub const fn host(self) -> &'static str {
        self.host
    }

    pub fn base_url(self) -> String {
        format!("https://{}", self.host)
    }

    /// `Content-Type` declared on feed uploads for this marketplace.
    pub fn feed_content_type(self) -> &'static str {
        if UTF8_FEED_MARKETPLACES.contains(&self.id) {
            "text/xml; charset=UTF-8"
        } else {
            "text/xml; charset=iso-8859-16"
        }
    }
}

impl Display for MarketplaceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id)
    }
}

impl FromStr for MarketplaceId {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for MarketplaceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_regional_host() {
        let uk = MarketplaceId::parse("A1F83G8C2ARO7P").expect("known marketplace");
        assert_eq!(uk.host(), "mws-eu.amazonservices.com");
        assert_eq!(uk.base_url(), "https://mws-eu.amazonservices.com");
    }

    #[test]
    fn rejects_unknown_marketplace() {
        let err = MarketplaceId::parse("NOT-A-MARKETPLACE").expect_err("must fail");
        assert_eq!(
            err,
            ConfigError::UnknownMarketplace {
                value: String::from("NOT-A-MARKETPLACE")
            }
        );
    }

    #[test]
    fn only_japan_declares_utf8_feeds() {
        let jp = MarketplaceId::parse("A1VC38T7YXB528").expect("known marketplace");
        let us = MarketplaceId::parse("ATVPDKIKX0DER").expect("known marketplace");

        assert_eq!(jp.feed_content_type(), "text/xml; charset=UTF-8");
        assert_eq!(us.feed_content_type(), "text/xml; charset=iso-8859-16");
    }

    #[test]
    fn all_lists_every_routing_entry() {
        assert_eq!(MarketplaceId::all().count(), 19);
    }
}
