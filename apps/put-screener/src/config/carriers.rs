//! Carrier email-to-SMS gateway domains.

/// Known carriers and their gateway domains. Keys are lowercase.
const CARRIER_GATEWAYS: &[(&str, &str)] = &[
    ("verizon", "vtext.com"),
    ("att", "txt.att.net"),
    ("at&t", "txt.att.net"),
    ("tmobile", "tmomail.net"),
    ("t-mobile", "tmomail.net"),
    ("sprint", "messaging.sprintpcs.com"),
    ("boost", "myboostmobile.com"),
    ("boost mobile", "myboostmobile.com"),
    ("cricket", "sms.cricketwireless.net"),
    ("cricket wireless", "sms.cricketwireless.net"),
    ("uscellular", "email.uscc.net"),
    ("us cellular", "email.uscc.net"),
    ("metro", "mymetropcs.com"),
    ("metropcs", "mymetropcs.com"),
    ("metro pcs", "mymetropcs.com"),
    // MVNO on the T-Mobile network
    ("mint", "tmomail.net"),
    ("mint mobile", "tmomail.net"),
];

/// Gateway domain for a carrier name, case-insensitive.
#[must_use]
pub fn resolve_gateway(carrier: &str) -> Option<&'static str> {
    let carrier = carrier.trim().to_lowercase();
    CARRIER_GATEWAYS
        .iter()
        .find(|(name, _)| *name == carrier)
        .map(|(_, domain)| *domain)
}

/// Names of all supported carriers.
#[must_use]
pub fn supported_carriers() -> Vec<&'static str> {
    CARRIER_GATEWAYS.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Verizon", Some("vtext.com") ; "capitalized")]
    #[test_case(" t-mobile ", Some("tmomail.net") ; "padded")]
    #[test_case("Mint Mobile", Some("tmomail.net") ; "mvno")]
    #[test_case("AT&T", Some("txt.att.net") ; "ampersand")]
    #[test_case("carrier pigeon", None ; "unknown")]
    fn resolves_carriers(carrier: &str, expected: Option<&str>) {
        assert_eq!(resolve_gateway(carrier), expected);
    }

    #[test]
    fn every_listed_carrier_resolves() {
        for carrier in supported_carriers() {
            assert!(resolve_gateway(carrier).is_some(), "{carrier}");
        }
    }
}
