//! Payment gateway settings.

use std::{fmt, net::IpAddr};

use ipnet::IpNet;

/// Hosted payment page used when none is configured.
pub const DEFAULT_PROCESS_URL: &str = "https://www.payfast.co.za/eng/process";

/// Merchant credentials and notification source policy.
#[derive(Clone)]
pub struct PaymentGatewayConfig {
    pub merchant_id: String,
    pub merchant_key: String,
    pub passphrase: Option<String>,
    pub process_url: String,
    /// Networks notifications may originate from.
    pub allowed_networks: Vec<IpNet>,
    /// When false every source address is accepted.
    pub verify_source: bool,
}

impl PaymentGatewayConfig {
    /// Passphrase to sign with, if a non-empty one is configured.
    #[must_use]
    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase
            .as_deref()
            .filter(|passphrase| !passphrase.is_empty())
    }

    #[must_use]
    pub fn is_trusted_source(&self, source: IpAddr) -> bool {
        !self.verify_source
            || self
                .allowed_networks
                .iter()
                .any(|network| network.contains(&source))
    }
}

impl fmt::Debug for PaymentGatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentGatewayConfig")
            .field("merchant_id", &self.merchant_id)
            .field("merchant_key", &"**redacted**")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "**redacted**"))
            .field("process_url", &self.process_url)
            .field("allowed_networks", &self.allowed_networks)
            .field("verify_source", &self.verify_source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn config(verify_source: bool) -> Result<PaymentGatewayConfig, ipnet::AddrParseError> {
        Ok(PaymentGatewayConfig {
            merchant_id: "10000100".to_string(),
            merchant_key: "46f0cd694581a".to_string(),
            passphrase: Some(String::new()),
            process_url: DEFAULT_PROCESS_URL.to_string(),
            allowed_networks: vec!["197.97.145.144/28".parse()?],
            verify_source,
        })
    }

    #[test]
    fn source_must_fall_inside_an_allowed_network() -> TestResult {
        let config = config(true)?;

        assert!(config.is_trusted_source("197.97.145.150".parse()?));
        assert!(!config.is_trusted_source("197.97.145.160".parse()?));
        assert!(!config.is_trusted_source("::1".parse()?));

        Ok(())
    }

    #[test]
    fn disabled_source_check_trusts_everyone() -> TestResult {
        assert!(config(false)?.is_trusted_source("10.0.0.1".parse()?));

        Ok(())
    }

    #[test]
    fn empty_passphrase_is_absent_and_secrets_are_redacted() -> TestResult {
        let config = config(true)?;

        assert_eq!(config.passphrase(), None);

        let debug = format!("{config:?}");

        assert!(!debug.contains("46f0cd694581a"), "merchant key leaked: {debug}");

        Ok(())
    }
}
