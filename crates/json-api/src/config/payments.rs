//! Payment Gateway Config

use clap::Args;
use ipnet::IpNet;

use gennessence_app::domain::payments::{PaymentGatewayConfig, config::DEFAULT_PROCESS_URL};

/// Networks the gateway sends notifications from.
const DEFAULT_ALLOWED_NETWORKS: &str =
    "197.97.145.144/28,41.74.179.192/27,102.216.36.0/28,102.216.36.128/28,144.126.193.139/32";

/// Payment gateway settings.
#[derive(Args)]
pub struct PaymentGatewayArgs {
    /// Merchant identifier issued by the gateway
    #[arg(long, env = "PAYFAST_MERCHANT_ID")]
    pub payfast_merchant_id: String,

    /// Merchant key issued by the gateway
    #[arg(long, env = "PAYFAST_MERCHANT_KEY", hide_env_values = true)]
    pub payfast_merchant_key: String,

    /// Salt passphrase appended to signatures
    #[arg(long, env = "PAYFAST_PASSPHRASE", hide_env_values = true)]
    pub payfast_passphrase: Option<String>,

    /// Hosted payment page
    #[arg(long, env = "PAYFAST_PROCESS_URL", default_value = DEFAULT_PROCESS_URL)]
    pub payfast_process_url: String,

    /// Networks notifications are accepted from
    #[arg(
        long,
        env = "PAYFAST_ALLOWED_NETWORKS",
        value_delimiter = ',',
        default_value = DEFAULT_ALLOWED_NETWORKS
    )]
    pub payfast_allowed_networks: Vec<IpNet>,

    /// Reject notifications from outside the allowed networks
    #[arg(long, env = "PAYFAST_VERIFY_SOURCE", default_value_t = true)]
    pub payfast_verify_source: bool,
}

impl PaymentGatewayArgs {
    pub(crate) fn gateway_config(&self) -> PaymentGatewayConfig {
        PaymentGatewayConfig {
            merchant_id: self.payfast_merchant_id.clone(),
            merchant_key: self.payfast_merchant_key.clone(),
            passphrase: self.payfast_passphrase.clone(),
            process_url: self.payfast_process_url.clone(),
            allowed_networks: self.payfast_allowed_networks.clone(),
            verify_source: self.payfast_verify_source,
        }
    }
}

impl std::fmt::Debug for PaymentGatewayArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.gateway_config(), f)
    }
}
