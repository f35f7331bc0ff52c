//! Hosted payment page redirects.

use gennessence::{money, signature};

use crate::domain::{
    orders::records::OrderUuid,
    payments::{config::PaymentGatewayConfig, errors::PaymentsServiceError},
};

/// A checkout to hand over to the hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Amount to charge, in minor units.
    pub amount: u64,
    pub item_name: String,
    pub return_url: String,
    pub cancel_url: String,
    pub notify_url: String,
    /// Order the payment settles, echoed back in notifications.
    pub order: Option<OrderUuid>,
}

/// Signed redirect to the payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRedirect {
    pub url: String,
    pub signature: String,
}

impl PaymentRequest {
    fn check(&self) -> Result<(), PaymentsServiceError> {
        if self.amount == 0 {
            return Err(PaymentsServiceError::MissingField("amount"));
        }

        for (name, value) in [
            ("item_name", &self.item_name),
            ("return_url", &self.return_url),
            ("cancel_url", &self.cancel_url),
            ("notify_url", &self.notify_url),
        ] {
            if value.trim().is_empty() {
                return Err(PaymentsServiceError::MissingField(name));
            }
        }

        Ok(())
    }

    /// Gateway fields in the order the gateway documents them.
    fn fields(&self, config: &PaymentGatewayConfig) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("merchant_id", config.merchant_id.clone()),
            ("merchant_key", config.merchant_key.clone()),
            ("amount", money::to_fixed(self.amount)),
            ("item_name", self.item_name.trim().to_string()),
            ("return_url", self.return_url.trim().to_string()),
            ("cancel_url", self.cancel_url.trim().to_string()),
            ("notify_url", self.notify_url.trim().to_string()),
        ];

        if let Some(order) = self.order {
            fields.push(("m_payment_id", order.to_string()));
        }

        fields
    }
}

/// Build the signed payment page URL for `request`.
///
/// # Errors
///
/// Returns [`PaymentsServiceError::MissingField`] when the amount is zero or
/// any text field is blank.
pub fn build_redirect(
    config: &PaymentGatewayConfig,
    request: &PaymentRequest,
) -> Result<PaymentRedirect, PaymentsServiceError> {
    request.check()?;

    let fields = request.fields(config);
    let signature = signature::sign(
        fields.iter().map(|(key, value)| (*key, value.as_str())),
        config.passphrase(),
    );

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().map(|(key, value)| (*key, value.as_str())))
        .append_pair(signature::SIGNATURE_FIELD, &signature)
        .finish();

    Ok(PaymentRedirect {
        url: format!("{}?{query}", config.process_url),
        signature,
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::payments::config::DEFAULT_PROCESS_URL;

    use super::*;

    fn config(passphrase: Option<&str>) -> PaymentGatewayConfig {
        PaymentGatewayConfig {
            merchant_id: "10000100".to_string(),
            merchant_key: "46f0cd694581a".to_string(),
            passphrase: passphrase.map(str::to_string),
            process_url: DEFAULT_PROCESS_URL.to_string(),
            allowed_networks: Vec::new(),
            verify_source: false,
        }
    }

    fn request() -> PaymentRequest {
        PaymentRequest {
            amount: 16_000,
            item_name: "Still Water 500ml".to_string(),
            return_url: "https://shop.example/success".to_string(),
            cancel_url: "https://shop.example/cancel".to_string(),
            notify_url: "https://api.shop.example/api/payfast/notify".to_string(),
            order: None,
        }
    }

    #[test]
    fn url_carries_fields_and_signature() -> TestResult {
        let redirect = build_redirect(&config(None), &request())?;

        assert_eq!(
            redirect.url,
            format!(
                "https://www.payfast.co.za/eng/process?merchant_id=10000100\
                 &merchant_key=46f0cd694581a&amount=160.00&item_name=Still+Water+500ml\
                 &return_url=https%3A%2F%2Fshop.example%2Fsuccess\
                 &cancel_url=https%3A%2F%2Fshop.example%2Fcancel\
                 &notify_url=https%3A%2F%2Fapi.shop.example%2Fapi%2Fpayfast%2Fnotify\
                 &signature={}",
                redirect.signature
            )
        );

        let signed = [
            ("merchant_id", "10000100"),
            ("merchant_key", "46f0cd694581a"),
            ("amount", "160.00"),
            ("item_name", "Still Water 500ml"),
            ("return_url", "https://shop.example/success"),
            ("cancel_url", "https://shop.example/cancel"),
            ("notify_url", "https://api.shop.example/api/payfast/notify"),
        ];

        assert!(signature::verify(signed, None, &redirect.signature));

        Ok(())
    }

    #[test]
    fn passphrase_and_order_change_the_signature() -> TestResult {
        let plain = build_redirect(&config(None), &request())?;
        let salted = build_redirect(&config(Some("jt7NOE43FZPn")), &request())?;

        assert_ne!(plain.signature, salted.signature);

        let order = OrderUuid::new();
        let with_order = build_redirect(
            &config(None),
            &PaymentRequest {
                order: Some(order),
                ..request()
            },
        )?;

        assert_ne!(plain.signature, with_order.signature);
        assert!(with_order.url.contains(&format!("m_payment_id={order}")));

        Ok(())
    }

    #[test]
    fn blank_fields_are_rejected() {
        let result = build_redirect(
            &config(None),
            &PaymentRequest {
                notify_url: "  ".to_string(),
                ..request()
            },
        );

        assert!(matches!(
            result,
            Err(PaymentsServiceError::MissingField("notify_url"))
        ));

        let free = build_redirect(
            &config(None),
            &PaymentRequest {
                amount: 0,
                ..request()
            },
        );

        assert!(matches!(
            free,
            Err(PaymentsServiceError::MissingField("amount"))
        ));
    }
}
