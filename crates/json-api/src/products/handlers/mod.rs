//! Product Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod export;
pub(crate) mod get;
pub(crate) mod import;
pub(crate) mod index;
pub(crate) mod update;

#[cfg(test)]
pub(crate) mod tests {
    use gennessence_app::domain::products::records::{ProductRecord, ProductStatus, ProductUuid};
    use jiff::Timestamp;
    use rust_decimal::Decimal;

    pub(crate) fn make_product(uuid: ProductUuid, price: u64) -> ProductRecord {
        ProductRecord {
            uuid,
            name: "Alkaline Still".to_string(),
            description: "Smooth and crisp".to_string(),
            ph: Decimal::new(95, 1),
            size: "500ml".to_string(),
            price,
            image: "/images/still.png".to_string(),
            benefits: ["Hydration".to_string()].into_iter().collect(),
            stock: 40,
            status: ProductStatus::Active,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            deleted_at: None,
        }
    }
}
