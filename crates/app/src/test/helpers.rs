//! Test Helpers

use gennessence::{
    cart::{CartItem, CartProduct},
    checkout::{OrderDraftItem, ShippingAddress},
    signature,
};
use rust_decimal::Decimal;
use smallvec::smallvec;
use uuid::Uuid;

use crate::{
    domain::{
        orders::{data::NewOrder, records::OrderUuid},
        products::{
            ProductsService, ProductsServiceError,
            data::{NewProduct, ProductDetails},
            records::{ProductStatus, ProductUuid},
        },
        users::{
            UsersService, UsersServiceError,
            data::NewUser,
            records::{UserRole, UserStatus, UserUuid},
        },
    },
    test::{TestContext, context::TEST_PASSPHRASE},
};

/// Active user whose password is `password123`.
pub(crate) fn new_user(email: &str, role: UserRole) -> NewUser {
    NewUser {
        uuid: UserUuid::new(),
        email: email.to_string(),
        name: "Amara Dlamini".to_string(),
        password: "password123".to_string(),
        role,
        status: UserStatus::Active,
        avatar: None,
    }
}

pub(crate) async fn create_customer(
    ctx: &TestContext,
    email: &str,
) -> Result<UserUuid, UsersServiceError> {
    let user = ctx
        .users
        .create_user(new_user(email, UserRole::Customer))
        .await?;

    Ok(user.uuid)
}

/// Active 500ml product with plenty of stock.
pub(crate) fn product_details(name: &str, price: u64) -> ProductDetails {
    ProductDetails {
        name: name.to_string(),
        description: format!("{name} spring water"),
        ph: Decimal::new(75, 1),
        size: "500ml".to_string(),
        price,
        image: format!("/images/{}.png", name.to_lowercase()),
        benefits: smallvec!["Hydration".to_string()],
        stock: 100,
        status: ProductStatus::Active,
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    price: u64,
) -> Result<ProductUuid, ProductsServiceError> {
    let product = ctx
        .products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            details: product_details(name, price),
        })
        .await?;

    Ok(product.uuid)
}

/// Cart line for the 500ml size of `name` at R50.00.
pub(crate) fn cart_item(name: &str, qty: u32) -> CartItem {
    CartItem::new(
        CartProduct {
            product_uuid: Uuid::now_v7(),
            name: name.to_string(),
            size: "500ml".to_string(),
            price: 5_000,
            image: String::new(),
            color: "#1e88e5".to_string(),
        },
        qty,
    )
}

pub(crate) fn new_order(lines: &[(ProductUuid, u32)]) -> NewOrder {
    NewOrder {
        uuid: OrderUuid::new(),
        items: lines
            .iter()
            .map(|(product, quantity)| OrderDraftItem {
                product_uuid: product.into_uuid(),
                quantity: *quantity,
            })
            .collect(),
        shipping_address: ShippingAddress {
            street: "12 Long Street".to_string(),
            city: "Cape Town".to_string(),
            state: "Western Cape".to_string(),
            postal_code: "8001".to_string(),
            country: "South Africa".to_string(),
        },
    }
}

/// Gateway notification for `order`, signed with the test passphrase.
pub(crate) fn signed_notification(
    order: OrderUuid,
    payment_status: &str,
    amount_gross: &str,
) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = [
        ("m_payment_id", order.to_string()),
        ("pf_payment_id", "1089250".to_string()),
        ("payment_status", payment_status.to_string()),
        ("item_name", "Gennessence order".to_string()),
        ("amount_gross", amount_gross.to_string()),
        ("merchant_id", "10000100".to_string()),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect();

    let signature = signature::sign(
        params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
        Some(TEST_PASSPHRASE),
    );

    params.push((signature::SIGNATURE_FIELD.to_string(), signature));

    params
}
