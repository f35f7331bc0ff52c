//! App Router

use salvo::Router;

use crate::{auth, cart, orders, payfast, products, stats, users};

/// Every `/api` route. Static segments are registered before `{id}` captures
/// at the same level.
pub(crate) fn api_router() -> Router {
    Router::with_path("api")
        .push(public_routes())
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(customer_routes())
                .push(
                    Router::new()
                        .hoop(auth::middleware::require_admin)
                        .push(admin_routes()),
                ),
        )
}

fn public_routes() -> Router {
    Router::new()
        .push(Router::with_path("auth/login").post(auth::login::handler))
        .push(Router::with_path("auth/signup").post(auth::signup::handler))
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(
            Router::with_path("payfast")
                .push(Router::with_path("create-payment").post(payfast::create_payment::handler))
                .push(Router::with_path("notify").post(payfast::notify::handler)),
        )
}

fn customer_routes() -> Router {
    Router::new()
        .push(Router::with_path("auth/me").get(auth::me::handler))
        .push(Router::with_path("auth/logout").post(auth::logout::handler))
        .push(
            Router::with_path("cart")
                .get(cart::get::handler)
                .post(cart::replace::handler)
                .delete(cart::clear::handler),
        )
        .push(
            Router::with_path("orders")
                .post(orders::create::handler)
                .push(Router::with_path("my-orders").get(orders::mine::handler))
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("cancel").post(orders::cancel::handler)),
                ),
        )
}

fn admin_routes() -> Router {
    Router::new()
        .push(Router::with_path("auth/register").post(auth::register::handler))
        .push(
            Router::with_path("users")
                .get(users::index::handler)
                .post(users::create::handler)
                .push(
                    Router::with_path("{user}")
                        .get(users::get::handler)
                        .put(users::update::handler)
                        .delete(users::delete::handler)
                        .push(Router::with_path("role").patch(users::role::handler))
                        .push(Router::with_path("status").patch(users::status::handler))
                        .push(Router::with_path("password").patch(users::password::handler)),
                ),
        )
        .push(
            Router::with_path("products")
                .post(products::create::handler)
                .push(Router::with_path("import").post(products::import::handler))
                .push(Router::with_path("export/csv").get(products::export::handler))
                .push(
                    Router::with_path("{product}")
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .push(
                    Router::with_path("stats")
                        .push(Router::with_path("overview").get(stats::overview::handler))
                        .push(Router::with_path("revenue-trend").get(stats::revenue_trend::handler))
                        .push(Router::with_path("top-products").get(stats::top_products::handler)),
                )
                .push(
                    Router::with_path("{order}")
                        .push(Router::with_path("status").patch(orders::status::handler))
                        .push(Router::with_path("payment").patch(orders::payment::handler)),
                ),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        http::{StatusCode, header::AUTHORIZATION},
        test::TestClient,
        Service,
    };
    use testresult::TestResult;

    use crate::{
        products::handlers::tests::make_product,
        test_helpers::{MockServices, TEST_CUSTOMER},
    };

    use gennessence_app::domain::products::records::ProductUuid;

    use super::*;

    fn make_service(services: MockServices) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(services.into_state()))
                .push(api_router()),
        )
    }

    #[tokio::test]
    async fn test_catalogue_is_public() -> TestResult {
        let mut services = MockServices::default();

        services
            .products
            .expect_list_products()
            .once()
            .return_once(|_| Ok(vec![make_product(ProductUuid::new(), 100)]));

        let res = TestClient::get("http://example.com/api/products")
            .send(&make_service(services))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_protected_routes_require_a_token() -> TestResult {
        let routes = [
            ("POST", "http://example.com/api/products"),
            ("GET", "http://example.com/api/products/export/csv"),
            ("GET", "http://example.com/api/cart"),
            ("GET", "http://example.com/api/orders"),
            ("GET", "http://example.com/api/orders/my-orders"),
            ("GET", "http://example.com/api/orders/stats/overview"),
            ("GET", "http://example.com/api/users"),
        ];

        for (method, url) in routes {
            let client = match method {
                "POST" => TestClient::post(url),
                _ => TestClient::get(url),
            };

            let res = client.send(&make_service(MockServices::default())).await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::UNAUTHORIZED),
                "{method} {url}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_customers_cannot_reach_admin_routes() -> TestResult {
        let mut services = MockServices::default();

        services
            .auth
            .expect_authenticate_bearer()
            .times(2)
            .returning(|_| Ok(TEST_CUSTOMER));

        let service = make_service(services);

        for url in [
            "http://example.com/api/orders/stats/top-products",
            "http://example.com/api/users",
        ] {
            let res = TestClient::get(url)
                .add_header(AUTHORIZATION, "Bearer customer-token", true)
                .send(&service)
                .await;

            assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN), "{url}");
        }

        Ok(())
    }
}
