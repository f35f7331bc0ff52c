//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use gennessence_app::{
    auth::{AuthenticatedUser, MockAuthService},
    context::AppContext,
    domain::{
        carts::MockCartsService,
        orders::MockOrdersService,
        payments::MockPaymentsService,
        products::MockProductsService,
        reports::MockReportsService,
        users::{
            MockUsersService,
            records::{UserRecord, UserRole, UserStatus, UserUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER_UUID: UserUuid = UserUuid::from_uuid(Uuid::from_u128(1));
pub(crate) const TEST_ADMIN_UUID: UserUuid = UserUuid::from_uuid(Uuid::from_u128(2));
pub(crate) const TEST_TOKEN_UUID: Uuid = Uuid::from_u128(3);

pub(crate) const TEST_CUSTOMER: AuthenticatedUser = AuthenticatedUser {
    user_uuid: TEST_CUSTOMER_UUID,
    role: UserRole::Customer,
    token_uuid: TEST_TOKEN_UUID,
};

pub(crate) const TEST_ADMIN: AuthenticatedUser = AuthenticatedUser {
    user_uuid: TEST_ADMIN_UUID,
    role: UserRole::Admin,
    token_uuid: TEST_TOKEN_UUID,
};

/// Service mocks; any call without a matching expectation fails the test.
#[derive(Default)]
pub(crate) struct MockServices {
    pub(crate) users: MockUsersService,
    pub(crate) auth: MockAuthService,
    pub(crate) products: MockProductsService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) reports: MockReportsService,
    pub(crate) payments: MockPaymentsService,
}

impl MockServices {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::shared(AppContext {
            users: Arc::new(self.users),
            auth: Arc::new(self.auth),
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
            reports: Arc::new(self.reports),
            payments: Arc::new(self.payments),
        })
    }
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_current_user(TEST_CUSTOMER);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_current_user(TEST_ADMIN);
    ctrl.call_next(req, depot, res).await;
}

/// Route with no authenticated user.
pub(crate) fn public_service(services: MockServices, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(services.into_state()))
            .push(route),
    )
}

/// Route called by an authenticated customer.
pub(crate) fn customer_service(services: MockServices, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(services.into_state()))
            .hoop(inject_customer)
            .push(route),
    )
}

/// Route called by an authenticated administrator.
pub(crate) fn admin_service(services: MockServices, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(services.into_state()))
            .hoop(inject_admin)
            .push(route),
    )
}

pub(crate) fn make_user(uuid: UserUuid, email: &str, role: UserRole) -> UserRecord {
    UserRecord {
        uuid,
        email: email.to_string(),
        name: "Amara Okafor".to_string(),
        role,
        status: UserStatus::Active,
        avatar: None,
        last_login_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
