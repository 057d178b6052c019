//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use bodega_app::{
    auth::{MockAuthService, models::UserUuid},
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartLine, CartOwner, SessionToken},
        },
        products::models::ProductUuid,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());
pub(crate) const TEST_SESSION: SessionToken = SessionToken::from_uuid(Uuid::nil());
pub(crate) const TEST_USER: CartOwner = CartOwner::User(TEST_USER_UUID);
pub(crate) const TEST_GUEST: CartOwner = CartOwner::Guest(TEST_SESSION);

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_cart_owner(TEST_USER);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_guest(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_cart_owner(TEST_GUEST);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item().never();
    carts.expect_remove_item().never();
    carts.expect_clear_cart().never();
    carts.expect_merge_guest_into_user().never();

    carts
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    Arc::new(State::new(AppContext {
        carts: Arc::new(carts),
        auth: Arc::new(strict_auth_mock()),
    }))
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Arc::new(State::new(AppContext {
        carts: Arc::new(strict_carts_mock()),
        auth: Arc::new(auth),
    }))
}

/// Route behind the carts state with an authenticated user identity.
pub(crate) fn user_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .hoop(inject_user)
            .push(route),
    )
}

/// Route behind the carts state with a guest session identity.
pub(crate) fn guest_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .hoop(inject_guest)
            .push(route),
    )
}

/// Route behind the carts state with no resolved identity.
pub(crate) fn anon_service(carts: MockCartsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_carts(carts)))
            .push(route),
    )
}

pub(crate) fn make_line(product: ProductUuid, quantity: u32, unit_price: u64) -> CartLine {
    CartLine {
        product_uuid: product,
        quantity,
        unit_price,
    }
}

pub(crate) fn make_cart(owner: CartOwner, lines: Vec<CartLine>) -> Cart {
    let total = lines
        .iter()
        .map(|line| line.unit_price.saturating_mul(u64::from(line.quantity)))
        .sum();

    Cart {
        owner,
        lines,
        total,
        updated_at: Some(Timestamp::UNIX_EPOCH),
    }
}
