//! Identity middleware.
//!
//! Resolves the cart identity for a request: a bearer token maps to an
//! authenticated user, otherwise the `cart_session` cookie maps to a guest
//! session. A request with neither carries no identity; mutating handlers
//! mint a guest session on demand via [`owner_or_mint`].

use std::{str::FromStr, sync::Arc};

use salvo::{
    http::{cookie::Cookie, header::AUTHORIZATION},
    prelude::*,
};
use tracing::error;
use uuid::Uuid;

use bodega_app::{
    auth::AuthServiceError,
    domain::carts::models::{CartOwner, SessionToken},
};

use crate::{extensions::*, state::State};

/// Cookie carrying the anonymous session identifier.
pub(crate) const SESSION_COOKIE: &str = "cart_session";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Some(token) = extract_bearer_token(req) {
        let state = match depot.obtain::<Arc<State>>() {
            Ok(state) => state,
            Err(_error) => {
                res.render(StatusError::internal_server_error());

                return;
            }
        };

        let user_uuid = match state.app.auth.authenticate_bearer(token).await {
            Ok(user_uuid) => user_uuid,
            Err(AuthServiceError::NotFound) => {
                res.render(StatusError::unauthorized().brief("Invalid bearer token"));

                return;
            }
            Err(AuthServiceError::AlreadyExists | AuthServiceError::Sql(_)) => {
                error!("failed to validate bearer token");

                res.render(StatusError::internal_server_error());

                return;
            }
        };

        depot.insert_cart_owner(CartOwner::User(user_uuid));
    } else if let Some(session) = session_from_cookie(req) {
        depot.insert_cart_owner(CartOwner::Guest(session));
    }

    ctrl.call_next(req, depot, res).await;
}

/// The resolved identity, or a freshly minted guest session whose cookie is
/// attached to the response. Mutating cart handlers use this; reads never
/// mint a session.
pub(crate) fn owner_or_mint(depot: &Depot, res: &mut Response) -> CartOwner {
    if let Some(owner) = depot.cart_owner() {
        return owner;
    }

    let session = SessionToken::mint();

    set_session_cookie(res, session);

    CartOwner::Guest(session)
}

pub(crate) fn set_session_cookie(res: &mut Response, session: SessionToken) {
    res.add_cookie(
        Cookie::build((SESSION_COOKIE, session.to_string()))
            .path("/")
            .http_only(true)
            .build(),
    );
}

pub(crate) fn clear_session_cookie(res: &mut Response) {
    res.remove_cookie(SESSION_COOKIE);
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

pub(crate) fn session_from_cookie(req: &Request) -> Option<SessionToken> {
    let value = req.cookie(SESSION_COOKIE)?.value();

    Uuid::from_str(value).ok().map(SessionToken::from_uuid)
}
