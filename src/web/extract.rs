//! Request context extractors.
//!
//! Handlers receive everything they need as typed arguments: the book id from
//! the path, a CSRF token to embed in forms, and for POSTs the parsed body
//! whose token has already been verified.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
    Form,
};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar, SameSite},
    WithRejection,
};
use serde::de::DeserializeOwned;

use crate::{
    csrf::{CsrfError, CsrfSecret},
    error::AppError,
    models::book::{BookForm, DeleteForm},
    AppState,
};

/// `:id` path segment; anything but an integer is a 404
pub type BookId = WithRejection<Path<i32>, AppError>;

/// CSRF secret resolved for the current request
#[derive(Debug, Clone)]
pub struct CsrfContext {
    pub secret: CsrfSecret,
    /// False when the browser sent no usable cookie and a new secret was issued
    pub from_cookie: bool,
}

/// Make sure every browser holds a CSRF secret cookie and expose it to
/// handlers through request extensions.
pub async fn ensure_csrf_cookie(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> (CookieJar, Response) {
    let settings = &state.config.csrf;
    let existing = jar
        .get(&settings.cookie_name)
        .and_then(|cookie| CsrfSecret::from_cookie_value(cookie.value()));

    let (context, jar) = match existing {
        Some(secret) => (CsrfContext { secret, from_cookie: true }, jar),
        None => {
            let secret = CsrfSecret::generate();
            let cookie = Cookie::build((settings.cookie_name.clone(), secret.as_str().to_owned()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Strict)
                .secure(settings.secure_cookie);
            (CsrfContext { secret, from_cookie: false }, jar.add(cookie))
        }
    };

    req.extensions_mut().insert(context);
    (jar, next.run(req).await)
}

fn csrf_context(extensions: &axum::http::Extensions) -> Result<&CsrfContext, AppError> {
    extensions
        .get::<CsrfContext>()
        .ok_or_else(|| AppError::Internal("CSRF cookie middleware not installed".to_string()))
}

/// Freshly minted token for the form being served
pub struct CsrfToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CsrfToken(csrf_context(&parts.extensions)?.secret.mint_token()))
    }
}

/// Form bodies that carry a CSRF token
pub trait CsrfProtected {
    fn csrf_token(&self) -> Option<&str>;
}

impl CsrfProtected for BookForm {
    fn csrf_token(&self) -> Option<&str> {
        self.csrf.as_deref()
    }
}

impl CsrfProtected for DeleteForm {
    fn csrf_token(&self) -> Option<&str> {
        self.csrf.as_deref()
    }
}

/// URL-encoded form whose CSRF token matched the browser's secret.
///
/// Rejection happens during extraction, so a handler taking this argument
/// never runs for a forged request.
pub struct VerifiedForm<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for VerifiedForm<T>
where
    T: DeserializeOwned + CsrfProtected + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let context = csrf_context(req.extensions())?.clone();
        if !context.from_cookie {
            return Err(CsrfError::MissingSecret.into());
        }

        let Form(value) = Form::<T>::from_request(req, state).await?;
        context.secret.verify(value.csrf_token())?;

        Ok(VerifiedForm(value))
    }
}
