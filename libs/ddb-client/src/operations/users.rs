//! Authentication and account operations.
//!
//! Login, registration and password reset go out without credentials or
//! impersonation headers. Bodies carrying passwords or TOTP codes are
//! never written to debug logs.

use ddb_auth::{SecretString, find_set_cookie};
use http::StatusCode;

use crate::client::Client;
use crate::error::Error;
use crate::executor::{expect_status, status_error};
use crate::options::AuthMode;
use crate::request::{Path, RequestSpec, required};
use crate::types::User;
use crate::types::auth::{
    EmailAddressVerificationRequestInput, PasswordResetTokenCreationRequestInput,
    PasswordResetTokenRedemptionRequestInput, PasswordUpdateInput, TokenResponse,
    TotpSecretRefreshInput, TotpSecretRefreshResponse, TotpSecretVerificationInput,
    UserLoginInput, UserStatusResponse,
};
use crate::types::{UserCreationResponse, UserRegistrationInput};

const TOTP_TOKEN_LENGTH: usize = 6;

impl Client {
    /// Log in and return the session cookie value.
    ///
    /// The client's own credentials are untouched; use
    /// [`ClientOption::Login`](crate::ClientOption::Login) to install them.
    ///
    /// # Errors
    /// [`Error::NilInputProvided`] without input, [`Error::NoCookiesReturned`]
    /// when the server accepts the login but sets no session cookie
    pub async fn login(&self, input: Option<&UserLoginInput>) -> Result<SecretString, Error> {
        self.cookie_login("Login", "/users/login", input).await
    }

    /// [`Client::login`] against the admin login endpoint
    ///
    /// # Errors
    /// As for [`Client::login`]
    pub async fn admin_login(&self, input: Option<&UserLoginInput>) -> Result<SecretString, Error> {
        self.cookie_login("AdminLogin", "/users/login/admin", input)
            .await
    }

    async fn cookie_login(
        &self,
        operation: &'static str,
        path: &'static str,
        input: Option<&UserLoginInput>,
    ) -> Result<SecretString, Error> {
        self.dispatch(
            operation,
            || {
                RequestSpec::post(Path::new(path))
                    .body(required(input)?)
                    .map(|spec| spec.unauthenticated().sensitive())
            },
            |state, raw| {
                if !raw.status.is_success() {
                    return Err(status_error(state, &raw));
                }
                find_set_cookie(&raw.headers, &state.settings.cookie_name)
                    .ok_or(Error::NoCookiesReturned)
            },
        )
        .await
    }

    /// Log in and return a JWT, usable with
    /// [`ClientOption::Bearer`](crate::ClientOption::Bearer) or as the
    /// bootstrap token of the `OAuth2` option.
    ///
    /// # Errors
    /// [`Error::NilInputProvided`] without input
    pub async fn login_for_jwt(
        &self,
        input: Option<&UserLoginInput>,
    ) -> Result<TokenResponse, Error> {
        self.jwt_login("LoginForJWT", "/users/login/jwt", input)
            .await
    }

    /// # Errors
    /// [`Error::NilInputProvided`] without input
    pub async fn admin_login_for_jwt(
        &self,
        input: Option<&UserLoginInput>,
    ) -> Result<TokenResponse, Error> {
        self.jwt_login("AdminLoginForJWT", "/users/login/jwt/admin", input)
            .await
    }

    async fn jwt_login(
        &self,
        operation: &'static str,
        path: &'static str,
        input: Option<&UserLoginInput>,
    ) -> Result<TokenResponse, Error> {
        self.fetch(operation, || {
            RequestSpec::post(Path::new(path))
                .body(required(input)?)
                .map(|spec| spec.unauthenticated().sensitive())
        })
        .await
    }

    /// End the cookie session and drop the cookie from this client.
    ///
    /// # Errors
    /// [`Error::CookieRequired`] unless the client holds a session cookie
    pub async fn logout(&self) -> Result<(), Error> {
        self.fetch_unit("Logout", || {
            self.session_cookie().ok_or(Error::CookieRequired)?;
            Ok(RequestSpec::post(Path::new("/users/logout")))
        })
        .await?;

        let state = self.snapshot();
        let mut settings = state.settings.clone();
        if let AuthMode::Cookie(cookie) = &settings.auth {
            cookie.clear();
        }
        settings.auth = AuthMode::None;
        self.replace_settings(settings)
    }

    /// # Errors
    /// [`Error::NilInputProvided`] without input; any status other than
    /// 200 or 202 is an error
    pub async fn change_password(&self, input: Option<&PasswordUpdateInput>) -> Result<(), Error> {
        self.dispatch(
            "ChangePassword",
            || {
                RequestSpec::put(Path::new("/api/v1/users/password/new"))
                    .body(required(input)?)
                    .map(RequestSpec::sensitive)
            },
            |state, raw| expect_status(state, &raw, &[StatusCode::OK, StatusCode::ACCEPTED]),
        )
        .await
    }

    /// Replace the two-factor secret
    ///
    /// # Errors
    /// [`Error::NilInputProvided`] without input
    pub async fn cycle_two_factor_secret(
        &self,
        input: Option<&TotpSecretRefreshInput>,
    ) -> Result<TotpSecretRefreshResponse, Error> {
        self.fetch("CycleTwoFactorSecret", || {
            RequestSpec::post(Path::new("/api/v1/users/totp_secret/new"))
                .body(required(input)?)
                .map(RequestSpec::sensitive)
        })
        .await
    }

    /// Confirm a freshly issued two-factor secret with a code it generated
    ///
    /// # Errors
    /// [`Error::InvalidIdProvided`] for an empty user id,
    /// [`Error::InvalidTotpToken`] for a malformed code or when the server
    /// rejects it with 400
    pub async fn verify_totp_secret(&self, user_id: &str, totp_token: &str) -> Result<(), Error> {
        self.dispatch(
            "VerifyTOTPSecret",
            || {
                if user_id.is_empty() {
                    return Err(Error::invalid_id("user"));
                }
                if totp_token.len() != TOTP_TOKEN_LENGTH {
                    return Err(Error::InvalidTotpToken);
                }
                let input = TotpSecretVerificationInput {
                    user_id: user_id.to_owned(),
                    totp_token: totp_token.to_owned(),
                };
                Ok(RequestSpec::post(Path::new("/users/totp_secret/verify"))
                    .body(&input)?
                    .unauthenticated()
                    .sensitive())
            },
            |state, raw| match raw.status {
                StatusCode::OK | StatusCode::ACCEPTED => Ok(()),
                StatusCode::BAD_REQUEST => Err(Error::InvalidTotpToken),
                _ => Err(status_error(state, &raw)),
            },
        )
        .await
    }

    /// Ask for a password reset email
    ///
    /// # Errors
    /// [`Error::EmptyEmailAddressProvided`] for a blank address
    pub async fn request_password_reset_token(&self, email_address: &str) -> Result<(), Error> {
        self.fetch_unit("RequestPasswordResetToken", || {
            if email_address.trim().is_empty() {
                return Err(Error::EmptyEmailAddressProvided);
            }
            let input = PasswordResetTokenCreationRequestInput {
                email_address: email_address.to_owned(),
            };
            Ok(RequestSpec::post(Path::new("/users/password/reset"))
                .body(&input)?
                .unauthenticated())
        })
        .await
    }

    /// # Errors
    /// [`Error::NilInputProvided`] without input
    pub async fn redeem_password_reset_token(
        &self,
        input: Option<&PasswordResetTokenRedemptionRequestInput>,
    ) -> Result<(), Error> {
        self.fetch_unit("RedeemPasswordResetToken", || {
            RequestSpec::post(Path::new("/users/password/reset/redeem"))
                .body(required(input)?)
                .map(|spec| spec.unauthenticated().sensitive())
        })
        .await
    }

    /// # Errors
    /// [`Error::NilInputProvided`] without input
    pub async fn verify_email_address(
        &self,
        input: Option<&EmailAddressVerificationRequestInput>,
    ) -> Result<(), Error> {
        self.fetch_unit("VerifyEmailAddress", || {
            RequestSpec::post(Path::new("/users/email_address/verify"))
                .body(required(input)?)
                .map(RequestSpec::unauthenticated)
        })
        .await
    }

    /// Whether the current credentials are accepted, and for which household
    ///
    /// # Errors
    /// Transport, decode and server errors only
    pub async fn get_auth_status(&self) -> Result<UserStatusResponse, Error> {
        self.fetch("GetAuthStatus", || {
            Ok(RequestSpec::get(Path::new("/auth/status")))
        })
        .await
    }

    /// Whether the server reports itself ready to take requests
    ///
    /// # Errors
    /// Transport errors, timeouts and cancellation; any status is an answer
    pub async fn is_up(&self) -> Result<bool, Error> {
        self.dispatch(
            "IsUp",
            || Ok(RequestSpec::get(Path::new("/_meta_/ready")).unauthenticated()),
            |_, raw| Ok(raw.status == StatusCode::OK),
        )
        .await
    }

    /// Register a new account
    ///
    /// # Errors
    /// [`Error::NilInputProvided`] without input
    pub async fn create_user(
        &self,
        input: Option<&UserRegistrationInput>,
    ) -> Result<UserCreationResponse, Error> {
        self.fetch("CreateUser", || {
            RequestSpec::post(Path::new("/users"))
                .body(required(input)?)
                .map(|spec| spec.unauthenticated().sensitive())
        })
        .await
    }

    /// # Errors
    /// Transport, decode and server errors only
    pub async fn get_self(&self) -> Result<User, Error> {
        self.fetch("GetSelf", || {
            Ok(RequestSpec::get(Path::new("/api/v1/users/self")))
        })
        .await
    }
}
