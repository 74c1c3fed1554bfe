//! User account HTTP handlers.
//!
//! ```text
//! POST   /users/register
//! POST   /users/login
//! POST   /users/logout
//! GET    /users
//! GET    /users/:id
//! PATCH  /users/:id
//! DELETE /users/:id
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::auth::{LoginCredentials, Password};
use crate::domain::ports::{ProfileChanges, Registration};
use crate::domain::user::{PersonName, User, UserId, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::identity::{OptionalIdentity, RequiredIdentity, bearer_token};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, parse_uuid};

/// Registration request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequestBody {
    pub name: String,
    pub username: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequestBody {
    pub username: String,
    pub password: String,
}

/// Profile update request body; absent fields stay unchanged.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequestBody {
    pub name: Option<String>,
    pub username: Option<String>,
}

/// Full user projection: profile owner view.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FullUserBody {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    pub name: String,
    pub username: String,
    #[schema(format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for FullUserBody {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            name: user.name().as_ref().to_owned(),
            username: user.username().as_ref().to_owned(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

/// Minimal user projection shown to other viewers.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MinimalUserBody {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    pub name: String,
    pub username: String,
}

impl From<&User> for MinimalUserBody {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            name: user.name().as_ref().to_owned(),
            username: user.username().as_ref().to_owned(),
        }
    }
}

/// Registration/login response: issued token plus the full projection.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponseBody {
    pub message: String,
    pub token: String,
    pub user: FullUserBody,
}

/// Bare confirmation message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

/// Update response envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateUserResponseBody {
    pub message: String,
    pub data: UpdatedUserData,
}

/// Payload of [`UpdateUserResponseBody`].
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedUserData {
    pub user: FullUserBody,
}

fn parse_name(raw: &str) -> Result<PersonName, ApiError> {
    PersonName::new(raw)
        .map_err(|err| field_error(FieldName::new("name"), err.to_string(), "invalid_name").into())
}

fn parse_username(raw: &str) -> Result<Username, ApiError> {
    Username::new(raw).map_err(|err| {
        field_error(FieldName::new("username"), err.to_string(), "invalid_username").into()
    })
}

fn parse_password(raw: &str) -> Result<Password, ApiError> {
    Password::new(raw).map_err(|err| {
        field_error(FieldName::new("password"), err.to_string(), "invalid_password").into()
    })
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    parse_uuid(raw, FieldName::new("id"))
        .map(UserId::from_uuid)
        .map_err(ApiError::from)
}

/// Create an account and issue its first token.
#[utoipa::path(
    post,
    path = "/users/register",
    request_body = RegisterRequestBody,
    responses(
        (status = 201, description = "Account created", body = AuthResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "Username already exists", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequestBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let registration = Registration {
        name: parse_name(&payload.name)?,
        username: parse_username(&payload.username)?,
        password: parse_password(&payload.password)?,
    };

    let account = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(AuthResponseBody {
        message: "User created successfully".to_owned(),
        token: account.token,
        user: FullUserBody::from(&account.user),
    }))
}

/// Verify credentials and issue a token.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequestBody,
    responses(
        (status = 200, description = "Login success", body = AuthResponseBody),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequestBody>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.username, &payload.password)
        .map_err(|err| {
            field_error(FieldName::new("credentials"), err.to_string(), "invalid_credentials")
        })?;

    let account = state.auth.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(AuthResponseBody {
        message: "Login successful".to_owned(),
        token: account.token,
        user: FullUserBody::from(&account.user),
    }))
}

/// Revoke the presented token. Succeeds with or without one.
#[utoipa::path(
    post,
    path = "/users/logout",
    responses(
        (status = 200, description = "Logout success", body = MessageBody),
        (status = 503, description = "Revocation cache unavailable", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    if let Some(token) = bearer_token(&req) {
        state.auth.logout(&token).await?;
    }
    Ok(HttpResponse::Ok().json(MessageBody {
        message: "Logout successful".to_owned(),
    }))
}

/// List all accounts.
///
/// Serves the full projection to every caller; see the profile endpoint for
/// the ownership-differentiated view.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [FullUserBody]),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<FullUserBody>>> {
    let users = state.users_query.list_users().await?;
    Ok(web::Json(users.iter().map(FullUserBody::from).collect()))
}

/// Fetch one account: full projection for its owner, minimal otherwise.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = FullUserBody),
        (status = 400, description = "Invalid id", body = ApiError),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = parse_user_id(&path)?;
    let user = state.users_query.get_user(&target).await?;

    let is_own_profile = identity
        .0
        .as_ref()
        .is_some_and(|viewer| viewer.id() == &target);
    if is_own_profile {
        Ok(HttpResponse::Ok().json(FullUserBody::from(&user)))
    } else {
        Ok(HttpResponse::Ok().json(MinimalUserBody::from(&user)))
    }
}

/// Update the caller's own profile.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequestBody,
    responses(
        (status = 200, description = "User updated", body = UpdateUserResponseBody),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "User not found", body = ApiError),
        (status = 409, description = "Username already exists", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    identity: RequiredIdentity,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequestBody>,
) -> ApiResult<HttpResponse> {
    let target = parse_user_id(&path)?;
    let payload = payload.into_inner();

    let changes = ProfileChanges {
        name: payload.name.as_deref().map(parse_name).transpose()?,
        username: payload.username.as_deref().map(parse_username).transpose()?,
    };

    let user = state
        .user_command
        .update_user(identity.0.id(), &target, changes)
        .await?;
    Ok(HttpResponse::Ok().json(UpdateUserResponseBody {
        message: "User updated successfully".to_owned(),
        data: UpdatedUserData {
            user: FullUserBody::from(&user),
        },
    }))
}

/// Hard-delete the caller's own account.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageBody),
        (status = 401, description = "Unauthorised", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    identity: RequiredIdentity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = parse_user_id(&path)?;
    state
        .user_command
        .delete_user(identity.0.id(), &target)
        .await?;
    Ok(HttpResponse::Ok().json(MessageBody {
        message: "User deleted successfully".to_owned(),
    }))
}
