//! Read-only user queries.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::dispatch::{Request, RequestHandler};
use crate::domain::ports::UserRepository;
use crate::domain::{Error, UserId};

use super::{UserView, map_user_persistence_error, user_not_found};

/// Fetch one user by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetUserById {
    /// User to fetch.
    pub user_id: UserId,
}

impl Request for GetUserById {
    type Response = UserView;
    const NAME: &'static str = "GetUserById";
}

/// Fetch every user, ordered by username.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetUsers;

impl Request for GetUsers {
    type Response = Vec<UserView>;
    const NAME: &'static str = "GetUsers";
}

/// Handler for [`GetUserById`].
#[derive(Clone)]
pub struct GetUserByIdHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUserByIdHandler {
    /// Create a handler backed by `users`.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<GetUserById> for GetUserByIdHandler {
    async fn handle(&self, request: GetUserById) -> Result<UserView, Error> {
        self.users
            .find_by_id(&request.user_id)
            .await
            .map_err(map_user_persistence_error)?
            .map(|user| UserView::from(&user))
            .ok_or_else(|| user_not_found(request.user_id))
    }
}

/// Handler for [`GetUsers`].
#[derive(Clone)]
pub struct GetUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUsersHandler {
    /// Create a handler backed by `users`.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<GetUsers> for GetUsersHandler {
    async fn handle(&self, _request: GetUsers) -> Result<Vec<UserView>, Error> {
        let users = self.users.list().await.map_err(map_user_persistence_error)?;
        Ok(users.iter().map(UserView::from).collect())
    }
}
