//! Users service - account administration

use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{CreateUser, User, UserListQuery, UserListResponse, UserPatch};
use crate::http::{ApiClient, ApiRequest, QueryParams};

#[derive(Serialize)]
struct ToggleBody {
    enabled: bool,
}

pub struct UsersService {
    client: Arc<ApiClient>,
}

impl UsersService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &UserListQuery) -> Result<UserListResponse> {
        self.client.get("/users", list_query(query)).await
    }

    pub async fn by_id(&self, user_id: &str) -> Result<User> {
        self.client
            .get(&format!("/users/{}", user_id), QueryParams::new())
            .await
    }

    pub async fn create(&self, user: &CreateUser) -> Result<User> {
        self.client.post("/users", user).await
    }

    pub async fn update(&self, user_id: &str, patch: &UserPatch) -> Result<User> {
        self.client.put(&format!("/users/{}", user_id), patch).await
    }

    pub async fn delete(&self, user_id: &str) -> Result<()> {
        self.client
            .send_unit(ApiRequest::delete(format!("/users/{}", user_id)))
            .await
    }

    /// Enable or disable an account from the admin screen
    pub async fn set_enabled(&self, user_id: &str, enabled: bool) -> Result<()> {
        let request = ApiRequest::patch(format!("/admin/users/{}/toggle", user_id))
            .json(&ToggleBody { enabled })?;
        self.client.send_unit(request).await
    }
}

fn list_query(query: &UserListQuery) -> QueryParams {
    QueryParams::new()
        .with_opt("page", query.page)
        .with_opt("limit", query.limit)
        .with_opt("search", query.search.as_deref().map(str::trim))
        .with_opt("role", query.role.map(|r| r.as_str()))
        .with_opt("status", query.status.map(|s| s.as_str()))
        .with_opt("sortBy", query.sort_by.map(|s| s.as_str()))
        .with_opt("sortOrder", query.sort_order.map(|o| o.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, SortOrder, UserSortBy};

    #[test]
    fn test_list_query() {
        let query = UserListQuery {
            page: Some(2),
            limit: Some(20),
            search: Some("  ana ".to_string()),
            role: Some(Role::Admin),
            sort_by: Some(UserSortBy::CreatedAt),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        assert_eq!(
            list_query(&query).to_query_string(),
            "?page=2&limit=20&search=ana&role=admin&sortBy=createdAt&sortOrder=desc"
        );
        assert_eq!(list_query(&UserListQuery::default()).to_query_string(), "");
    }
}
