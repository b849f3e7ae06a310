use serde::Deserialize;

/// Request body for `POST /users`. Required fields are checked by the
/// service so that a missing one reports which field it was.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub profile: Option<String>,
}

/// Request body for `PUT /users/:id`; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub profile: Option<String>,
}
