use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUaaUserRequest {
    pub user_name: String,
    pub password: String,
    pub name: UaaUserName,
    pub emails: Vec<UaaEmail>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UaaUserName {
    pub family_name: String,
    pub given_name: String,
}

#[derive(Debug, Serialize)]
pub struct UaaEmail {
    pub value: String,
    pub primary: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewUaaUserResponse {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct NewCcUserRequest {
    pub guid: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CcResource {
    #[serde(default)]
    pub metadata: CcMetadata,
}

#[derive(Debug, Default, Deserialize)]
pub struct CcMetadata {
    #[serde(default)]
    pub guid: String,
}
