/// Warnings a server attached to an otherwise successful response.
pub type Warnings = Vec<String>;

/// A UAA user account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UaaUser {
    pub id: String,
}

/// A Cloud Controller user record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CcUser {
    pub guid: String,
}
