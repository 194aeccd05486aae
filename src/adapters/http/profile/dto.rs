//! Request body for `POST /profile`.

use serde::Deserialize;

use crate::domain::{DialogRef, ProfileQuery};

/// Profile variable names, given either as one name or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProfileNames {
    One(String),
    Many(Vec<String>),
}

impl From<ProfileNames> for Vec<String> {
    fn from(names: ProfileNames) -> Self {
        match names {
            ProfileNames::One(name) => vec![name],
            ProfileNames::Many(names) => names,
        }
    }
}

/// Body of a profile lookup. Without `name` every variable is returned.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub client_id: Option<DialogRef>,
    #[serde(default)]
    pub name: Option<ProfileNames>,
}

impl From<ProfileRequest> for ProfileQuery {
    fn from(req: ProfileRequest) -> Self {
        ProfileQuery {
            client_id: req.client_id,
            names: req.name.map(Vec::from).unwrap_or_default(),
        }
    }
}
