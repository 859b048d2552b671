use serde::{Deserialize, Serialize};

use crate::runtime::FetchError;

#[derive(Default, Deserialize, Serialize, Clone, PartialEq, Debug)]
pub struct AppState {
  pub counter: i64,
  pub error: Option<FetchError>,
  pub users: Vec<User>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub id: u64,
  pub name: String,
  pub username: String,
  pub email: String,
}

impl AppState {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn users_json(&self) -> String {
    serde_json::to_string_pretty(&self.users).unwrap_or_default()
  }
}
