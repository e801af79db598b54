// src/session.rs
// Operator session, passed explicitly to everything that talks to the API.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    shop_id: Option<String>,
    api_url: String,
}

impl Session {
    pub fn new(api_url: impl Into<String>, shop_id: Option<String>) -> Self {
        Self {
            shop_id: shop_id.filter(|id| !id.trim().is_empty()),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_url.clone(), config.shop_id.clone())
    }

    pub fn login(&mut self, shop_id: impl Into<String>) {
        self.shop_id = Some(shop_id.into());
    }

    pub fn logout(&mut self) {
        self.shop_id = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.shop_id.is_some()
    }

    pub fn shop_id(&self) -> Result<&str> {
        self.shop_id.as_deref().ok_or(ClientError::MissingShopId)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}
