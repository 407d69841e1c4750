//! Runtime configuration from the environment.
//!
//! | variable                | default           |
//! |-------------------------|-------------------|
//! | `COMPENDIUM_DATA_DIR`   | `data/monsters`   |
//! | `COMPENDIUM_BIND`       | `127.0.0.1:3000`  |
//! | `COMPENDIUM_BASE_URL`   | `http://<bind>/`  |
//! | `COMPENDIUM_ASSETS_DIR` | `assets`          |

use std::env;
use std::path::PathBuf;

use crate::data::loader::DEFAULT_DATA_DIR;
use crate::export::ExportContext;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_ASSETS_DIR: &str = "assets";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bind_addr: String,
    /// Public URL of the list page; deep links and exports point here.
    pub base_url: String,
    pub assets_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            base_url: base_url_for(DEFAULT_BIND_ADDR),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
        }
    }
}

fn base_url_for(bind_addr: &str) -> String {
    format!("http://{bind_addr}/")
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr =
            non_empty_var("COMPENDIUM_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let base_url =
            non_empty_var("COMPENDIUM_BASE_URL").unwrap_or_else(|| base_url_for(&bind_addr));
        AppConfig {
            data_dir: non_empty_var("COMPENDIUM_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            bind_addr,
            base_url,
            assets_dir: non_empty_var("COMPENDIUM_ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR)),
        }
    }

    pub fn export_context(&self) -> ExportContext {
        ExportContext {
            base_url: self.base_url.clone(),
        }
    }
}
