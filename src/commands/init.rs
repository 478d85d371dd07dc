//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Spacetraveling;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("_config.yml already exists in {:?}", target_dir);
    }

    // Create default _config.yml
    let config_content = r#"# Site
title: spacetraveling
subtitle: ''
description: ''
author: ''
language: pt-br
timezone: ''

# URL
url: http://example.com
root: /
post_dir: post

# Directory
public_dir: public

# Content repository
repository:
  api_endpoint: https://your-repo.cdn.example.com/api/v2
  document_type: posts
  page_size: 20
  # access_token: your-token

# Revalidation windows (seconds)
revalidate:
  list: 3600
  post: 1800
"#;

    fs::write(&config_path, config_content)?;

    Ok(())
}

/// Run the init command with an existing app instance
pub fn run(app: &Spacetraveling) -> Result<()> {
    init_site(&app.base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        let config = SiteConfig::load(dir.path().join("_config.yml")).unwrap();
        assert_eq!(config.title, "spacetraveling");
        assert_eq!(config.repository.page_size, 20);
        assert_eq!(config.revalidate.list, 3600);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
