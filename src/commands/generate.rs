//! Generate static files

use anyhow::Result;

use crate::cms::CmsClient;
use crate::generator::Generator;
use crate::Spacetraveling;

/// Generate the static site from the content repository
pub async fn run(app: &Spacetraveling) -> Result<()> {
    if app.config.repository.api_endpoint.is_empty() {
        anyhow::bail!("repository.api_endpoint is not configured; edit _config.yml");
    }

    let client = CmsClient::new(&app.config.repository)?;
    let generator = Generator::new(app.config.clone(), app.public_dir.clone(), client)?;
    generator.generate().await?;

    Ok(())
}
