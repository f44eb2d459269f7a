//! Rendering the BIRD configuration from a template.
//!
//! The template is an ordinary BIRD config with a single placeholder inside
//! the export filter of the monitored peer; the placeholder is replaced by
//! the `bgp_community.add` statements for the current move.

use std::path::Path;

use anyhow::Context;

/// Text replaced in the template.
pub const PLACEHOLDER: &str = "###COMMUNITY###";

/// Permissions of the rendered config file.
#[cfg(unix)]
pub const CONFIG_MODE: u32 = 0o640;

/// Filter statements adding both protocol communities, position first.
pub fn community_block(marker_as: u16, counter: u16, position: u16) -> String {
    format!(
        "\nbgp_community.add(({marker_as},{position}));\nbgp_community.add(({marker_as},{counter}));\n"
    )
}

/// Replaces the first placeholder in `template` with `block`.
pub fn render(template: &str, block: &str) -> anyhow::Result<String> {
    if !template.contains(PLACEHOLDER) {
        anyhow::bail!("template has no {PLACEHOLDER} placeholder");
    }
    Ok(template.replacen(PLACEHOLDER, block, 1))
}

/// Reads `template_path`, substitutes `block` and writes the result to
/// `config_path`.
pub async fn render_file(template_path: &Path, config_path: &Path, block: &str) -> anyhow::Result<()> {
    let template = tokio::fs::read_to_string(template_path)
        .await
        .with_context(|| format!("reading template {}", template_path.display()))?;
    let rendered = render(&template, block)
        .with_context(|| format!("rendering template {}", template_path.display()))?;
    tokio::fs::write(config_path, rendered)
        .await
        .with_context(|| format!("writing config {}", config_path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(config_path, std::fs::Permissions::from_mode(CONFIG_MODE))
            .await
            .with_context(|| format!("setting permissions on {}", config_path.display()))?;
    }
    log::debug!("rendered {} into {}", template_path.display(), config_path.display());
    Ok(())
}
