//! Subcommand implementations. Each returns the text to print.

use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context};
use pulse_theme::{
    BrandConfig, BrandLoader, BrandRegistry, BrandSource, RemoteSource, ResolutionPolicy,
    ThemeMode,
};

pub struct ValidateReport {
    pub output: String,
    pub all_valid: bool,
}

pub fn validate(files: &[impl AsRef<Path>]) -> ValidateReport {
    let mut output = String::new();
    let mut all_valid = true;
    for file in files {
        let file = file.as_ref();
        match BrandConfig::from_file(file) {
            Ok(config) => {
                let _ = writeln!(
                    output,
                    "ok    {}: {} ({} {})",
                    file.display(),
                    config.id,
                    config.name,
                    config.version
                );
            }
            Err(e) => {
                all_valid = false;
                let _ = writeln!(output, "error {}: {}", file.display(), e);
            }
        }
    }
    ValidateReport { output, all_valid }
}

fn loader_for(dir: &Path) -> anyhow::Result<BrandLoader> {
    let mut registry = BrandRegistry::new();
    registry
        .add_dir(dir)
        .with_context(|| format!("loading brands from {}", dir.display()))?;
    Ok(BrandLoader::with_registry(registry))
}

pub fn list(dir: &Path) -> anyhow::Result<String> {
    let mut loader = loader_for(dir)?;
    let mut output = String::new();
    for brand in loader.load_all_brands() {
        let _ = writeln!(output, "{}\t{}\t{}", brand.id(), brand.name(), brand.version());
    }
    Ok(output)
}

pub fn resolve(
    dir: &Path,
    brand: Option<&str>,
    mode: ThemeMode,
    inherit: bool,
    json: bool,
) -> anyhow::Result<String> {
    let mut loader = loader_for(dir)?;
    let resolution = ResolutionPolicy::new()
        .inherit_defaults(inherit)
        .resolve(&mut loader, brand, mode);

    if let Some(requested) = brand.filter(|_| resolution.fell_back()) {
        eprintln!("brand '{}' is unavailable, showing defaults", requested);
    }

    if json {
        let mut rendered = serde_json::to_string_pretty(&resolution.tokens)?;
        rendered.push('\n');
        return Ok(rendered);
    }

    let width = resolution.tokens.names().map(str::len).max().unwrap_or(0);
    let mut output = String::new();
    for (name, value) in resolution.tokens.iter() {
        let _ = writeln!(output, "{:width$}  {}", name, value, width = width);
    }
    Ok(output)
}

pub fn export(dir: &Path, id: &str) -> anyhow::Result<String> {
    let loader = loader_for(dir)?;
    let mut json = loader
        .export_brand_config(id)
        .ok_or_else(|| anyhow!("brand '{}' is not in {}", id, dir.display()))?;
    json.push('\n');
    Ok(json)
}

pub fn import(dir: &Path, file: &Path) -> anyhow::Result<String> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let mut loader = BrandLoader::new();
    let id = loader
        .try_import_brand_config(&json)
        .with_context(|| format!("importing {}", file.display()))?;

    let target = dir.join(format!("{}.json", id));
    let exported = loader
        .export_brand_config(&id)
        .ok_or_else(|| anyhow!("brand '{}' vanished after import", id))?;
    std::fs::write(&target, exported + "\n")
        .with_context(|| format!("writing {}", target.display()))?;
    Ok(format!("imported '{}' to {}\n", id, target.display()))
}

pub async fn fetch(id: &str, url: &str, timeout: Duration) -> anyhow::Result<String> {
    let source = BrandSource::Remote(RemoteSource::http(timeout)?);
    let mut loader = BrandLoader::new().with_source(source);
    let brand = loader.try_load_brand_from_url(id, url).await?;
    let mut json = brand.config().to_json()?;
    json.push('\n');
    Ok(json)
}
