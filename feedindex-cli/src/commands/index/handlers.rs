//! Index command handlers.

use feedindex::index::AddRemovePackages;
use feedindex::{IndexDocument, PackageCategory, PackageIdentity, PackageVersion};

use super::Outcome;
use crate::error::CliError;
use crate::output::Output;

fn parse_version(value: &str) -> Result<PackageVersion, CliError> {
    PackageVersion::parse(value).map_err(|source| CliError::InvalidVersion {
        value: value.to_string(),
        source,
    })
}

fn parse_identities(id: &str, versions: &[String]) -> Result<Vec<PackageIdentity>, CliError> {
    versions
        .iter()
        .map(|v| Ok(PackageIdentity::new(id, parse_version(v)?)))
        .collect()
}

fn label(category: PackageCategory) -> &'static str {
    match category {
        PackageCategory::Packages => "package",
        PackageCategory::Symbols => "symbols package",
    }
}

pub async fn init(doc: &IndexDocument, out: &dyn Output) -> Result<Outcome, CliError> {
    let sets = doc.load().await?;
    if sets.is_empty() {
        doc.create(&sets).await?;
        if doc.is_persisted().await? {
            out.println(&format!("Initialized empty index at {}", doc.location()));
        } else {
            out.println(&format!(
                "Index at {} is empty and was not kept (persist_when_empty = false)",
                doc.location()
            ));
        }
    } else {
        out.println(&format!(
            "Index at {} already lists {} packages and {} symbols packages",
            doc.location(),
            sets.packages.len(),
            sets.symbols.len()
        ));
    }
    Ok(Outcome::Success)
}

pub async fn list(
    doc: &IndexDocument,
    category: PackageCategory,
    out: &dyn Output,
) -> Result<Outcome, CliError> {
    let sets = doc.load().await?;
    let set = sets.get(category);

    for id in set.ids() {
        out.println(id);
        for version in set.versions(id).iter().rev() {
            out.indented(&version.to_string());
        }
    }
    Ok(Outcome::Success)
}

pub async fn versions(
    doc: &IndexDocument,
    id: &str,
    category: PackageCategory,
    out: &dyn Output,
) -> Result<Outcome, CliError> {
    let versions = match category {
        PackageCategory::Packages => doc.get_package_versions(id).await?,
        PackageCategory::Symbols => doc.get_symbols_package_versions(id).await?,
    };

    if versions.is_empty() {
        out.println(&format!("No {} named {}", label(category), id));
        return Ok(Outcome::NotFound);
    }
    for version in versions {
        out.println(&version.to_string());
    }
    Ok(Outcome::Success)
}

pub async fn exists(
    doc: &IndexDocument,
    id: &str,
    version: &str,
    category: PackageCategory,
    out: &dyn Output,
) -> Result<Outcome, CliError> {
    let version = parse_version(version)?;
    let found = match category {
        PackageCategory::Packages => doc.exists(id, &version).await?,
        PackageCategory::Symbols => doc.symbols_exists(id, &version).await?,
    };

    if found {
        out.println(&format!("{} {} is listed", id, version));
        Ok(Outcome::Success)
    } else {
        out.println(&format!("{} {} is not listed", id, version));
        Ok(Outcome::NotFound)
    }
}

pub async fn add(
    doc: &IndexDocument,
    id: &str,
    versions: &[String],
    category: PackageCategory,
    out: &dyn Output,
) -> Result<Outcome, CliError> {
    let identities = parse_identities(id, versions)?;
    let count = identities.len();
    doc.add(category, identities).await?;

    out.println(&format!("Added {} {} version(s) of {}", count, label(category), id));
    Ok(Outcome::Success)
}

pub async fn remove(
    doc: &IndexDocument,
    id: &str,
    versions: &[String],
    category: PackageCategory,
    out: &dyn Output,
) -> Result<Outcome, CliError> {
    let identities = parse_identities(id, versions)?;
    if doc.remove(category, identities).await? {
        out.println(&format!("Removed {} {} from the index", label(category), id));
        Ok(Outcome::Success)
    } else {
        out.println(&format!("Nothing to remove for {}", id));
        Ok(Outcome::NotFound)
    }
}
