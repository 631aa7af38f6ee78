//! Fetching and registering the fonts a theme table declares.

use super::classify::classify;
use super::registry::{FontFaces, FontFamily, FontRegistry};
use crate::error::StyleError;
use crate::fetch::{Credential, Fetcher, Location};
use crate::theme::{FontDeclaration, ThemeTable};

/// What provisioning did, for logging and display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Families registered, in the order they were declared.
    pub registered: Vec<String>,
    /// Files that could not be fetched, with the reason.
    pub failed: Vec<(String, String)>,
}

/// Fetches every font file declared in `themes` and registers each family.
///
/// A file that cannot be fetched is logged and left out; the family is
/// still registered with its remaining faces. When several files land in
/// the same slot, the later one wins.
///
/// # Errors
///
/// - [`StyleError::FontProvisioning`] if none of a family's files could be
///   fetched
/// - [`StyleError::Font`] if the registry rejects a family
pub fn provision(
    themes: &ThemeTable,
    fetcher: &dyn Fetcher,
    registry: &dyn FontRegistry,
    credential: Option<&Credential>,
) -> Result<ProvisionReport, StyleError> {
    let mut report = ProvisionReport::default();

    for (theme, spec) in themes.iter() {
        for declaration in &spec.fonts {
            if declaration.files.is_empty() {
                tracing::debug!(theme, family = %declaration.family, "Font family declares no files, skipping");
                continue;
            }

            let faces = fetch_faces(declaration, fetcher, credential, &mut report.failed);
            if faces.is_empty() {
                return Err(StyleError::FontProvisioning {
                    family: declaration.family.clone(),
                    message: format!(
                        "none of the {} declared files could be fetched",
                        declaration.files.len()
                    ),
                });
            }

            tracing::info!(
                theme,
                family = %declaration.family,
                faces = faces.len(),
                "Registering font family"
            );
            registry.register(FontFamily::new(declaration.family.clone(), faces))?;
            report.registered.push(declaration.family.clone());
        }
    }

    Ok(report)
}

fn fetch_faces(
    declaration: &FontDeclaration,
    fetcher: &dyn Fetcher,
    credential: Option<&Credential>,
    failed: &mut Vec<(String, String)>,
) -> FontFaces {
    let mut faces = FontFaces::new();

    for file in &declaration.files {
        let fetched = Location::parse(file)
            .and_then(|location| {
                let style = classify(&location.file_name());
                fetcher
                    .fetch_binary(&location, credential)
                    .map(|fetched| (style, fetched))
            });

        match fetched {
            Ok((style, fetched)) => {
                if faces.set(style, fetched).is_some() {
                    tracing::debug!(
                        family = %declaration.family,
                        %style,
                        file = %file,
                        "Replacing earlier font file for the same style"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    family = %declaration.family,
                    file = %file,
                    error = %e,
                    "Failed to fetch font file {}: {}",
                    file,
                    e
                );
                failed.push((file.clone(), e.to_string()));
            }
        }
    }

    faces
}
