//! opkg control and list file parsing

use crate::error::PackageError;
use crate::package::PackageEntry;
use std::path::Path;

/// Fields recovered from a control file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlFields {
    pub name: String,
    pub version: String,
    pub depends: String,
    pub source: String,
    pub license: String,
    pub section: String,
    pub maintainer: String,
    pub architecture: String,
    pub installed_size: u64,
    pub description: Vec<String>,
}

fn strip(value: &str) -> &str {
    value.trim_matches(|c| c == ' ' || c == '\t')
}

/// Parse the text of a control file
///
/// `origin` is only used for error messages.
pub fn parse_control(text: &str, origin: &Path) -> Result<ControlFields, PackageError> {
    let mut fields = ControlFields::default();
    let mut in_description = false;

    for line in text.lines() {
        if in_description {
            if !line.trim().is_empty() {
                fields.description.push(line.to_string());
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = strip(value);

        match key {
            "Package" => fields.name = value.to_string(),
            "Version" => fields.version = value.to_string(),
            "Depends" => fields.depends = value.to_string(),
            "Source" => fields.source = value.to_string(),
            "License" => fields.license = value.to_string(),
            "Section" => fields.section = value.to_string(),
            "Maintainer" => fields.maintainer = value.to_string(),
            "Architecture" => fields.architecture = value.to_string(),
            "Installed-Size" => {
                fields.installed_size = if value.is_empty() {
                    0
                } else {
                    value
                        .parse()
                        .map_err(|_| PackageError::InvalidInstalledSize {
                            path: origin.to_path_buf(),
                            value: value.to_string(),
                        })?
                };
            }
            "Description" => {
                if !value.is_empty() {
                    fields.description.push(value.to_string());
                }
                in_description = true;
            }
            _ => {}
        }
    }

    Ok(fields)
}

/// Read a control file and its list file into a package entry
pub fn parse_package(control: &Path, list: &Path) -> Result<PackageEntry, PackageError> {
    if !control.is_file() {
        return Err(PackageError::MissingControl(control.to_path_buf()));
    }
    if !list.is_file() {
        return Err(PackageError::MissingList(list.to_path_buf()));
    }

    let control_text = read_text(control)?;
    let fields = parse_control(&control_text, control)?;
    let files = read_text(list)?.lines().map(str::to_string).collect();

    Ok(PackageEntry {
        name: fields.name,
        version: fields.version,
        depends: fields.depends,
        source: fields.source,
        license: fields.license,
        section: fields.section,
        maintainer: fields.maintainer,
        architecture: fields.architecture,
        installed_size: fields.installed_size,
        description: fields.description,
        files,
    })
}

fn read_text(path: &Path) -> Result<String, PackageError> {
    let bytes = std::fs::read(path).map_err(|source| PackageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
