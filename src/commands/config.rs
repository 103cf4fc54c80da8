//! Config command implementation
//!
//! Edits the `[murmur-nexus]` section of the local or global `.murmurrc`.
//! Without `--global`, `set` and `unset` use the local file when it exists.

use std::path::Path;

use super::CommandContext;
use crate::cli::{ConfigArgs, ConfigSubcommand};
use crate::config::registry::{
    DEFAULT_EXTRA_INDEX_URL, DEFAULT_INDEX_URL, EXTRA_INDEX_URL_KEY, INDEX_URL_KEY,
    PRIVATE_SECTION,
};
use crate::config::{RcFile, RcLocations};
use crate::error::Result;

/// Run config command
pub fn run(ctx: &CommandContext, args: ConfigArgs) -> Result<()> {
    let locations = &ctx.locations;
    let output = match args.command {
        ConfigSubcommand::Set { key, value, global } => {
            let message = set(locations, &key, &value, global)?;
            super::success(&message);
            return Ok(());
        }
        ConfigSubcommand::Get { key, global } => get(locations, &key, global)?,
        ConfigSubcommand::List { global } => list(locations, global)?,
        ConfigSubcommand::Unset { key, global } => unset(locations, &key, global)?,
        ConfigSubcommand::Init { global } => init(locations, global)?,
    };
    println!("{output}");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Local,
    Global,
}

impl Scope {
    fn name(self) -> &'static str {
        match self {
            Scope::Local => "local",
            Scope::Global => "global",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Scope::Local => "Local",
            Scope::Global => "Global",
        }
    }

    fn path(self, locations: &RcLocations) -> &Path {
        match self {
            Scope::Local => &locations.local,
            Scope::Global => &locations.global,
        }
    }
}

/// Local when it exists and `--global` was not given
fn write_scope(locations: &RcLocations, global: bool) -> Scope {
    if locations.local.exists() && !global {
        Scope::Local
    } else {
        Scope::Global
    }
}

pub fn set(locations: &RcLocations, key: &str, value: &str, global: bool) -> Result<String> {
    let scope = write_scope(locations, global);
    let path = scope.path(locations);
    let mut doc = RcFile::load(path)?;
    doc.section_mut_or_insert(PRIVATE_SECTION).set(key, value);
    doc.save(path)?;
    Ok(format!("Set {key}={value} in {} .murmurrc", scope.name()))
}

pub fn get(locations: &RcLocations, key: &str, global: bool) -> Result<String> {
    let scopes: &[Scope] = if global {
        &[Scope::Global]
    } else {
        &[Scope::Local, Scope::Global]
    };
    for scope in scopes {
        let doc = RcFile::load(scope.path(locations))?;
        if let Some(value) = doc.get(PRIVATE_SECTION, key) {
            return Ok(format!("{key}: {value} ({})", scope.name()));
        }
    }
    Ok(format!(
        "Configuration key '{key}' not found in local or global .murmurrc"
    ))
}

pub fn list(locations: &RcLocations, global: bool) -> Result<String> {
    let scopes: &[Scope] = if global {
        &[Scope::Global]
    } else {
        &[Scope::Global, Scope::Local]
    };

    let mut blocks = Vec::new();
    for scope in scopes {
        let path = scope.path(locations);
        let doc = RcFile::load(path)?;
        let Some(section) = doc.section(PRIVATE_SECTION).filter(|s| !s.is_empty()) else {
            continue;
        };
        let mut block = format!(
            "{} settings (.murmurrc):\nPath: {}",
            scope.title(),
            path.display()
        );
        for (key, value) in section.entries() {
            block.push_str(&format!("\n{key}: {value}"));
        }
        blocks.push(block);
    }

    if blocks.is_empty() {
        Ok("No configuration values found".to_string())
    } else {
        Ok(blocks.join("\n\n"))
    }
}

pub fn unset(locations: &RcLocations, key: &str, global: bool) -> Result<String> {
    let scope = write_scope(locations, global);
    let path = scope.path(locations);
    if path.exists() {
        let mut doc = RcFile::load(path)?;
        if doc.section_mut_or_insert(PRIVATE_SECTION).remove(key) {
            doc.save(path)?;
            return Ok(format!("Removed {key} from {} .murmurrc", scope.name()));
        }
    }
    Ok(format!(
        "Configuration key '{key}' not found in {} .murmurrc",
        scope.name()
    ))
}

pub fn init(locations: &RcLocations, global: bool) -> Result<String> {
    let (scope, other) = if global {
        (Scope::Global, Scope::Local)
    } else {
        (Scope::Local, Scope::Global)
    };
    let path = scope.path(locations);

    let mut message = if path.exists() {
        format!("{} .murmurrc already exists at: {}", scope.title(), path.display())
    } else {
        let mut doc = RcFile::default();
        let section = doc.section_mut_or_insert(PRIVATE_SECTION);
        section.set(INDEX_URL_KEY, DEFAULT_INDEX_URL);
        section.set(EXTRA_INDEX_URL_KEY, DEFAULT_EXTRA_INDEX_URL);
        doc.save(path)?;
        format!("Created {} .murmurrc at: {}", scope.name(), path.display())
    };

    if !other.path(locations).exists() {
        let flag = if global { "" } else { " --global" };
        message.push_str(&format!(
            "\nTo create a {} config instead, run: mur config init{flag}",
            other.name()
        ));
    }
    Ok(message)
}
