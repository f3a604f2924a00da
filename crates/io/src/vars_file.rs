//! Variable-list file parsing.
//!
//! Each non-blank line reads `<component> <list> <name>...`, where the
//! component is one of `cam`/`atm`/`atmosphere`, `cice`/`ice`,
//! `clm`/`lnd`/`land` and the list is `read`, `print` or `plot`. Text after
//! `#` is ignored. Repeated lines append to the same list.
//!
//! ```text
//! # atmosphere
//! cam read  TS FSNT FLNT FSNS FLNS LHFLX SHFLX
//! cam print TS energy
//! cam plot  TS energy
//! cice read hi
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use drift_aggregate::{Component, VariableLists};

use crate::error::IoError;

/// Parses a variable-list file's text. `path` is used only in errors.
///
/// # Errors
///
/// Returns [`IoError::Parse`] naming the line of an unknown component or list
/// key, or a line with fewer than two words.
pub fn parse_variable_lists(
    text: &str,
    path: &Path,
) -> Result<BTreeMap<Component, VariableLists>, IoError> {
    let mut out: BTreeMap<Component, VariableLists> = BTreeMap::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default();
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            continue;
        };
        let parse_err = |reason: String| IoError::Parse {
            path: path.to_path_buf(),
            line: i + 1,
            reason,
        };
        let component = component_key(first)
            .ok_or_else(|| parse_err(format!("unknown component '{first}'")))?;
        let list_key = words
            .next()
            .ok_or_else(|| parse_err("expected read, print or plot after component".into()))?;
        let lists = out.entry(component).or_default();
        let list = match list_key {
            "read" => &mut lists.read,
            "print" => &mut lists.print,
            "plot" => &mut lists.plot,
            other => return Err(parse_err(format!("unknown list '{other}'"))),
        };
        list.extend(words.map(str::to_string));
    }
    Ok(out)
}

/// Reads and parses the variable-list file at `path`.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist, otherwise the
/// errors of [`parse_variable_lists`].
pub fn read_variable_lists(path: &Path) -> Result<BTreeMap<Component, VariableLists>, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| IoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_variable_lists(&text, path)
}

fn component_key(key: &str) -> Option<Component> {
    match key.to_ascii_lowercase().as_str() {
        "cam" | "atm" | "atmosphere" => Some(Component::Atmosphere),
        "cice" | "ice" => Some(Component::Ice),
        "clm" | "lnd" | "land" => Some(Component::Land),
        _ => None,
    }
}
