//! Validated read/print/plot lists for the active components.

use std::collections::BTreeMap;

use crate::error::AggregateError;
use crate::variables::{Component, DerivedQuantity, VariableSet};

/// Variable lists of one component as written in the variable-list file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableLists {
    /// Variables read from file and averaged.
    pub read: Vec<String>,
    /// Variables shown on screen.
    pub print: Vec<String>,
    /// Variables plotted at the end of the run.
    pub plot: Vec<String>,
}

impl VariableLists {
    /// Derived quantities named in any of the three lists.
    fn requested_quantities(&self) -> Vec<DerivedQuantity> {
        let mut out = Vec::new();
        for name in self.read.iter().chain(&self.print).chain(&self.plot) {
            if let Some(q) = DerivedQuantity::from_name(name)
                && !out.contains(&q)
            {
                out.push(q);
            }
        }
        out
    }
}

/// One activated component: its variable set plus its print and plot lists.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    set: VariableSet,
    print: Vec<String>,
    plot: Vec<String>,
}

impl RegistryEntry {
    /// The component.
    pub fn component(&self) -> Component {
        self.set.component()
    }

    /// The component's variable set.
    pub fn set(&self) -> &VariableSet {
        &self.set
    }

    /// Print list as configured (may contain `energy`).
    pub fn print(&self) -> &[String] {
        &self.print
    }

    /// Plot list as configured (may contain `energy`).
    pub fn plot(&self) -> &[String] {
        &self.plot
    }

    /// Print list with each derived quantity expanded to its slot names.
    pub fn print_columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for name in &self.print {
            match DerivedQuantity::from_name(name) {
                Some(q) => out.extend(q.slots().iter().map(|s| s.name())),
                None => out.push(name.as_str()),
            }
        }
        out
    }
}

/// Per-component variable configuration, validated once before any step.
#[derive(Debug, Clone)]
pub struct VariableRegistry {
    entries: Vec<RegistryEntry>,
}

impl VariableRegistry {
    /// Builds the registry for the `active` components.
    ///
    /// Components are stored in [`Component::ALL`] order regardless of the
    /// order of `active`. A component without an entry in `lists` reads
    /// nothing beyond its coordinates.
    ///
    /// # Errors
    ///
    /// - [`AggregateError::NoComponents`] if `active` is empty.
    /// - [`AggregateError::DuplicateVariable`] if a read list repeats a name.
    /// - [`AggregateError::UnknownVariable`] if a print or plot name is not in
    ///   the read list and is not a derived quantity.
    pub fn build(
        active: &[Component],
        lists: &BTreeMap<Component, VariableLists>,
    ) -> Result<Self, AggregateError> {
        if active.is_empty() {
            return Err(AggregateError::NoComponents);
        }
        let empty = VariableLists::default();
        let mut entries = Vec::new();
        for component in Component::ALL {
            if !active.contains(&component) {
                continue;
            }
            let lists = lists.get(&component).unwrap_or(&empty);
            let read: Vec<&str> = lists
                .read
                .iter()
                .map(String::as_str)
                .filter(|name| DerivedQuantity::from_name(name).is_none())
                .collect();
            let set = VariableSet::new(component, &read[..], &lists.requested_quantities())?;
            check_listed(component, "print", &lists.print, &read)?;
            check_listed(component, "plot", &lists.plot, &read)?;
            entries.push(RegistryEntry {
                set,
                print: lists.print.clone(),
                plot: lists.plot.clone(),
            });
        }
        Ok(Self { entries })
    }

    /// Entries in check order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Entry for `component`, if active.
    pub fn entry(&self, component: Component) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.component() == component)
    }

    /// Active components in check order.
    pub fn components(&self) -> Vec<Component> {
        self.entries.iter().map(RegistryEntry::component).collect()
    }
}

fn check_listed(
    component: Component,
    list: &'static str,
    names: &[String],
    read: &[&str],
) -> Result<(), AggregateError> {
    for name in names {
        if DerivedQuantity::from_name(name).is_none() && !read.contains(&name.as_str()) {
            return Err(AggregateError::UnknownVariable {
                component,
                list,
                name: name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(read: &[&str], print: &[&str], plot: &[&str]) -> VariableLists {
        let own = |v: &[&str]| -> Vec<String> { v.iter().map(|s| s.to_string()).collect() };
        VariableLists {
            read: own(read),
            print: own(print),
            plot: own(plot),
        }
    }

    #[test]
    fn no_components() {
        let err = VariableRegistry::build(&[], &BTreeMap::new()).unwrap_err();
        assert_eq!(err, AggregateError::NoComponents);
    }

    #[test]
    fn print_name_must_be_read() {
        let mut map = BTreeMap::new();
        map.insert(Component::Ice, lists(&["hi"], &["hs"], &[]));
        let err = VariableRegistry::build(&[Component::Ice], &map).unwrap_err();
        assert_eq!(
            err,
            AggregateError::UnknownVariable {
                component: Component::Ice,
                list: "print",
                name: "hs".to_string(),
            }
        );
    }

    #[test]
    fn plot_name_must_be_read() {
        let mut map = BTreeMap::new();
        map.insert(Component::Land, lists(&["TSA"], &["TSA"], &["FSH"]));
        let err = VariableRegistry::build(&[Component::Land], &map).unwrap_err();
        assert!(matches!(
            err,
            AggregateError::UnknownVariable { list: "plot", .. }
        ));
    }

    #[test]
    fn energy_adds_derived_slots() {
        let mut map = BTreeMap::new();
        map.insert(
            Component::Atmosphere,
            lists(&["TS"], &["TS", "energy"], &["energy"]),
        );
        let reg = VariableRegistry::build(&[Component::Atmosphere], &map).unwrap();
        let entry = reg.entry(Component::Atmosphere).unwrap();
        assert!(entry.set().requests(DerivedQuantity::Energy));
        assert_eq!(
            entry.print_columns(),
            vec!["TS", "toa_balance", "surface_balance"]
        );
    }

    #[test]
    fn energy_in_read_list_is_not_a_raw_variable() {
        let mut map = BTreeMap::new();
        map.insert(Component::Atmosphere, lists(&["energy", "TS"], &[], &[]));
        let reg = VariableRegistry::build(&[Component::Atmosphere], &map).unwrap();
        let set = reg.entries()[0].set();
        assert_eq!(set.raw_names().collect::<Vec<_>>(), vec!["TS"]);
        assert!(set.requests(DerivedQuantity::Energy));
    }

    #[test]
    fn entries_follow_check_order() {
        let map = BTreeMap::new();
        let reg =
            VariableRegistry::build(&[Component::Land, Component::Atmosphere], &map).unwrap();
        assert_eq!(
            reg.components(),
            vec![Component::Atmosphere, Component::Land]
        );
        assert!(reg.entry(Component::Ice).is_none());
    }

    #[test]
    fn duplicate_read_name() {
        let mut map = BTreeMap::new();
        map.insert(Component::Atmosphere, lists(&["TS", "TS"], &[], &[]));
        assert!(matches!(
            VariableRegistry::build(&[Component::Atmosphere], &map),
            Err(AggregateError::DuplicateVariable { .. })
        ));
    }
}
