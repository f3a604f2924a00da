//! Model components and per-component variable sets.

use std::collections::HashMap;
use std::fmt;

use crate::error::AggregateError;

/// A model component writing its own monthly history files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    /// Atmosphere model (CAM).
    Atmosphere,
    /// Sea-ice model (CICE).
    Ice,
    /// Land model (CLM).
    Land,
}

impl Component {
    /// All components, in the order they are checked for data each step.
    pub const ALL: [Component; 3] = [Component::Atmosphere, Component::Ice, Component::Land];

    /// Short model name used in file names and screen output.
    pub fn short_name(self) -> &'static str {
        match self {
            Component::Atmosphere => "cam",
            Component::Ice => "cice",
            Component::Land => "clm",
        }
    }

    /// Coordinate variables that precede the read list in every variable set.
    pub fn leading_variables(self) -> &'static [&'static str] {
        match self {
            Component::Atmosphere => &["time", "lon", "lat", "lev"],
            Component::Ice | Component::Land => &["time"],
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A quantity computed from raw variables rather than read from file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedQuantity {
    /// Top-of-atmosphere and surface net energy flux.
    Energy,
}

impl DerivedQuantity {
    /// Name used to request the quantity in print and plot lists.
    pub fn name(self) -> &'static str {
        match self {
            DerivedQuantity::Energy => "energy",
        }
    }

    /// Looks up a quantity by its request name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "energy" => Some(DerivedQuantity::Energy),
            _ => None,
        }
    }

    /// Slots appended to the variable set for this quantity.
    pub fn slots(self) -> &'static [DerivedSlot] {
        match self {
            DerivedQuantity::Energy => &[DerivedSlot::ToaBalance, DerivedSlot::SurfaceBalance],
        }
    }
}

/// A named trailing slot holding a derived series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedSlot {
    /// `FSNT - FLNT`.
    ToaBalance,
    /// `FSNS - FLNS - LHFLX - SHFLX`.
    SurfaceBalance,
}

impl DerivedSlot {
    /// Slot name, usable with [`VariableSet::index_of`].
    pub fn name(self) -> &'static str {
        match self {
            DerivedSlot::ToaBalance => "toa_balance",
            DerivedSlot::SurfaceBalance => "surface_balance",
        }
    }
}

/// What a slot of a [`VariableSet`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Leading coordinate variable (not aggregated).
    Coordinate,
    /// Variable read from file and spatially averaged.
    Raw,
    /// Variable computed from raw variables.
    Derived(DerivedSlot),
}

/// Ordered, duplicate-free variable names of one component.
///
/// Slot order is: leading coordinates, then the read list, then derived
/// slots. Insertion order equals index order equals storage order; the set
/// is immutable once built.
#[derive(Debug, Clone)]
pub struct VariableSet {
    component: Component,
    names: Vec<String>,
    kinds: Vec<SlotKind>,
    derived: Vec<DerivedQuantity>,
    index: HashMap<String, usize>,
}

impl VariableSet {
    /// Builds the set for `component` from its read list and the derived
    /// quantities it requests.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::DuplicateVariable`] if a name repeats,
    /// including a read-list name that shadows a coordinate or derived slot.
    pub fn new<S: AsRef<str>>(
        component: Component,
        read: &[S],
        derived: &[DerivedQuantity],
    ) -> Result<Self, AggregateError> {
        let mut set = Self {
            component,
            names: Vec::new(),
            kinds: Vec::new(),
            derived: Vec::new(),
            index: HashMap::new(),
        };
        for name in component.leading_variables() {
            set.push(name, SlotKind::Coordinate)?;
        }
        for name in read {
            set.push(name.as_ref(), SlotKind::Raw)?;
        }
        for &quantity in derived {
            if set.derived.contains(&quantity) {
                continue;
            }
            set.derived.push(quantity);
            for &slot in quantity.slots() {
                set.push(slot.name(), SlotKind::Derived(slot))?;
            }
        }
        Ok(set)
    }

    fn push(&mut self, name: &str, kind: SlotKind) -> Result<(), AggregateError> {
        if self.index.contains_key(name) {
            return Err(AggregateError::DuplicateVariable {
                component: self.component,
                name: name.to_string(),
            });
        }
        self.index.insert(name.to_string(), self.names.len());
        self.names.push(name.to_string());
        self.kinds.push(kind);
        Ok(())
    }

    /// Component owning this set.
    pub fn component(&self) -> Component {
        self.component
    }

    /// Number of slots, coordinates included.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the set has no slots.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Slot names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Slot index of `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Kind of the slot at `index`.
    pub fn kind(&self, index: usize) -> Option<SlotKind> {
        self.kinds.get(index).copied()
    }

    /// Derived quantities requested for this component.
    pub fn derived(&self) -> &[DerivedQuantity] {
        &self.derived
    }

    /// Returns `true` if `quantity` was requested.
    pub fn requests(&self, quantity: DerivedQuantity) -> bool {
        self.derived.contains(&quantity)
    }

    /// Names of the raw (read-from-file) slots in order.
    pub fn raw_names(&self) -> impl Iterator<Item = &str> {
        self.slots_where(|kind| kind == SlotKind::Raw)
    }

    /// Names of all aggregated slots (raw, then derived) in order.
    pub fn tracked_names(&self) -> impl Iterator<Item = &str> {
        self.slots_where(|kind| kind != SlotKind::Coordinate)
    }

    fn slots_where(&self, keep: impl Fn(SlotKind) -> bool) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .zip(&self.kinds)
            .filter(move |(_, kind)| keep(**kind))
            .map(|(name, _)| name.as_str())
    }
}
