//! Named reduction channels shared with the BSP engine.
//!
//! The link rank computation registers four channels at start-up. The
//! adapter never reads or writes them; the registry exists so the engine
//! side has one place that fixes their names, types and persistence.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::AggregatorError;

/// Total vertex count, summed each superstep.
pub const SUM_AGG: &str = "SUM";
/// Smallest score seen, kept across supersteps.
pub const MIN_AGG: &str = "MIN";
/// Largest score seen, kept across supersteps.
pub const MAX_AGG: &str = "MAX";
/// Score mass held by dangling vertices, summed each superstep.
pub const DANGLING_AGG: &str = "DANGLING";

/// Commutative, associative reduction applied by a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    /// Addition.
    Sum,
    /// Minimum.
    Min,
    /// Maximum.
    Max,
}

/// A scalar held by a channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AggValue {
    /// 64-bit integer.
    Long(i64),
    /// 64-bit float.
    Double(f64),
}

impl AggValue {
    fn type_name(&self) -> &'static str {
        match self {
            AggValue::Long(_) => "long",
            AggValue::Double(_) => "double",
        }
    }
}

/// Static description of a channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatorSpec {
    /// Channel name.
    pub name: String,
    /// Reduction applied to contributions.
    pub reduction: Reduction,
    /// Identity value; also fixes the scalar type.
    pub initial: AggValue,
    /// Whether the value survives superstep boundaries.
    pub persistent: bool,
}

impl AggregatorSpec {
    fn identity(reduction: Reduction, sample: AggValue) -> AggValue {
        match (reduction, sample) {
            (Reduction::Sum, AggValue::Long(_)) => AggValue::Long(0),
            (Reduction::Min, AggValue::Long(_)) => AggValue::Long(i64::MAX),
            (Reduction::Max, AggValue::Long(_)) => AggValue::Long(i64::MIN),
            (Reduction::Sum, AggValue::Double(_)) => AggValue::Double(0.0),
            (Reduction::Min, AggValue::Double(_)) => AggValue::Double(f64::MAX),
            (Reduction::Max, AggValue::Double(_)) => AggValue::Double(f64::MIN),
        }
    }

    fn reduce(&self, acc: AggValue, value: AggValue) -> Result<AggValue, AggregatorError> {
        let reduced = match (acc, value) {
            (AggValue::Long(a), AggValue::Long(b)) => AggValue::Long(match self.reduction {
                Reduction::Sum => a.wrapping_add(b),
                Reduction::Min => a.min(b),
                Reduction::Max => a.max(b),
            }),
            (AggValue::Double(a), AggValue::Double(b)) => AggValue::Double(match self.reduction {
                Reduction::Sum => a + b,
                Reduction::Min => a.min(b),
                Reduction::Max => a.max(b),
            }),
            _ => {
                return Err(AggregatorError::TypeMismatch {
                    name: self.name.clone(),
                    expected: acc.type_name(),
                })
            }
        };
        Ok(reduced)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    spec: AggregatorSpec,
    value: AggValue,
}

/// Registered channels and their current values.
#[derive(Debug, Clone, Default)]
pub struct AggregatorRegistry {
    slots: BTreeMap<String, Slot>,
}

impl AggregatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The four channels used by link rank.
    pub fn link_rank() -> Self {
        let mut registry = Self::new();
        let channels = [
            (SUM_AGG, Reduction::Sum, AggValue::Long(0), false),
            (MIN_AGG, Reduction::Min, AggValue::Double(0.0), true),
            (MAX_AGG, Reduction::Max, AggValue::Double(0.0), true),
            (DANGLING_AGG, Reduction::Sum, AggValue::Double(0.0), false),
        ];
        for (name, reduction, sample, persistent) in channels {
            registry.slots.insert(
                name.to_owned(),
                Slot::new(name, reduction, sample, persistent),
            );
        }
        registry
    }

    /// Registers a channel that resets at every superstep.
    pub fn register(
        &mut self,
        name: &str,
        reduction: Reduction,
        sample: AggValue,
    ) -> Result<(), AggregatorError> {
        self.insert(Slot::new(name, reduction, sample, false))
    }

    /// Registers a channel whose value survives superstep boundaries.
    pub fn register_persistent(
        &mut self,
        name: &str,
        reduction: Reduction,
        sample: AggValue,
    ) -> Result<(), AggregatorError> {
        self.insert(Slot::new(name, reduction, sample, true))
    }

    fn insert(&mut self, slot: Slot) -> Result<(), AggregatorError> {
        if self.slots.contains_key(&slot.spec.name) {
            return Err(AggregatorError::Duplicate(slot.spec.name));
        }
        self.slots.insert(slot.spec.name.clone(), slot);
        Ok(())
    }

    /// Folds `value` into the named channel.
    pub fn aggregate(&mut self, name: &str, value: AggValue) -> Result<(), AggregatorError> {
        let slot = self
            .slots
            .get_mut(name)
            .ok_or_else(|| AggregatorError::NotFound(name.to_owned()))?;
        slot.value = slot.spec.reduce(slot.value, value)?;
        Ok(())
    }

    /// Current value of a channel.
    pub fn value(&self, name: &str) -> Option<AggValue> {
        self.slots.get(name).map(|slot| slot.value)
    }

    /// Resets non-persistent channels to their identity.
    pub fn start_superstep(&mut self) {
        for slot in self.slots.values_mut() {
            if !slot.spec.persistent {
                slot.value = slot.spec.initial;
            }
        }
    }

    /// Channel descriptions in name order.
    pub fn specs(&self) -> impl Iterator<Item = &AggregatorSpec> + '_ {
        self.slots.values().map(|slot| &slot.spec)
    }
}

impl Slot {
    fn new(name: &str, reduction: Reduction, sample: AggValue, persistent: bool) -> Self {
        let initial = AggregatorSpec::identity(reduction, sample);
        Self {
            spec: AggregatorSpec {
                name: name.to_owned(),
                reduction,
                initial,
                persistent,
            },
            value: initial,
        }
    }
}
