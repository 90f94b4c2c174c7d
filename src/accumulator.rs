//! Cross-round collection of validated declarations.
//!
//! One accumulator lives for one build invocation. It moves through
//! `Collecting -> Finalizing -> Done` exactly once; anything that would
//! move it backwards, or record into it after collection ended, is an
//! [`InvariantViolation`].

use std::collections::HashMap;
use std::hash::Hash;

use log::debug;
use strum::Display;

use crate::descriptor::DeclarationDescriptor;
use crate::error::InvariantViolation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AccumulatorState {
    Collecting,
    Finalizing,
    Done,
}

/// What [`RoundAccumulator::record`] did with a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Added,
    /// The identity was already present; the new descriptor replaced it in
    /// place.
    Replaced { structure_changed: bool },
}

#[derive(Debug)]
pub struct RoundAccumulator<H> {
    entries: Vec<DeclarationDescriptor<H>>,
    positions: HashMap<H, usize>,
    state: AccumulatorState,
}

impl<H> Default for RoundAccumulator<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
            state: AccumulatorState::Collecting,
        }
    }
}

impl<H: Clone + Eq + Hash> RoundAccumulator<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AccumulatorState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, handle: &H) -> Option<&DeclarationDescriptor<H>> {
        self.positions.get(handle).map(|&i| &self.entries[i])
    }

    /// Appends a descriptor, or replaces the one recorded earlier for the
    /// same handle. The later recording wins; the entry keeps its original
    /// position so generation order stays stable across rounds.
    pub fn record(
        &mut self,
        descriptor: DeclarationDescriptor<H>,
    ) -> Result<Recorded, InvariantViolation> {
        if self.state != AccumulatorState::Collecting {
            return Err(InvariantViolation::RecordAfterFinalize {
                name: descriptor.qualified_name().to_string(),
                state: self.state,
            });
        }

        match self.positions.get(descriptor.handle()) {
            Some(&index) => {
                let structure_changed = !self.entries[index].same_structure(&descriptor);
                debug!(
                    "Replacing {} (structure changed: {})",
                    descriptor.qualified_name(),
                    structure_changed
                );
                self.entries[index] = descriptor;
                Ok(Recorded::Replaced { structure_changed })
            }
            None => {
                debug!("Recording {}", descriptor.qualified_name());
                self.positions
                    .insert(descriptor.handle().clone(), self.entries.len());
                self.entries.push(descriptor);
                Ok(Recorded::Added)
            }
        }
    }

    /// Drops whatever was recorded for `handle`, as when the declaration
    /// fails when seen again. Later entries keep their relative order.
    pub fn forget(
        &mut self,
        handle: &H,
    ) -> Result<Option<DeclarationDescriptor<H>>, InvariantViolation> {
        if self.state != AccumulatorState::Collecting {
            return Err(InvariantViolation::ForgetAfterFinalize { state: self.state });
        }
        let Some(index) = self.positions.remove(handle) else {
            return Ok(None);
        };

        let removed = self.entries.remove(index);
        for position in self.positions.values_mut() {
            if *position > index {
                *position -= 1;
            }
        }
        debug!("Forgot {}", removed.qualified_name());
        Ok(Some(removed))
    }

    /// Current contents in insertion order. Does not clear anything.
    pub fn snapshot(&self) -> Vec<DeclarationDescriptor<H>> {
        self.entries.clone()
    }

    /// Ends collection and hands out the final snapshot. Succeeds once.
    pub fn begin_finalize(&mut self) -> Result<Vec<DeclarationDescriptor<H>>, InvariantViolation> {
        if self.state != AccumulatorState::Collecting {
            return Err(InvariantViolation::AlreadyFinalized { state: self.state });
        }
        self.state = AccumulatorState::Finalizing;
        debug!("Finalizing {} declarations", self.entries.len());
        Ok(self.snapshot())
    }

    /// Marks the snapshot as consumed by the code generator.
    pub fn finish(&mut self) -> Result<(), InvariantViolation> {
        if self.state != AccumulatorState::Finalizing {
            return Err(InvariantViolation::FinishWithoutFinalize { state: self.state });
        }
        self.state = AccumulatorState::Done;
        Ok(())
    }
}
