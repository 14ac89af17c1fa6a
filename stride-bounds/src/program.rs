use stride_core::{DynamicsType, Model};
use tracing::{debug, info};

use crate::{
    aggregate::{self, DecisionBounds, DecisionInit, DecisionLayout},
    condition::{PathCondition, Target},
    error::Error,
    option::{BoundsList, BoundsOption, InitialConditionsList, InitialConditionsOption},
    phase::Phase,
};

/// Owner of the decision-vector bounds and initial guess of a multiple-shooting problem.
///
/// State and control bounds (and initial guesses) are stored per phase and
/// may be replaced independently. Every successful update rebuilds the
/// flattened vectors from the stored values; a failed update changes nothing.
///
/// Until updated, bounds are `(-inf, +inf)` and the initial guess is zero.
#[derive(Debug, Clone)]
pub struct OptimalControlProgram {
    phases: Vec<Phase>,
    layout: DecisionLayout,
    x_bounds: BoundsList,
    u_bounds: BoundsList,
    x_init: InitialConditionsList,
    u_init: InitialConditionsList,
    v_bounds: DecisionBounds,
    v_init: DecisionInit,
}

impl OptimalControlProgram {
    /// Creates a program from its phases.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPhases`] if `phases` is empty.
    pub fn new(phases: Vec<Phase>) -> Result<Self, Error> {
        if phases.is_empty() {
            return Err(Error::NoPhases);
        }

        let x_bounds: BoundsList = phases.iter().map(|p| BoundsOption::unbounded(p.nx())).collect();
        let u_bounds: BoundsList = phases.iter().map(|p| BoundsOption::unbounded(p.nu())).collect();
        let x_init: InitialConditionsList = phases
            .iter()
            .map(|p| InitialConditionsOption::zeros(p.nx()))
            .collect();
        let u_init: InitialConditionsList = phases
            .iter()
            .map(|p| InitialConditionsOption::zeros(p.nu()))
            .collect();

        let layout = DecisionLayout::new(&phases);
        let v_bounds = aggregate::flatten_bounds(&phases, &x_bounds, &u_bounds);
        let v_init = aggregate::flatten_initial_conditions(&phases, &x_init, &u_init);

        info!(
            phases = phases.len(),
            n_variables = layout.len(),
            "created optimal control program"
        );

        Ok(Self {
            phases,
            layout,
            x_bounds,
            u_bounds,
            x_init,
            u_init,
            v_bounds,
            v_init,
        })
    }

    /// Creates a single-phase program.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhase`] if the phase parameters are invalid.
    pub fn single_phase(
        model: &impl Model,
        dynamics: DynamicsType,
        n_shooting: usize,
        final_time: f64,
    ) -> Result<Self, Error> {
        Self::new(vec![Phase::new(model, dynamics, n_shooting, final_time)?])
    }

    /// Replaces the state bounds, the control bounds, or both.
    ///
    /// The group that is not supplied keeps its current bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Provenance`] if a condition was not built from a
    /// [`BoundsOption`] or [`BoundsList`], or a shape, node-count, phase-count
    /// or ordering error if it does not fit the program. The program is left
    /// unchanged on error.
    pub fn update_bounds(
        &mut self,
        x_bounds: Option<PathCondition>,
        u_bounds: Option<PathCondition>,
    ) -> Result<(), Error> {
        let x_bounds = x_bounds
            .map(|c| c.into_bounds(Target::XBounds))
            .transpose()?;
        let u_bounds = u_bounds
            .map(|c| c.into_bounds(Target::UBounds))
            .transpose()?;

        if let Some(list) = &x_bounds {
            aggregate::check_bounds(list, Target::XBounds, &self.phases)?;
        }
        if let Some(list) = &u_bounds {
            aggregate::check_bounds(list, Target::UBounds, &self.phases)?;
        }

        let v_bounds = aggregate::flatten_bounds(
            &self.phases,
            x_bounds.as_ref().unwrap_or(&self.x_bounds),
            u_bounds.as_ref().unwrap_or(&self.u_bounds),
        );

        debug!(
            x = x_bounds.is_some(),
            u = u_bounds.is_some(),
            len = v_bounds.min.len(),
            "updated bounds"
        );

        if let Some(list) = x_bounds {
            self.x_bounds = list;
        }
        if let Some(list) = u_bounds {
            self.u_bounds = list;
        }
        self.v_bounds = v_bounds;
        Ok(())
    }

    /// Replaces the state initial guess, the control initial guess, or both.
    ///
    /// The group that is not supplied keeps its current guess.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Provenance`] if a condition was not built from an
    /// [`InitialConditionsOption`] or [`InitialConditionsList`], or a shape,
    /// node-count or phase-count error if it does not fit the program. The
    /// program is left unchanged on error.
    pub fn update_initial_guess(
        &mut self,
        x_init: Option<PathCondition>,
        u_init: Option<PathCondition>,
    ) -> Result<(), Error> {
        let x_init = x_init
            .map(|c| c.into_initial_conditions(Target::XInit))
            .transpose()?;
        let u_init = u_init
            .map(|c| c.into_initial_conditions(Target::UInit))
            .transpose()?;

        if let Some(list) = &x_init {
            aggregate::check_initial_conditions(list, Target::XInit, &self.phases)?;
        }
        if let Some(list) = &u_init {
            aggregate::check_initial_conditions(list, Target::UInit, &self.phases)?;
        }

        let v_init = aggregate::flatten_initial_conditions(
            &self.phases,
            x_init.as_ref().unwrap_or(&self.x_init),
            u_init.as_ref().unwrap_or(&self.u_init),
        );

        debug!(
            x = x_init.is_some(),
            u = u_init.is_some(),
            len = v_init.init.len(),
            "updated initial guess"
        );

        if let Some(list) = x_init {
            self.x_init = list;
        }
        if let Some(list) = u_init {
            self.u_init = list;
        }
        self.v_init = v_init;
        Ok(())
    }

    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    #[must_use]
    pub fn layout(&self) -> &DecisionLayout {
        &self.layout
    }

    /// Length of the decision vector.
    #[must_use]
    pub fn n_variables(&self) -> usize {
        self.layout.len()
    }

    /// Flattened bounds of the decision vector.
    #[must_use]
    pub fn v_bounds(&self) -> &DecisionBounds {
        &self.v_bounds
    }

    /// Flattened initial guess of the decision vector.
    #[must_use]
    pub fn v_init(&self) -> &DecisionInit {
        &self.v_init
    }

    #[must_use]
    pub fn x_bounds(&self) -> &BoundsList {
        &self.x_bounds
    }

    #[must_use]
    pub fn u_bounds(&self) -> &BoundsList {
        &self.u_bounds
    }

    #[must_use]
    pub fn x_init(&self) -> &InitialConditionsList {
        &self.x_init
    }

    #[must_use]
    pub fn u_init(&self) -> &InitialConditionsList {
        &self.u_init
    }
}
