//! Multi-step intake form state.
//!
//! Controllers are plain values: every transition returns a new controller and leaves the
//! receiver untouched, so a rejected step request needs no rollback.

mod changes;
mod visibility;

pub use changes::FieldChange;
pub use visibility::{FieldGroup, FieldRule, VisibilityPolicy};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::ServiceSelection;
use super::pricing::{Quote, QuoteEngine};

pub const SELECTION_STEP: u8 = 1;
pub const DETAILS_STEP: u8 = 2;
pub const REVIEW_STEP: u8 = 3;
pub const MIN_FORM_STEPS: u8 = 3;

/// Number of ordered steps in the form; never fewer than [`MIN_FORM_STEPS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLayout {
    total_steps: u8,
}

impl Default for FormLayout {
    fn default() -> Self {
        Self {
            total_steps: MIN_FORM_STEPS,
        }
    }
}

impl FormLayout {
    pub fn with_steps(total_steps: u8) -> Self {
        Self {
            total_steps: total_steps.max(MIN_FORM_STEPS),
        }
    }

    pub fn total_steps(self) -> u8 {
        self.total_steps
    }

    pub fn final_step(self) -> u8 {
        self.total_steps
    }

    pub fn contains(self, step: u8) -> bool {
        (SELECTION_STEP..=self.total_steps).contains(&step)
    }
}

/// Non-fatal signal explaining why a transition did not happen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionRejected {
    #[error("required fields missing: {}", join_fields(.0))]
    MissingFields(Vec<FieldGroup>),
    #[error("step {requested} is outside 1..={total}")]
    StepOutOfRange { requested: u8, total: u8 },
    #[error("submission is only possible from step {final_step} (currently on {current})")]
    NotOnFinalStep { current: u8, final_step: u8 },
}

impl TransitionRejected {
    pub fn missing_fields(&self) -> &[FieldGroup] {
        match self {
            TransitionRejected::MissingFields(fields) => fields,
            _ => &[],
        }
    }
}

fn join_fields(fields: &[FieldGroup]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of applying a field change: the next controller plus the recomputed quote.
#[derive(Debug, Clone)]
pub struct FieldUpdate {
    pub form: FormStateController,
    pub quote: Quote,
}

/// Result of a step transition. `review_quote` is freshly computed whenever the review step
/// is entered.
#[derive(Debug, Clone)]
pub struct StepChange {
    pub form: FormStateController,
    pub review_quote: Option<Quote>,
}

/// Finalized selection and quote handed to persistence and notification collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPacket {
    pub selection: ServiceSelection,
    pub quote: Quote,
}

#[derive(Debug, Clone)]
pub struct FormStateController {
    current_step: u8,
    selection: ServiceSelection,
    visibility: VisibilityPolicy,
    layout: FormLayout,
    engine: QuoteEngine,
}

impl FormStateController {
    pub fn new(engine: QuoteEngine, layout: FormLayout) -> Self {
        Self::with_selection(engine, layout, ServiceSelection::default())
    }

    /// Resume a form from an existing selection, starting at step 1.
    pub fn with_selection(
        engine: QuoteEngine,
        layout: FormLayout,
        selection: ServiceSelection,
    ) -> Self {
        let visibility = VisibilityPolicy::for_service(selection.service_type);
        Self {
            current_step: SELECTION_STEP,
            selection,
            visibility,
            layout,
            engine,
        }
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn layout(&self) -> FormLayout {
        self.layout
    }

    pub fn selection(&self) -> &ServiceSelection {
        &self.selection
    }

    pub fn visibility(&self) -> &VisibilityPolicy {
        &self.visibility
    }

    /// Always recomputed from the current selection; quotes are never cached.
    pub fn quote(&self) -> Quote {
        self.engine.compute_quote(&self.selection)
    }

    pub fn missing_fields(&self) -> Vec<FieldGroup> {
        self.visibility.missing_fields(&self.selection)
    }

    pub fn apply(&self, change: FieldChange) -> FieldUpdate {
        let mut form = self.clone();
        let field = change.field_name();
        let reset = matches!(change, FieldChange::Reset);

        change.apply_to(&mut form.selection);
        form.visibility = VisibilityPolicy::for_service(form.selection.service_type);
        if reset {
            form.current_step = SELECTION_STEP;
        }

        debug!(field, step = form.current_step, "selection updated");
        let quote = form.quote();
        FieldUpdate { form, quote }
    }

    /// Guarded move to `requested`; every visible required group must hold a value.
    pub fn advance(&self, requested: u8) -> Result<StepChange, TransitionRejected> {
        if !self.layout.contains(requested) {
            return Err(TransitionRejected::StepOutOfRange {
                requested,
                total: self.layout.total_steps(),
            });
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            debug!(
                from = self.current_step,
                requested,
                missing = %join_fields(&missing),
                "step advance rejected"
            );
            return Err(TransitionRejected::MissingFields(missing));
        }

        debug!(from = self.current_step, to = requested, "step advanced");
        Ok(self.move_to(requested))
    }

    /// Unconditional move backwards (or anywhere); out-of-range requests are clamped.
    pub fn retreat(&self, requested: u8) -> StepChange {
        let target = requested.clamp(SELECTION_STEP, self.layout.total_steps());
        debug!(from = self.current_step, to = target, "step retreated");
        self.move_to(target)
    }

    /// Finish the form, consuming the controller.
    pub fn submit(self) -> Result<SubmissionPacket, TransitionRejected> {
        let final_step = self.layout.final_step();
        if self.current_step != final_step {
            return Err(TransitionRejected::NotOnFinalStep {
                current: self.current_step,
                final_step,
            });
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(TransitionRejected::MissingFields(missing));
        }

        let quote = self.quote();
        Ok(SubmissionPacket {
            selection: self.selection,
            quote,
        })
    }

    fn move_to(&self, step: u8) -> StepChange {
        let mut form = self.clone();
        form.current_step = step;
        let review_quote = (step == REVIEW_STEP).then(|| form.quote());
        StepChange { form, review_quote }
    }
}
