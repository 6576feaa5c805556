use crate::error::PatchError;
use crate::host::property_renter::{LEVELDOWN_JOB, LEVELUP_JOB};
use crate::host::routine::RoutineStep;

/// Step that closes an excised region. The closing step is removed with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionEnd {
    /// The step that hands the job off as the routine's dependency.
    HandOff,
    /// A step with this label.
    Label(&'static str),
}

/// What a routine's level-job regions look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcisionShape {
    /// Work-item types whose declaring step opens a region.
    pub work_items: &'static [&'static str],
    pub end: RegionEnd,
    /// Whether every work item must be found inside the excised regions.
    pub require_all: bool,
}

impl ExcisionShape {
    /// The host property-renter routine.
    pub const HOST: ExcisionShape = ExcisionShape {
        work_items: &[LEVELUP_JOB, LEVELDOWN_JOB],
        end: RegionEnd::HandOff,
        require_all: true,
    };

    fn closes(&self, step: &RoutineStep) -> bool {
        match self.end {
            RegionEnd::HandOff => step.hands_off,
            RegionEnd::Label(label) => step.label == label,
        }
    }
}

/// Returns `steps` with every level-job region removed.
///
/// A region opens at a step declaring one of the shape's work items and runs
/// up to and including the next closing step. Anything outside a region is
/// kept in order. A region that never closes fails the whole excision, so
/// callers never install a partially patched routine.
pub fn excise_level_jobs(
    routine: &str,
    steps: &[RoutineStep],
    shape: &ExcisionShape,
) -> Result<Vec<RoutineStep>, PatchError> {
    let mut kept = Vec::with_capacity(steps.len());
    let mut found: Vec<&'static str> = Vec::new();
    let mut open: Option<&'static str> = None;

    for step in steps {
        if open.is_none() && !step.declares_any(shape.work_items) {
            kept.push(step.clone());
            continue;
        }
        if open.is_none() {
            open = Some(step.label);
        }
        found.extend(
            step.locals
                .iter()
                .copied()
                .filter(|local| shape.work_items.contains(local)),
        );
        if shape.closes(step) {
            open = None;
        }
    }

    if let Some(start) = open {
        return Err(PatchError::UnterminatedRegion {
            routine: routine.to_string(),
            start,
        });
    }
    let complete = if shape.require_all {
        shape.work_items.iter().all(|item| found.contains(item))
    } else {
        !found.is_empty()
    };
    if !complete {
        return Err(PatchError::WorkItemsNotFound {
            routine: routine.to_string(),
        });
    }
    Ok(kept)
}
