//! Hooks for following the fill of the cube, e.g. to print or draw it.

use crate::cube::DpCube;
use crate::step_trace::StepTrace;

/// Receives every filled cell, in fill order.
pub trait StepObserver {
    /// Called after a cell was filled. `cube` already contains the new cell.
    fn cell_filled(&mut self, _step: &StepTrace, _cube: &DpCube) {}

    /// Called once after the last cell was filled.
    fn finished(&mut self, _cube: &DpCube) {}
}

#[derive(Clone, Copy, Default, Debug)]
pub struct NoObserver;
impl StepObserver for NoObserver {}

impl<F: FnMut(&StepTrace)> StepObserver for F {
    fn cell_filled(&mut self, step: &StepTrace, _cube: &DpCube) {
        self(step)
    }
}
