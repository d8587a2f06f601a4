//! Console rendering of training stage boundaries

use std::time::Duration;

use crate::pipeline::{RunObserver, Stage};
use crate::utils::{print_step_header, print_step_time, print_success};

/// Prints a styled header when a stage starts and its detail when it ends
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl RunObserver for ConsoleObserver {
    fn stage_started(&mut self, stage: Stage) {
        print_step_header(stage.number(), stage.title());
    }

    fn stage_finished(&mut self, _stage: Stage, elapsed: Duration, detail: &str) {
        print_success(detail);
        print_step_time(elapsed);
    }
}
