//! Scripted user actions, as accepted on the command line.

use std::fmt;
use std::str::FromStr;

use log::info;
use net::Fetcher;

use crate::error::ShellError;
use crate::session::{ClickEvent, ClickOutcome, LoadOutcome, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Primary click on the first link whose raw href matches.
    Click(String),
    Back,
    Forward,
}

impl FromStr for Step {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "back" => Ok(Step::Back),
            "forward" => Ok(Step::Forward),
            _ => match s.strip_prefix("click:") {
                Some(href) if !href.is_empty() => Ok(Step::Click(href.to_string())),
                _ => Err(ShellError::InvalidStep(s.to_string())),
            },
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Click(href) => write!(f, "click:{href}"),
            Step::Back => f.write_str("back"),
            Step::Forward => f.write_str("forward"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Click(ClickOutcome),
    /// `None` when there was no entry to move to.
    History(Option<LoadOutcome>),
}

impl<F: Fetcher> Session<F> {
    pub fn run_step(&mut self, step: &Step) -> Result<StepOutcome, ShellError> {
        info!(target: "navshell.router", "step {step}");
        match step {
            Step::Click(href) => {
                let link = self
                    .find_link(href)
                    .ok_or_else(|| ShellError::LinkNotFound(href.clone()))?;
                self.activate(ClickEvent::primary(link)).map(StepOutcome::Click)
            }
            Step::Back => Ok(StepOutcome::History(self.back())),
            Step::Forward => Ok(StepOutcome::History(self.forward())),
        }
    }
}
