use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ParseError;
use super::ast::{Command, Statement};
use super::environment::VariableEnvironment;
use super::parser::parse_line_with_limit;
use crate::runtime::SessionConfig;
use crate::runtime::action::PrimitiveAction;
use crate::runtime::host::InterpreterHost;
use crate::runtime::scheduler::Scheduler;

/// Outcome of one top-level submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseReport {
    /// `true` when every statement on the line parsed.
    pub success: bool,
    /// Failures in statement order.
    #[serde(skip)]
    pub errors: Vec<ParseError>,
    /// Number of queue entries added (after `walk` expansion).
    pub staged: usize,
    /// Whether the syntax-error penalty was applied.
    pub damaged: bool,
}

/// Turns command lines into staged actions.
#[derive(Debug, Clone)]
pub struct Interpreter {
    default_wait_ms: u64,
    damage_per_error: u32,
    max_repeat: u32,
}

impl Interpreter {
    /// Create an interpreter using the session's wait default and penalty.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            default_wait_ms: config.default_wait_ms,
            damage_per_error: config.damage_per_error,
            max_repeat: config.max_repeat,
        }
    }

    /// Parse `line`, stage its actions, and report success.
    pub fn parse<H: InterpreterHost + ?Sized>(
        &self,
        line: &str,
        scheduler: &mut Scheduler,
        host: &mut H,
    ) -> bool {
        self.submit(line, scheduler, host).success
    }

    /// Parse `line`, stage its actions, and return the detailed outcome.
    ///
    /// Every statement on the line is attempted even after a failure. At most
    /// one penalty is applied per call, however many statements failed.
    pub fn submit<H: InterpreterHost + ?Sized>(
        &self,
        line: &str,
        scheduler: &mut Scheduler,
        host: &mut H,
    ) -> ParseReport {
        let mut env = VariableEnvironment::new();
        let mut report = ParseReport::default();

        for parsed in parse_line_with_limit(line, self.max_repeat) {
            match parsed {
                Ok(statement) => self.execute(&statement, &mut env, scheduler, host, &mut report),
                Err(err) => {
                    warn!(error = %err, "statement rejected");
                    report.errors.push(err);
                }
            }
        }

        report.success = report.errors.is_empty();
        if !report.success {
            host.damage(self.damage_per_error);
            report.damaged = true;
        }
        debug!(line, staged = report.staged, success = report.success, "line submitted");
        report
    }

    fn execute<H: InterpreterHost + ?Sized>(
        &self,
        statement: &Statement,
        env: &mut VariableEnvironment,
        scheduler: &mut Scheduler,
        host: &mut H,
        report: &mut ParseReport,
    ) {
        match statement {
            Statement::Command(command) => self.run_command(command, scheduler, report),
            Statement::For { var, count, body } => {
                for i in 0..*count {
                    let previous = env.bind(var, i64::from(i));
                    self.execute(body, env, scheduler, host, report);
                    env.restore(var, previous);
                }
            }
            Statement::If { condition, body } => {
                if env.evaluate(condition, &*host) {
                    self.execute(body, env, scheduler, host, report);
                }
            }
        }
    }

    fn run_command(&self, command: &Command, scheduler: &mut Scheduler, report: &mut ParseReport) {
        let action = match command {
            Command::Clear => {
                scheduler.clear();
                return;
            }
            Command::Move(direction) => PrimitiveAction::MoveStep(*direction),
            Command::Walk(direction, count) => PrimitiveAction::WalkN(*direction, *count),
            Command::Turn(direction) => PrimitiveAction::Turn(*direction),
            Command::Wait(duration) => PrimitiveAction::Wait(duration.unwrap_or(self.default_wait_ms)),
            Command::Print(message) => PrimitiveAction::Print(message.clone()),
        };
        report.staged += scheduler.stage(action);
    }
}
