//! Directive dispatch and the run driver.
//!
//! The [`Dispatcher`] owns the store session and maps each directive to
//! an operation; [`run`] feeds it a parsed script in order and halts on
//! the first failure or an explicit `exit`. The session is plain owned
//! state on the dispatcher: nothing can touch the store without it.

pub mod import;

use std::path::Path;
use tracing::{error, info};

use crate::script::Directive;
use crate::storage::Database;

pub use import::{import_directory, ImportError, ImportSummary};

/// Executes directives against the store session it owns.
///
/// At most one session is open at a time. `open_db` creates it (replacing
/// and thereby closing any previous one), `close_db` destroys it, and
/// operations that need a session fail when none is open.
#[derive(Default)]
pub struct Dispatcher {
    session: Option<Database>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a store session is currently open.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Executes one directive, returning whether it succeeded. Unknown
    /// verbs and under-arity invocations fail identically as "unhandled".
    pub fn execute(&mut self, directive: &Directive) -> bool {
        info!("executing: {directive}");

        let args = directive.args();
        match directive.verb() {
            "open_db" if !args.is_empty() => self.open_db(Path::new(args[0].as_str())),
            "close_db" => self.close_db(),
            "import_images_from_directory" if args.len() >= 4 => self.import_images(args),
            _ => {
                error!("unhandled command: {directive}");
                false
            }
        }
    }

    fn open_db(&mut self, path: &Path) -> bool {
        if self.session.is_some() {
            info!("open_db: replacing the already-open database session");
        }
        match Database::open(path) {
            Ok(db) => {
                info!("opened database {}", path.display());
                self.session = Some(db);
                true
            }
            Err(err) => {
                error!("failed to open database {}: {err:#}", path.display());
                false
            }
        }
    }

    fn close_db(&mut self) -> bool {
        match self.session.take() {
            Some(db) => match db.close() {
                Ok(()) => {
                    info!("closed database");
                    true
                }
                Err(err) => {
                    error!("failed to close database: {err:#}");
                    false
                }
            },
            None => {
                error!("close_db: no database session is open");
                false
            }
        }
    }

    fn import_images(&mut self, args: &[String]) -> bool {
        let dir = Path::new(args[0].as_str());
        let category = args[1].as_str();
        let (width, height) = match (parse_dimension(&args[2]), parse_dimension(&args[3])) {
            (Some(width), Some(height)) => (width, height),
            _ => {
                error!(
                    "import_images_from_directory: invalid dimensions {} x {}",
                    args[2], args[3]
                );
                return false;
            }
        };

        let Some(db) = self.session.as_ref() else {
            error!("import_images_from_directory: no database session is open");
            return false;
        };

        match import::import_directory(db, dir, category, width, height) {
            Ok(summary) => {
                info!(
                    "imported {} images from {} ({} skipped)",
                    summary.imported,
                    dir.display(),
                    summary.failed
                );
                true
            }
            Err(err) => {
                error!("import from {} failed: {err}", dir.display());
                false
            }
        }
    }
}

fn parse_dimension(token: &str) -> Option<u32> {
    token.parse().ok().filter(|&value| value > 0)
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every directive succeeded, or an `exit` directive was reached.
    Completed,
    /// A directive failed; nothing after it was executed.
    Halted,
}

/// Runs a parsed script front to back, fail-fast.
///
/// `exit` stops the run with success. The first failed directive halts
/// the run; an empty script is "nothing to do" and completes.
pub fn run(script: &[Directive]) -> RunOutcome {
    if script.is_empty() {
        info!("no directives to execute");
        return RunOutcome::Completed;
    }

    let mut dispatcher = Dispatcher::new();
    for directive in script {
        if directive.verb() == "exit" {
            info!("exit directive reached, stopping");
            return RunOutcome::Completed;
        }
        if !dispatcher.execute(directive) {
            error!("command failed: {directive}");
            return RunOutcome::Halted;
        }
    }

    RunOutcome::Completed
}
