mod executor;
mod default_executor;
mod builtin;
mod path_resolver;
mod redirect;

pub use executor::{describe_io_error, ExecError, ExecOutcome, ExecStatus, Executor};
pub use default_executor::DefaultExecutor;
pub use builtin::Builtin;
pub use path_resolver::PathResolver;
pub use redirect::{open_target, RedirectGuard};
