mod error;
pub use error::{ExecError, ExecResult};

mod resolver;
pub use resolver::{RejectReason, ResolveOutcome, Resolver};

pub mod limits;
pub use limits::RlimitConfig;

#[cfg(feature = "proc")]
pub mod proc;
#[cfg(feature = "proc")]
pub use proc::{ProcResolver, ResolverConfig};

mod util;
