pub mod driver;
pub mod options;
pub mod os_release;

pub use driver::{AuthCapability, DriverError, DriverKind, EphemeralPassword, MachineDriver};
pub use options::{AuthOptions, SwarmOptions};
pub use os_release::{OsRelease, OsReleaseError};
