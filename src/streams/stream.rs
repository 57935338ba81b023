use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::io::Error;

/// Pull-based source of instances sharing one header.
///
/// Finite sources (files) report exhaustion through
/// [`has_more_instances`](Stream::has_more_instances); generators may run
/// forever. Every yielded instance matches [`header`](Stream::header).
pub trait Stream {
    fn header(&self) -> &InstanceHeader;

    /// Cheap and side-effect free. Once it returns `false`,
    /// `next_instance` returns `None`.
    fn has_more_instances(&self) -> bool;

    /// The next instance, or `None` at end of stream. Malformed records are
    /// skipped rather than reported.
    fn next_instance(&mut self) -> Option<Box<dyn Instance>>;

    /// Rewinds to the first instance; the header does not change.
    fn restart(&mut self) -> Result<(), Error>;
}
