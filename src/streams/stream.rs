use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use std::io::Error;
use std::sync::Arc;

pub trait Stream {
    fn header(&self) -> &InstanceHeader;
    /// Shared handle to the header, for instances and datasets built from this stream.
    fn header_ref(&self) -> Arc<InstanceHeader>;
    fn has_more_instances(&self) -> bool;
    fn next_instance(&mut self) -> Option<Box<dyn Instance>>;
    fn restart(&mut self) -> Result<(), Error>;
}
