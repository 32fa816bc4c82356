/// Container runtime abstraction - everything that touches the engine's
/// global name and port namespaces goes through this trait
use crate::container::ContainerLaunch;
use crate::errors::Result;
use std::path::Path;

pub mod docker;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use docker::DockerRuntime;

/// Trait that all container engines must implement
pub trait ContainerRuntime {
    /// Whether the engine can be reached at all
    fn is_available(&self) -> bool;

    /// Build an image from `context` tagged `tag`, blocking until done
    ///
    /// # Arguments
    /// * `context` - Build context directory
    /// * `descriptor` - Build descriptor file name inside the context
    /// * `tag` - Image tag to apply
    fn build(&self, context: &Path, descriptor: &str, tag: &str) -> Result<()>;

    /// Start a new container, returning the id reported by the engine
    fn run(&self, launch: &ContainerLaunch) -> Result<String>;

    /// Whether a container (running or stopped) with this exact name exists
    fn exists_by_name(&self, name: &str) -> Result<bool>;
}
