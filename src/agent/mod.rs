/// Streaming agents and the driver that runs them
pub mod driver;
pub mod notebook;
pub mod traits;

pub use driver::AgentStreamDriver;
pub use notebook::NotebookAgent;
pub use traits::StreamableAgent;
