pub mod cat;
pub mod daemon;
pub mod ls;
pub mod node;
pub mod put;
pub mod resolve;
pub mod rm;
pub mod root;
pub mod sign;
pub mod version;

pub use cat::Cat;
pub use daemon::Daemon;
pub use ls::Ls;
pub use node::Node;
pub use put::Put;
pub use resolve::Resolve;
pub use rm::Rm;
pub use root::Root;
pub use sign::Sign;
pub use version::Version;
