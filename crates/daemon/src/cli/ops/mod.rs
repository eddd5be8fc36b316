pub mod health;
pub mod init;
pub mod post;
pub mod serve;
pub mod version;

pub use health::Health;
pub use init::Init;
pub use post::Post;
pub use serve::Serve;
pub use version::Version;
