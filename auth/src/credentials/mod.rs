pub mod errors;
pub mod parser;

pub use errors::CredentialError;
pub use parser::api_key;
pub use parser::bearer_token;
pub use parser::extract;
pub use parser::parse;
pub use parser::Credential;
pub use parser::Scheme;
