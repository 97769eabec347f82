pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::Role;
pub use claims::TokenClaims;
pub use claims::UnknownRole;
pub use codec::TokenCodec;
pub use errors::JwtError;
