pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;

pub use memory::InMemoryRefreshTokenRepository;
pub use r#trait::RefreshTokenRepository;

#[cfg(test)]
mod tests;
