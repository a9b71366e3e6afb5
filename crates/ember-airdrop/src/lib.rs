pub mod airdrop;

pub use airdrop::Airdrop;
