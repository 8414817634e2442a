//! Pokémon tools backed by PokeAPI.

pub mod info;

pub use info::{PokemonInfo, PokemonInfoTool, PokemonParams};
