mod config_gen;
mod generate;

pub use config_gen::config_generate;
pub use generate::generate_link;
