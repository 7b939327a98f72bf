pub mod rule_table;
pub mod settings;

pub use rule_table::default_rule_table;
pub use settings::AppConfig;
