pub mod database_config;
pub mod database_error;
pub mod database_migration;
pub mod database_seeder;
pub mod driven;
pub mod driver;
pub mod server_config;

pub use database_config::DatabaseConfig;
pub use database_migration::DatabaseMigration;
pub use database_seeder::{MySqlSeeder, SeedConfig};
pub use server_config::ServerConfig;
