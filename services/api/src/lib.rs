mod cli;
pub mod infra;
mod process;
pub mod routes;
mod server;

use gradebook::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
