use std::process::ExitCode;

use anyhow::Result;
use chaos_business::BulkAction;
use chaos_cli::cli::{Cli, Commands};
use chaos_cli::commands::{
    generate_completions, run_bulk, run_delete_unverified, run_forgot_password, run_history,
    run_login, run_logout, run_register, run_reset_password, run_shell, run_users,
};
use chaos_cli::context::AppContext;
use chaos_cli::output::Output;
use chaos_cli::timing;
use clap::Parser as _;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    timing::init_tracing(cli.verbose, cli.timing);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            Output::new().error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    let ctx = AppContext::from_args(cli.api_url, cli.config)?;

    match cli.command {
        Commands::Login { email, remember } => run_login(&ctx, email, remember).await,
        Commands::Register { remember } => run_register(&ctx, remember).await,
        Commands::Logout => {
            run_logout(&ctx);
            Ok(())
        }
        Commands::ForgotPassword { email } => run_forgot_password(&ctx, &email).await,
        Commands::ResetPassword { token, email } => {
            run_reset_password(&ctx, &token, &email).await
        }
        Commands::Users(args) => run_users(&ctx, &args).await,
        Commands::Block { ids } => run_bulk(&ctx, BulkAction::Block, ids).await,
        Commands::Unblock { ids } => run_bulk(&ctx, BulkAction::Unblock, ids).await,
        Commands::Delete { ids } => run_bulk(&ctx, BulkAction::Delete, ids).await,
        Commands::DeleteUnverified { yes } => run_delete_unverified(&ctx, yes).await,
        Commands::History { user_id } => run_history(&ctx, &user_id).await,
        Commands::Shell => run_shell(&ctx).await,
        Commands::Completions { .. } => Ok(()),
    }
}
