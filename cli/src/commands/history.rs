use anyhow::Result;
use tracing::instrument;

use crate::context::AppContext;
use crate::render::history_table;

#[instrument(skip(ctx))]
pub async fn run_history(ctx: &AppContext, user_id: &str) -> Result<()> {
    ctx.require_session()?;
    let history = &ctx.console.history;
    history.open(user_id).await;
    ctx.report()?;
    ctx.require_session()?;

    let view = history.snapshot();
    ctx.out.header(format!("History of {user_id}"));
    if view.entries.is_empty() {
        ctx.out.dim("No recorded actions.");
    } else {
        ctx.out.print(history_table(&view.entries));
    }
    history.close();
    Ok(())
}
