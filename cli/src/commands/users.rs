//! Directory commands: listing pages and bulk actions.

use anyhow::{Context as _, Result};
use chaos_business::{BulkAction, QueryChange, SortGesture, SortOrder, TableGesture};
use inquire::Confirm;
use tracing::instrument;

use crate::cli::UsersArgs;
use crate::context::AppContext;
use crate::render::{page_count, users_table};

/// The table gesture equivalent to the `users` flags.
pub fn gesture_for(args: &UsersArgs) -> TableGesture {
    let order = match (&args.sort, args.desc) {
        (None, _) => SortOrder::None,
        (Some(_), false) => SortOrder::Ascending,
        (Some(_), true) => SortOrder::Descending,
    };
    TableGesture {
        page: Some(args.page),
        page_size: Some(args.page_size),
        sort: Some(SortGesture {
            field: args.sort.clone(),
            order,
        }),
        filters: None,
    }
}

/// Applies `gesture`, fetching even when it matches the current query.
pub async fn load_page(ctx: &AppContext, gesture: TableGesture) -> Result<()> {
    let directory = &ctx.console.directory;
    if directory.on_user_gesture(gesture).await == QueryChange::Unchanged {
        directory.refresh().await;
    }
    ctx.report()?;
    ctx.require_session()
}

/// Prints the current page.
pub fn print_page(ctx: &AppContext) {
    let view = ctx.console.directory.snapshot();
    if view.rows.is_empty() {
        ctx.out.dim("No users on this page.");
    } else {
        ctx.out.newline();
        ctx.out.print(users_table(&view.rows, &view.selection));
    }
    ctx.out.page_summary(
        view.query.page,
        page_count(view.query.total, view.query.page_size),
        view.query.total,
        view.total_is_fresh,
    );
}

#[instrument(skip_all, name = "users", fields(page = args.page, page_size = args.page_size))]
pub async fn run_users(ctx: &AppContext, args: &UsersArgs) -> Result<()> {
    ctx.require_session()?;
    load_page(ctx, gesture_for(args)).await?;
    print_page(ctx);
    Ok(())
}

#[instrument(skip_all, name = "bulk", fields(action = ?action, count = ids.len()))]
pub async fn run_bulk(ctx: &AppContext, action: BulkAction, ids: Vec<String>) -> Result<()> {
    ctx.require_session()?;
    ctx.console.directory.run(action, ids).await;
    ctx.report()?;
    ctx.require_session()
}

pub async fn run_delete_unverified(ctx: &AppContext, yes: bool) -> Result<()> {
    ctx.require_session()?;
    if !yes {
        let confirmed = Confirm::new("Delete every user who never confirmed their email?")
            .with_default(false)
            .prompt()
            .context("Failed to read confirmation")?;
        if !confirmed {
            ctx.out.dim("Cancelled.");
            return Ok(());
        }
    }
    run_bulk(ctx, BulkAction::DeleteUnverified, Vec::new()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(sort: Option<&str>, desc: bool) -> UsersArgs {
        UsersArgs {
            page: 2,
            page_size: 20,
            sort: sort.map(str::to_owned),
            desc,
        }
    }

    #[test]
    fn test_gesture_without_sort_clears_order() {
        let gesture = gesture_for(&args(None, false));
        assert_eq!(gesture.page, Some(2));
        assert_eq!(gesture.page_size, Some(20));
        let sort = gesture.sort.expect("sort is always set");
        assert_eq!(sort.field, None);
        assert_eq!(sort.order, SortOrder::None);
    }

    #[test]
    fn test_gesture_sort_direction() {
        let asc = gesture_for(&args(Some("email"), false));
        assert_eq!(asc.sort.map(|s| s.order), Some(SortOrder::Ascending));

        let desc = gesture_for(&args(Some("email"), true));
        assert_eq!(desc.sort.map(|s| s.order), Some(SortOrder::Descending));
    }
}
