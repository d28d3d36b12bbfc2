//! Interactive console. The session lives as long as the shell does.

use std::fmt;

use anyhow::{Context as _, Result};
use chaos_business::{BulkAction, SortOrder, TableGesture};
use inquire::{Confirm, CustomType, InquireError, MultiSelect, Select, Text};
use tracing::{debug, instrument};

use crate::commands::auth;
use crate::commands::users::{load_page, print_page};
use crate::context::AppContext;
use crate::render::{display_name, history_table, page_count};

const SORT_FIELDS: &[&str] = &[
    "fullName",
    "email",
    "lastLoginTime",
    "registrationTime",
    "isBlocked",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellAction {
    NextPage,
    PreviousPage,
    PageSize,
    Sort,
    Select,
    Block,
    Unblock,
    Delete,
    DeleteUnverified,
    History,
    Refresh,
    Logout,
    Quit,
}

impl ShellAction {
    const ALL: [Self; 13] = [
        Self::NextPage,
        Self::PreviousPage,
        Self::PageSize,
        Self::Sort,
        Self::Select,
        Self::Block,
        Self::Unblock,
        Self::Delete,
        Self::DeleteUnverified,
        Self::History,
        Self::Refresh,
        Self::Logout,
        Self::Quit,
    ];
}

impl fmt::Display for ShellAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NextPage => "Next page",
            Self::PreviousPage => "Previous page",
            Self::PageSize => "Change page size",
            Self::Sort => "Sort",
            Self::Select => "Select users",
            Self::Block => "Block selected",
            Self::Unblock => "Unblock selected",
            Self::Delete => "Delete selected",
            Self::DeleteUnverified => "Delete unverified users",
            Self::History => "Show a user's history",
            Self::Refresh => "Refresh",
            Self::Logout => "Log out",
            Self::Quit => "Quit",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy)]
struct OrderChoice(SortOrder);

impl fmt::Display for OrderChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.0 {
            SortOrder::Ascending => "Ascending",
            SortOrder::Descending => "Descending",
            SortOrder::None => "Unsorted",
        })
    }
}

/// Esc and Ctrl-C leave the current prompt, not the shell.
fn cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

#[instrument(skip_all, name = "shell")]
pub async fn run_shell(ctx: &AppContext) -> Result<()> {
    if !ctx.console.session.is_authenticated() {
        // Not remembered: the token goes away with the shell.
        auth::run_login(ctx, None, false).await?;
    }

    load_page(ctx, TableGesture::default()).await?;
    print_page(ctx);

    loop {
        if !ctx.console.session.is_authenticated() {
            ctx.out.warning("Session ended.");
            return Ok(());
        }

        let action = match Select::new("Action:", ShellAction::ALL.to_vec())
            .with_page_size(ShellAction::ALL.len())
            .prompt()
        {
            Ok(action) => action,
            Err(e) if cancelled(&e) => ShellAction::Quit,
            Err(e) => return Err(e).context("Failed to read action"),
        };
        debug!("shell action: {action:?}");

        match action {
            ShellAction::Quit => return Ok(()),
            ShellAction::Logout => {
                auth::run_logout(ctx);
                return Ok(());
            }
            other => {
                if let Err(e) = step(ctx, other).await {
                    if e.downcast_ref::<InquireError>().is_some_and(cancelled) {
                        continue;
                    }
                    ctx.out.error(format!("{e:#}"));
                }
            }
        }
        ctx.show_notices();
    }
}

async fn step(ctx: &AppContext, action: ShellAction) -> Result<()> {
    let directory = &ctx.console.directory;
    let query = directory.current_state();

    match action {
        ShellAction::NextPage => {
            let pages = page_count(query.total, query.page_size);
            if u64::from(query.page) >= pages {
                ctx.out.dim("Already on the last page.");
                return Ok(());
            }
            directory
                .on_user_gesture(TableGesture::page(query.page + 1))
                .await;
        }
        ShellAction::PreviousPage => {
            if query.page <= 1 {
                ctx.out.dim("Already on the first page.");
                return Ok(());
            }
            directory
                .on_user_gesture(TableGesture::page(query.page - 1))
                .await;
        }
        ShellAction::PageSize => {
            let size = CustomType::<u32>::new("Rows per page:")
                .with_default(query.page_size)
                .with_error_message("Enter a positive number")
                .prompt()?;
            directory
                .on_user_gesture(TableGesture::page_size(size))
                .await;
        }
        ShellAction::Sort => {
            let field = Select::new("Sort by:", SORT_FIELDS.to_vec()).prompt()?;
            let order = Select::new(
                "Order:",
                vec![
                    OrderChoice(SortOrder::Ascending),
                    OrderChoice(SortOrder::Descending),
                    OrderChoice(SortOrder::None),
                ],
            )
            .prompt()?;
            let field = (order.0 != SortOrder::None).then_some(field);
            directory
                .on_user_gesture(TableGesture::sort(field, order.0))
                .await;
        }
        ShellAction::Select => return select_rows(ctx),
        ShellAction::Block => bulk_on_selection(ctx, BulkAction::Block).await,
        ShellAction::Unblock => bulk_on_selection(ctx, BulkAction::Unblock).await,
        ShellAction::Delete => {
            if !confirm_selected(ctx, "Delete")? {
                return Ok(());
            }
            directory.delete_selected().await;
        }
        ShellAction::DeleteUnverified => {
            let confirmed = Confirm::new("Delete every user who never confirmed their email?")
                .with_default(false)
                .prompt()?;
            if !confirmed {
                return Ok(());
            }
            directory.delete_unverified().await;
        }
        ShellAction::History => return show_history(ctx).await,
        ShellAction::Refresh => directory.refresh().await,
        ShellAction::Logout | ShellAction::Quit => return Ok(()),
    }

    if ctx.console.session.is_authenticated() {
        print_page(ctx);
    }
    Ok(())
}

fn select_rows(ctx: &AppContext) -> Result<()> {
    let directory = &ctx.console.directory;
    let view = directory.snapshot();
    if view.rows.is_empty() {
        ctx.out.dim("Nothing to select on this page.");
        return Ok(());
    }
    let labels: Vec<String> = view
        .rows
        .iter()
        .map(|row| format!("{} <{}> [{}]", display_name(row), row.email, row.id))
        .collect();
    let selected: Vec<usize> = view
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| view.selection.contains(&row.id))
        .map(|(i, _)| i)
        .collect();
    let picked = MultiSelect::new("Select users:", labels)
        .with_default(&selected)
        .raw_prompt()?;
    directory.select(
        picked
            .into_iter()
            .filter_map(|option| view.rows.get(option.index))
            .map(|row| row.id.clone()),
    );
    ctx.out
        .info(format!("{} selected", directory.selection().len()));
    Ok(())
}

async fn show_history(ctx: &AppContext) -> Result<()> {
    let user_id = Text::new("User id:").prompt()?;
    let history = &ctx.console.history;
    history.open(user_id.trim()).await;
    let view = history.snapshot();
    if view.last_error.is_none() && ctx.console.session.is_authenticated() {
        if view.entries.is_empty() {
            ctx.out.dim("No recorded actions.");
        } else {
            ctx.out.print(history_table(&view.entries));
        }
    }
    history.close();
    Ok(())
}

fn confirm_selected(ctx: &AppContext, verb: &str) -> Result<bool> {
    let count = ctx.console.directory.selection().len();
    if count == 0 {
        ctx.out.dim("No users selected.");
        return Ok(false);
    }
    Ok(Confirm::new(&format!("{verb} {count} selected user(s)?"))
        .with_default(false)
        .prompt()?)
}

async fn bulk_on_selection(ctx: &AppContext, action: BulkAction) {
    let directory = &ctx.console.directory;
    if directory.selection().is_empty() {
        ctx.out.dim("No users selected.");
        return;
    }
    match action {
        BulkAction::Block => directory.block_selected().await,
        BulkAction::Unblock => directory.unblock_selected().await,
        BulkAction::Delete => directory.delete_selected().await,
        BulkAction::DeleteUnverified => directory.delete_unverified().await,
    }
}
