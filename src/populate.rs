use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::board::{TaskBoard, TrelloClient};
use crate::cli::{PopulateArgs, ResetArgs};
use crate::config::Credentials;
use crate::reconcile::{classify_lists, plan, reconcile, reset_board, select_board};
use crate::scrape::scrape_catalog;
use crate::taxonomy::Taxonomy;

pub fn run(args: PopulateArgs) -> anyhow::Result<()> {
    let taxonomy = Taxonomy::load(&PathBuf::from(&args.taxonomy))?;
    let credentials = Credentials::load(&PathBuf::from(&args.board.credentials))?;
    let fetcher = args.source.fetcher()?;

    let catalog = scrape_catalog(
        &fetcher,
        &args.source.listing_url,
        &args.source.origin,
        &taxonomy,
    )
    .context("scrape catalog")?;

    let client = TrelloClient::new(&args.board.api_base, credentials)?;
    let board = select_board(client.list_boards().context("list boards")?, &args.board.board)?;
    let lists = classify_lists(client.open_lists(&board).context("list board lists")?);
    let mut existing = client.all_cards(&board).context("list cards")?;
    tracing::info!(board = %board.name, cards = existing.len(), "loaded board");

    let mut stdout = std::io::stdout().lock();
    if args.dry_run {
        let plan = plan(&catalog.courses, &existing, &lists)?;
        for planned in &plan.create {
            writeln!(
                stdout,
                "would create\t{}\t{}",
                planned.list.name, planned.course.course.name
            )
            .context("write dry-run line")?;
        }
        writeln!(
            stdout,
            "would create {} cards, skip {} existing",
            plan.create.len(),
            plan.skipped.len()
        )
        .context("write summary")?;
        return Ok(());
    }

    let report = reconcile(&client, &catalog.courses, &mut existing, &lists)?;
    writeln!(
        stdout,
        "created {} cards, skipped {} existing",
        report.created.len(),
        report.skipped.len()
    )
    .context("write summary")?;
    Ok(())
}

pub fn reset(args: ResetArgs) -> anyhow::Result<()> {
    if !args.yes {
        anyhow::bail!(
            "refusing to delete every card on `{}` without --yes",
            args.board.board
        );
    }

    let credentials = Credentials::load(&PathBuf::from(&args.board.credentials))?;
    let client = TrelloClient::new(&args.board.api_base, credentials)?;
    let board = select_board(client.list_boards().context("list boards")?, &args.board.board)?;

    let deleted = reset_board(&client, &board)?;
    writeln!(std::io::stdout().lock(), "deleted {deleted} cards").context("write summary")?;
    Ok(())
}
